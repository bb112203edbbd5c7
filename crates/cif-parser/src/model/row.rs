//! Row handles (§9 design notes): an arena index plus a generation counter
//! rather than a raw pointer/reference, so a handle obtained before a
//! cascade-triggered erase can be detected as stale afterwards instead of
//! dangling.

/// A stable handle to a row inside one [`super::category::Category`]'s
/// arena. `index` is the slot, `generation` guards against reuse: once a
/// slot is erased and its index recycled, any old `RowId` pointing at it
/// compares unequal in `generation` and every lookup with it returns `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RowId {
    pub(crate) index: usize,
    pub(crate) generation: u32,
}

/// The stored-text special values recognised in addition to an actual
/// value (§4.1): `?` for "unknown" and `.` for "inapplicable". Internally
/// these are both kept as `None` in the row's value vector; this enum
/// tracks which marker to re-emit on write-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum NullKind {
    Unknown,
    Inapplicable,
}

impl NullKind {
    pub fn as_text(self) -> &'static str {
        match self {
            NullKind::Unknown => "?",
            NullKind::Inapplicable => ".",
        }
    }
}

/// A single item's stored content: present text, or one of the two null
/// markers.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Field {
    Text(String),
    Null(NullKind),
}

impl Field {
    pub fn as_text(&self) -> &str {
        match self {
            Field::Text(s) => s,
            Field::Null(n) => n.as_text(),
        }
    }

    /// True for any of the three "no value" states (§3/§4.4.2): stored
    /// empty text, `.`, or `?`.
    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null(_))
    }

    /// True for "", `.`, or `?` — the full empty/null state (§4.4.2).
    pub fn empty(&self) -> bool {
        self.is_null() || self.as_text().is_empty()
    }

    /// True only for the inapplicable marker `.`.
    pub fn is_inapplicable(&self) -> bool {
        matches!(self, Field::Null(NullKind::Inapplicable))
    }

    /// True only for the unknown marker `?`.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Field::Null(NullKind::Unknown))
    }

    pub fn unknown() -> Self {
        Field::Null(NullKind::Unknown)
    }

    pub fn inapplicable() -> Self {
        Field::Null(NullKind::Inapplicable)
    }

    /// Compares this field against another using §4.1's primitive-aware
    /// comparator (the same one the key index and condition DSL use).
    pub fn compare(&self, other: &Field, primitive_type: crate::text::PrimitiveType) -> std::cmp::Ordering {
        crate::text::compare_values(self.as_text(), other.as_text(), primitive_type)
    }
}

impl From<&str> for Field {
    fn from(s: &str) -> Self {
        match s {
            "?" => Field::unknown(),
            "." => Field::inapplicable(),
            _ => Field::Text(s.to_string()),
        }
    }
}

impl From<String> for Field {
    fn from(s: String) -> Self {
        Field::from(s.as_str())
    }
}

pub(crate) struct Slot {
    pub(crate) generation: u32,
    /// `None` when the slot is a free-listed tombstone. Otherwise an
    /// ordered list of this row's item/value pairs, in first-write order.
    pub(crate) data: Option<Vec<(String, Field)>>,
}

/// Parses a field's text as `T`, using the locale-independent rules of
/// §4.1/§4.4.2: a present, non-null value is parsed with `T::from_str`;
/// the stored-empty/`.`/`?` states yield `T::default()`.
pub fn field_as<T>(field: Option<&Field>) -> Result<T, T::Err>
where
    T: std::str::FromStr + Default,
{
    match field {
        None => Ok(T::default()),
        Some(f) if f.is_null() || f.as_text().is_empty() => Ok(T::default()),
        Some(f) => f.as_text().parse(),
    }
}

/// As [`field_as`], but absent/null/empty yields `None` instead of a
/// default value — the `optional<T>` case from §4.4.2.
pub fn field_as_option<T>(field: Option<&Field>) -> Result<Option<T>, T::Err>
where
    T: std::str::FromStr,
{
    match field {
        None => Ok(None),
        Some(f) if f.is_null() || f.as_text().is_empty() => Ok(None),
        Some(f) => f.as_text().parse().map(Some),
    }
}
