//! The SAC-style parser (component C, §4.3): a single token of lookahead
//! over the [`crate::lexer::Lexer`], recognising the grammar
//!
//! ```text
//! file      := (global | datablock)*
//! global    := GLOBAL item*
//! datablock := DATA item* (saveframe | loop | item)*
//! saveframe := SAVE item* SAVE
//! loop      := LOOP tag+ value+
//! item      := TAG value
//! ```
//!
//! and invoking [`SacHandler`] callbacks on each structural recognition,
//! grounded on the `SacParser` class (`getNextToken`/`CIFToken` at line 102
//! onward) in `original_source/include/cif++/CifParser.hpp`. `global_` blocks are recognised for
//! grammar completeness but their items are discarded: no real mmCIF
//! consumer uses them and the data model has nothing to hang them on.

use std::collections::HashSet;

use crate::error::{CifError, Result};
use crate::lexer::Lexer;
use crate::model::category::Category;
use crate::model::datablock::Datablock;
use crate::model::file::File;
use crate::model::frame::SaveFrame;
use crate::model::row::{Field, RowId};
use crate::token::{Token, TokenKind, ValueKind};

/// Callbacks invoked as the parser recognises structure. A dictionary
/// parser overrides these to additionally interpret save-frames as
/// type/category/item/link definitions (§4.5.1); the default handler
/// ([`ModelBuilder`]) builds a [`File`].
pub trait SacHandler {
    fn produce_datablock(&mut self, name: &str);
    fn produce_save_frame_start(&mut self, name: &str);
    fn produce_save_frame_end(&mut self);
    fn produce_category(&mut self, name: &str);
    fn produce_row(&mut self);
    fn produce_item(&mut self, category: &str, item: &str, value: Field);
}

/// Parses `input` into a fresh [`File`], tolerating a repeated tag within
/// one row (last write wins) the way [`run`] always has.
pub fn parse(input: &str) -> Result<File> {
    parse_with_options(input, false)
}

/// Parses `input` into a fresh [`File`]. When `strict`, a tag repeated
/// within the same row — either twice in one `loop_` header or twice before
/// [`parse_item`] moves on to the next category — is rejected instead of
/// silently letting the later value win.
pub fn parse_with_options(input: &str, strict: bool) -> Result<File> {
    let mut builder = ModelBuilder::new();
    run(input, &mut builder, strict)?;
    Ok(builder.finish())
}

/// Parses the whole input, then returns only the named datablock. There is
/// no partial-construction shortcut here: every datablock's rows are still
/// built, same as [`parse`] (see [`index_datablocks`] for the scan that
/// skips row construction).
pub fn parse_single_datablock(input: &str, name: &str) -> Result<Option<Datablock>> {
    let mut file = parse(input)?;
    Ok(file.take_datablock(name))
}

/// A one-pass scan recording each datablock's name and the approximate
/// byte offset of the token run that introduces it (the offset points at
/// the last lexer position before the `data_` keyword, which may include
/// a run of preceding whitespace/comments) — no rows are constructed.
/// Used to locate one datablock in a large file before doing the full
/// parse, or to report a table of contents.
pub fn index_datablocks(input: &str) -> Result<Vec<(String, usize)>> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        let before = lexer.byte_pos();
        let tok = lexer.next_token()?;
        match tok.kind {
            TokenKind::Eof => break,
            TokenKind::DataBlockName => out.push((tok.text, before)),
            _ => {}
        }
    }
    Ok(out)
}

/// Drives `handler` over every structural element in `input`. When `strict`,
/// a tag repeated within the same row is a structural error instead of
/// letting its later occurrence silently win.
pub fn run(input: &str, handler: &mut dyn SacHandler, strict: bool) -> Result<()> {
    let mut lexer = Lexer::new(input);
    let mut tok = lexer.next_token()?;

    loop {
        match tok.kind {
            TokenKind::Eof => break,
            TokenKind::Global => {
                tok = lexer.next_token()?;
                let mut discard_category = String::new();
                let mut discard_seen = HashSet::new();
                while tok.kind == TokenKind::Tag {
                    let (_, _, next) =
                        parse_item(&mut lexer, &mut NullHandler, tok, &mut discard_category, &mut discard_seen, false)?;
                    tok = next;
                }
            }
            TokenKind::DataBlockName => {
                let name = tok.text.clone();
                handler.produce_datablock(&name);
                tok = parse_datablock_body(&mut lexer, handler, strict)?;
            }
            other => {
                return Err(CifError::Parse {
                    line: tok.line,
                    message: format!("unexpected token {other:?} at top level"),
                });
            }
        }
    }
    Ok(())
}

fn parse_datablock_body(lexer: &mut Lexer<'_>, handler: &mut dyn SacHandler, strict: bool) -> Result<Token> {
    let mut tok = lexer.next_token()?;
    let mut current_category = String::new();
    let mut seen_items = HashSet::new();
    loop {
        match tok.kind {
            TokenKind::SaveFrameName => {
                let frame_name = tok.text.clone();
                handler.produce_save_frame_start(&frame_name);
                tok = parse_save_frame_body(lexer, handler, strict)?;
            }
            TokenKind::Loop => {
                tok = parse_loop(lexer, handler, &mut current_category, strict)?;
                seen_items.clear();
            }
            TokenKind::Tag => {
                let (_, _, next) = parse_item(lexer, handler, tok, &mut current_category, &mut seen_items, strict)?;
                tok = next;
            }
            TokenKind::DataBlockName | TokenKind::Global | TokenKind::Eof => break,
            other => {
                return Err(CifError::Parse {
                    line: tok.line,
                    message: format!("unexpected token {other:?} in datablock"),
                });
            }
        }
    }
    Ok(tok)
}

fn parse_save_frame_body(lexer: &mut Lexer<'_>, handler: &mut dyn SacHandler, strict: bool) -> Result<Token> {
    let mut tok = lexer.next_token()?;
    let mut current_category = String::new();
    let mut seen_items = HashSet::new();
    loop {
        match tok.kind {
            TokenKind::SaveFrameEnd => {
                handler.produce_save_frame_end();
                tok = lexer.next_token()?;
                break;
            }
            TokenKind::Loop => {
                tok = parse_loop(lexer, handler, &mut current_category, strict)?;
                seen_items.clear();
            }
            TokenKind::Tag => {
                let (_, _, next) = parse_item(lexer, handler, tok, &mut current_category, &mut seen_items, strict)?;
                tok = next;
            }
            TokenKind::Eof => {
                return Err(CifError::Parse {
                    line: tok.line,
                    message: "unterminated save frame (missing closing save_)".to_string(),
                });
            }
            other => {
                return Err(CifError::Parse {
                    line: tok.line,
                    message: format!("unexpected token {other:?} in save frame"),
                });
            }
        }
    }
    Ok(tok)
}

/// Resolves a `TAG` token's text to `(category, item)`. A tag with no `.`
/// inherits the enclosing run's current category (§4.2: "or just item;
/// then category is inferred from surroundings").
fn resolve_tag(tag: &str, current_category: &str) -> (String, String) {
    let name = tag.strip_prefix('_').unwrap_or(tag);
    match name.split_once('.') {
        Some((category, item)) => (category.to_string(), item.to_string()),
        None => (current_category.to_string(), name.to_string()),
    }
}

fn field_from_token(tok: &Token) -> Field {
    match tok.value_kind {
        Some(ValueKind::Unknown) => Field::unknown(),
        Some(ValueKind::Inapplicable) => Field::inapplicable(),
        _ => Field::Text(tok.text.clone()),
    }
}

/// Parses one `item := TAG value` production, emitting `produce_category`
/// and `produce_row` only when the category changes from the previous
/// item — consecutive `_cat.tag value` lines for the same category
/// accumulate into a single row (§3's single-row-category form). `strict`
/// rejects the same item tag appearing twice before the category changes,
/// rather than letting the later occurrence silently overwrite the row.
fn parse_item(
    lexer: &mut Lexer<'_>,
    handler: &mut dyn SacHandler,
    tag_tok: Token,
    current_category: &mut String,
    seen_items: &mut HashSet<String>,
    strict: bool,
) -> Result<(String, String, Token)> {
    let (category, item) = resolve_tag(&tag_tok.text, current_category);
    let value_tok = lexer.next_token()?;
    if value_tok.kind != TokenKind::Value {
        return Err(CifError::Parse {
            line: value_tok.line,
            message: format!("expected a value after tag '{}'", tag_tok.text),
        });
    }
    if category != *current_category {
        handler.produce_category(&category);
        handler.produce_row();
        *current_category = category.clone();
        seen_items.clear();
    }
    if strict && !seen_items.insert(item.clone()) {
        return Err(CifError::Parse {
            line: tag_tok.line,
            message: format!("tag '_{category}.{item}' repeated in the same row"),
        });
    }
    handler.produce_item(&category, &item, field_from_token(&value_tok));
    let next = lexer.next_token()?;
    Ok((category, item, next))
}

/// Parses `loop := LOOP tag+ value+`; the value count must be a positive
/// multiple of the tag count (§4.3). `strict` rejects a tag declared twice
/// in the same loop header.
fn parse_loop(lexer: &mut Lexer<'_>, handler: &mut dyn SacHandler, current_category: &mut String, strict: bool) -> Result<Token> {
    let mut tok = lexer.next_token()?;
    let mut tags = Vec::new();
    while tok.kind == TokenKind::Tag {
        tags.push(resolve_tag(&tok.text, current_category));
        tok = lexer.next_token()?;
    }
    if tags.is_empty() {
        return Err(CifError::Parse {
            line: tok.line,
            message: "loop_ declares no tags".to_string(),
        });
    }
    if strict {
        let mut seen = HashSet::new();
        for (cat, item) in &tags {
            if !seen.insert((cat.clone(), item.clone())) {
                return Err(CifError::Parse {
                    line: tok.line,
                    message: format!("loop_ declares tag '_{cat}.{item}' more than once"),
                });
            }
        }
    }

    let category = tags[0].0.clone();
    *current_category = category.clone();
    handler.produce_category(&category);

    let mut values = Vec::new();
    while tok.kind == TokenKind::Value {
        values.push(field_from_token(&tok));
        tok = lexer.next_token()?;
    }
    if values.is_empty() || values.len() % tags.len() != 0 {
        return Err(CifError::Parse {
            line: tok.line,
            message: format!(
                "loop_ value count ({}) is not a positive multiple of its tag count ({})",
                values.len(),
                tags.len()
            ),
        });
    }

    for chunk in values.chunks(tags.len()) {
        handler.produce_row();
        for ((_, item), value) in tags.iter().zip(chunk.iter()) {
            handler.produce_item(&category, item, value.clone());
        }
    }

    Ok(tok)
}

/// A handler that discards everything it's told — used to walk past
/// `global_` blocks without allocating anywhere to put their items.
struct NullHandler;
impl SacHandler for NullHandler {
    fn produce_datablock(&mut self, _name: &str) {}
    fn produce_save_frame_start(&mut self, _name: &str) {}
    fn produce_save_frame_end(&mut self) {}
    fn produce_category(&mut self, _name: &str) {}
    fn produce_row(&mut self) {}
    fn produce_item(&mut self, _category: &str, _item: &str, _value: Field) {}
}

/// The default [`SacHandler`]: builds a plain [`File`] with no attached
/// schema, exactly what [`crate::model::file::File::load`] hands back
/// before a dictionary is attached.
struct ModelBuilder {
    datablocks: Vec<Datablock>,
    in_save_frame: bool,
    current_category: String,
    current_row: Option<RowId>,
}

impl ModelBuilder {
    fn new() -> Self {
        ModelBuilder {
            datablocks: Vec::new(),
            in_save_frame: false,
            current_category: String::new(),
            current_row: None,
        }
    }

    fn last_datablock_mut(&mut self) -> &mut Datablock {
        self.datablocks
            .last_mut()
            .expect("parser invariant: produce_item cannot precede produce_datablock")
    }

    fn active_category_mut(&mut self) -> &mut Category {
        let cat_name = self.current_category.clone();
        if self.in_save_frame {
            let block = self.last_datablock_mut();
            let frame = block
                .save_frames_mut()
                .last_mut()
                .expect("parser invariant: in_save_frame implies a pushed SaveFrame");
            frame.category_mut(&cat_name)
        } else {
            self.last_datablock_mut().category_mut(&cat_name)
        }
    }

    fn finish(self) -> File {
        File::from_datablocks(self.datablocks)
    }
}

impl SacHandler for ModelBuilder {
    fn produce_datablock(&mut self, name: &str) {
        self.datablocks.push(Datablock::new(name));
        self.in_save_frame = false;
        self.current_category.clear();
        self.current_row = None;
    }

    fn produce_save_frame_start(&mut self, name: &str) {
        self.last_datablock_mut().save_frames_mut().push(SaveFrame::new(name));
        self.in_save_frame = true;
        self.current_category.clear();
        self.current_row = None;
    }

    fn produce_save_frame_end(&mut self) {
        self.in_save_frame = false;
        self.current_category.clear();
        self.current_row = None;
    }

    fn produce_category(&mut self, name: &str) {
        self.current_category = name.to_string();
        self.current_row = None;
    }

    fn produce_row(&mut self) {
        let id = self
            .active_category_mut()
            .emplace(Vec::new())
            .expect("a category with no schema attached yet has no key items, so emplace cannot fail");
        self.current_row = Some(id);
    }

    fn produce_item(&mut self, _category: &str, item: &str, value: Field) {
        let row = self
            .current_row
            .expect("parser invariant: produce_item cannot precede produce_row");
        self.active_category_mut()
            .set_value(row, item, value)
            .expect("a category with no schema attached yet has no key items, so set_value cannot fail");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_row_category() {
        let file = parse("data_test\n_cell.length_a 12.3\n_cell.length_b 45.6\n").unwrap();
        let block = file.datablock("test").unwrap();
        let cell = block.category("cell").unwrap();
        assert_eq!(cell.row_count(), 1);
        let row = cell.row_ids()[0];
        assert_eq!(cell.get_value(row, "length_a").unwrap().as_text(), "12.3");
        assert_eq!(cell.get_value(row, "length_b").unwrap().as_text(), "45.6");
    }

    #[test]
    fn parses_loop_into_multiple_rows() {
        let file = parse("data_test\nloop_\n_atom_site.id\n_atom_site.label\n1 CA\n2 CB\n").unwrap();
        let block = file.datablock("test").unwrap();
        let atom_site = block.category("atom_site").unwrap();
        assert_eq!(atom_site.row_count(), 2);
    }

    #[test]
    fn rejects_loop_value_count_not_multiple_of_tags() {
        let err = parse("data_test\nloop_\n_a.x\n_a.y\n1 2 3\n").unwrap_err();
        assert!(matches!(err, CifError::Parse { .. }));
    }

    #[test]
    fn parses_nested_save_frame() {
        let file = parse("data_dict\nsave_my_cat\n_category.id my_cat\nsave_\n").unwrap();
        let block = file.datablock("dict").unwrap();
        let frame = block.save_frame("my_cat").unwrap();
        let cat = frame.category("category").unwrap();
        assert_eq!(cat.get_value(cat.row_ids()[0], "id").unwrap().as_text(), "my_cat");
    }

    #[test]
    fn index_datablocks_lists_names_in_order() {
        let idx = index_datablocks("data_one\n_a.b 1\ndata_two\n_a.b 2\n").unwrap();
        let names: Vec<&str> = idx.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["one", "two"]);
    }

    #[test]
    fn null_markers_round_trip_as_fields() {
        let file = parse("data_test\n_a.x ?\n_a.y .\n").unwrap();
        let cat = file.datablock("test").unwrap().category("a").unwrap();
        let row = cat.row_ids()[0];
        assert!(cat.get_value(row, "x").unwrap().is_unknown());
        assert!(cat.get_value(row, "y").unwrap().is_inapplicable());
    }

    #[test]
    fn lenient_parse_lets_a_repeated_tag_overwrite() {
        let file = parse("data_test\n_a.x 1\n_a.x 2\n").unwrap();
        let cat = file.datablock("test").unwrap().category("a").unwrap();
        assert_eq!(cat.row_count(), 1);
        assert_eq!(cat.get_value(cat.row_ids()[0], "x").unwrap().as_text(), "2");
    }

    #[test]
    fn strict_parse_rejects_a_tag_repeated_in_one_row() {
        let err = parse_with_options("data_test\n_a.x 1\n_a.x 2\n", true).unwrap_err();
        assert!(matches!(err, CifError::Parse { .. }));
    }

    #[test]
    fn strict_parse_rejects_a_tag_repeated_in_a_loop_header() {
        let err = parse_with_options("data_test\nloop_\n_a.x\n_a.x\n1 2\n", true).unwrap_err();
        assert!(matches!(err, CifError::Parse { .. }));
    }

    #[test]
    fn strict_parse_still_accepts_well_formed_input() {
        let file = parse_with_options("data_test\nloop_\n_a.x\n_a.y\n1 2\n3 4\n", true).unwrap();
        let cat = file.datablock("test").unwrap().category("a").unwrap();
        assert_eq!(cat.row_count(), 2);
    }
}
