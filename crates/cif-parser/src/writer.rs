//! The CIF-text serializer (§4.4.5), grounded on `Category::write`/
//! `Datablock::write` in `original_source/src/Category.cpp`.
//!
//! Per category: a single row is written as `_cat.tag value` pairs, one
//! per line; more than one row is written as a `loop_` block with
//! per-column widths computed from the longest rendered value in that
//! column. Values are quoted with whichever of `'`/`"` doesn't occur
//! mid-value followed by blank/EOF; multi-line values always become a
//! `;`-delimited text field starting on its own line. Categories are
//! separated by a `# ` marker line (§6).

use super::category::Category;
use super::datablock::Datablock;
use super::file::File;
use super::frame::SaveFrame;
use super::row::{Field, RowId};
use crate::text::is_unquoted_string;

const SOFT_LIMIT: usize = 132;

pub fn write_file(file: &File) -> String {
    let mut out = String::new();
    for block in file.datablocks() {
        write_datablock(&mut out, block);
    }
    out
}

fn write_datablock(out: &mut String, block: &Datablock) {
    out.push_str("data_");
    out.push_str(block.name());
    out.push('\n');
    for cat in block.categories() {
        write_category(out, cat);
    }
    for frame in block.save_frames() {
        write_save_frame(out, frame);
    }
}

fn write_save_frame(out: &mut String, frame: &SaveFrame) {
    out.push_str("save_");
    out.push_str(frame.name());
    out.push('\n');
    for cat in frame.categories() {
        write_category(out, cat);
    }
    out.push_str("save_\n");
}

fn write_category(out: &mut String, cat: &Category) {
    if cat.row_count() == 0 {
        return;
    }
    out.push_str("# \n");
    let rows = cat.row_ids();
    if rows.len() == 1 {
        write_single_row(out, cat, rows[0]);
    } else {
        write_loop(out, cat, &rows);
    }
}

fn write_single_row(out: &mut String, cat: &Category, row: RowId) {
    for item in cat.item_names() {
        let tag = format!("_{}.{}", cat.name(), item);
        let value = cat.get_value(row, item).cloned().unwrap_or_else(Field::inapplicable);
        match render(&value) {
            Rendered::Inline(s) => {
                let line_len = tag.len() + 1 + s.len();
                out.push_str(&tag);
                if line_len <= SOFT_LIMIT {
                    out.push(' ');
                    out.push_str(&s);
                    out.push('\n');
                } else {
                    out.push('\n');
                    write_text_field(out, value.as_text());
                }
            }
            Rendered::Text(t) => {
                out.push_str(&tag);
                out.push('\n');
                write_text_field(out, &t);
            }
        }
    }
}

fn write_loop(out: &mut String, cat: &Category, rows: &[RowId]) {
    out.push_str("loop_\n");
    let items = cat.item_names();
    for item in items {
        out.push('_');
        out.push_str(cat.name());
        out.push('.');
        out.push_str(item);
        out.push('\n');
    }

    let mut widths = vec![0usize; items.len()];
    let mut all_rendered: Vec<Vec<Rendered>> = Vec::with_capacity(rows.len());
    for &row in rows {
        let mut row_cells = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let value = cat.get_value(row, item).cloned().unwrap_or_else(Field::inapplicable);
            let rendered = render(&value);
            if let Rendered::Inline(s) = &rendered {
                widths[i] = widths[i].max(s.len().min(SOFT_LIMIT));
            }
            row_cells.push(rendered);
        }
        all_rendered.push(row_cells);
    }

    for row_cells in all_rendered {
        let mut line = String::new();
        let last = row_cells.len().saturating_sub(1);
        for (i, rendered) in row_cells.into_iter().enumerate() {
            match rendered {
                Rendered::Inline(s) => {
                    if !line.is_empty() {
                        line.push(' ');
                    }
                    line.push_str(&s);
                    if i != last {
                        let pad = widths[i].saturating_sub(s.len());
                        line.push_str(&" ".repeat(pad));
                    }
                }
                Rendered::Text(t) => {
                    if !line.is_empty() {
                        out.push_str(line.trim_end());
                        out.push('\n');
                        line.clear();
                    }
                    write_text_field(out, &t);
                }
            }
        }
        if !line.is_empty() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }
}

enum Rendered {
    Inline(String),
    Text(String),
}

/// Decides how to render one field's text: bare (unquoted), quoted inline,
/// or as a `;`-delimited text field.
fn render(value: &Field) -> Rendered {
    if value.is_null() {
        return Rendered::Inline(value.as_text().to_string());
    }
    let text = value.as_text();
    if text.is_empty() {
        // A bare empty token isn't representable; an empty quoted string
        // preserves the stored-empty state distinctly from "." / "?".
        return Rendered::Inline("''".to_string());
    }
    if text.contains('\n') {
        return Rendered::Text(text.to_string());
    }
    if is_unquoted_string(text) && !needs_quoting_regardless(text) {
        return Rendered::Inline(text.to_string());
    }
    match pick_quote(text) {
        Some(q) => Rendered::Inline(format!("{q}{text}{q}")),
        None => Rendered::Text(text.to_string()),
    }
}

/// Values that would otherwise pass [`is_unquoted_string`] but must still
/// be quoted because their bare form is a reserved keyword or would be
/// mistaken for a null marker on re-parse.
fn needs_quoting_regardless(text: &str) -> bool {
    text == "?"
        || text == "."
        || text.eq_ignore_ascii_case("loop_")
        || text.eq_ignore_ascii_case("stop_")
        || text.eq_ignore_ascii_case("global_")
        || text.len() >= 5 && text[..5].eq_ignore_ascii_case("data_")
        || text.len() >= 5 && text[..5].eq_ignore_ascii_case("save_")
}

fn pick_quote(text: &str) -> Option<char> {
    for q in ['\'', '"'] {
        if !contains_quote_followed_by_blank(text, q) {
            return Some(q);
        }
    }
    None
}

fn contains_quote_followed_by_blank(text: &str, quote: char) -> bool {
    let bytes = text.as_bytes();
    let q = quote as u8;
    for (i, &b) in bytes.iter().enumerate() {
        if b == q {
            match bytes.get(i + 1) {
                None => return true,
                Some(&next) if next.is_ascii_whitespace() => return true,
                _ => {}
            }
        }
    }
    false
}

/// Writes `text` as a `;`-delimited text field (§4.2/§4.4.5), escaping any
/// payload line that would otherwise start with `;`.
fn write_text_field(out: &mut String, text: &str) {
    out.push(';');
    let mut first = true;
    for line in text.split('\n') {
        if first {
            out.push_str(line);
            first = false;
            continue;
        }
        out.push('\n');
        if let Some(rest) = line.strip_prefix(';') {
            out.push_str("\\;");
            out.push_str(rest);
        } else {
            out.push_str(line);
        }
    }
    out.push('\n');
    out.push_str(";\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::category::Category;

    fn row(pairs: &[(&str, &str)]) -> Vec<(String, Field)> {
        pairs.iter().map(|(n, v)| (n.to_string(), Field::from(*v))).collect()
    }

    #[test]
    fn single_row_category_writes_tag_value_pairs() {
        let mut cat = Category::new("cell");
        cat.emplace(row(&[("length_a", "12.3"), ("length_b", "45.6")])).unwrap();
        let mut out = String::new();
        write_category(&mut out, &cat);
        assert!(out.contains("_cell.length_a 12.3"));
        assert!(out.contains("_cell.length_b 45.6"));
    }

    #[test]
    fn loop_category_writes_loop_block() {
        let mut cat = Category::new("atom_site");
        cat.emplace(row(&[("id", "1"), ("label", "CA")])).unwrap();
        cat.emplace(row(&[("id", "2"), ("label", "CB")])).unwrap();
        let mut out = String::new();
        write_category(&mut out, &cat);
        assert!(out.starts_with("# \nloop_\n_atom_site.id\n_atom_site.label\n"));
        assert!(out.contains("1 CA"));
        assert!(out.contains("2 CB"));
    }

    #[test]
    fn value_needing_quotes_is_quoted() {
        let mut cat = Category::new("a");
        cat.emplace(row(&[("x", "has space")])).unwrap();
        let mut out = String::new();
        write_category(&mut out, &cat);
        assert!(out.contains("'has space'"));
    }

    #[test]
    fn multiline_value_becomes_text_field() {
        let mut cat = Category::new("a");
        cat.emplace(vec![("x".to_string(), Field::Text("line one\nline two".to_string()))])
            .unwrap();
        let mut out = String::new();
        write_category(&mut out, &cat);
        assert!(out.contains(";line one\nline two\n;\n"));
    }

    #[test]
    fn literal_question_mark_is_quoted_not_bare() {
        let mut cat = Category::new("a");
        cat.emplace(vec![("x".to_string(), Field::Text("?".to_string()))]).unwrap();
        let mut out = String::new();
        write_category(&mut out, &cat);
        assert!(out.contains("'?'"));
    }
}
