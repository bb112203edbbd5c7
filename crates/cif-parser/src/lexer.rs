//! Hand-written tokenizer (§4.2), grounded on `SacParser::getNextChar` /
//! `getNextToken` in `original_source/include/cif++/CifParser.hpp`. A
//! character-level state machine rather than a generated grammar: CIF's
//! token grammar is irregular enough (text fields keyed off column 1,
//! quote-matching that depends on the following byte) that a PEG grammar
//! fights the format more than it helps, which is also why this crate
//! doesn't carry a `pest` dependency the way the teacher repo did.

use crate::text::{is_any_print, is_non_blank, is_ordinary, is_white};
use crate::token::{Token, TokenKind, ValueKind};

/// Streaming, single-character-pushback tokenizer over an in-memory buffer.
///
/// Bytes rather than `char`s: CIF is specified as ASCII (§4.1), and working
/// byte-wise keeps `retract()` (a single-slot pushback, mirroring
/// `SacParser::retract`) trivial.
pub struct Lexer<'a> {
    data: &'a [u8],
    pos: usize,
    pushed_back: Option<u8>,
    line: u32,
    at_line_start: bool,
}

const EOF: i32 = -1;

impl<'a> Lexer<'a> {
    pub fn new(data: &'a str) -> Self {
        Lexer {
            data: data.as_bytes(),
            pos: 0,
            pushed_back: None,
            line: 1,
            at_line_start: true,
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current byte offset into the input, accounting for any pushed-back
    /// byte not yet re-consumed. Used by [`crate::parser::index_datablocks`]
    /// to record approximate datablock offsets.
    pub fn byte_pos(&self) -> usize {
        self.pos - if self.pushed_back.is_some() { 1 } else { 0 }
    }

    fn get_next_char(&mut self) -> i32 {
        if let Some(b) = self.pushed_back.take() {
            return b as i32;
        }
        if self.pos >= self.data.len() {
            return EOF;
        }
        let b = self.data[self.pos];
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        b as i32
    }

    fn retract(&mut self, ch: i32) {
        if ch != EOF {
            debug_assert!(self.pushed_back.is_none(), "lexer only supports one-byte pushback");
            if ch == b'\n' as i32 {
                self.line -= 1;
            }
            self.pushed_back = Some(ch as u8);
        }
    }

    /// Reads the rest of the current physical line, not including the
    /// terminating `\n`. Used for text-field bodies.
    fn read_rest_of_line(&mut self) -> String {
        let mut out = Vec::new();
        loop {
            let ch = self.get_next_char();
            if ch == EOF || ch == b'\n' as i32 {
                if ch == b'\n' as i32 {
                    self.retract(ch);
                }
                break;
            }
            out.push(ch as u8);
        }
        String::from_utf8_lossy(&out).trim_end_matches('\r').to_string()
    }

    /// Produces the next token, skipping whitespace and `#` comments.
    pub fn next_token(&mut self) -> Result<Token, crate::error::CifError> {
        loop {
            let start_line = self.line;
            let bol = self.at_line_start;
            let ch = self.get_next_char();

            if ch == EOF {
                return Ok(Token::new(TokenKind::Eof, start_line, ""));
            }

            if ch == b'\n' as i32 {
                self.at_line_start = true;
                continue;
            }
            self.at_line_start = false;

            if ch == b'#' as i32 {
                // comment: consume to end of line
                while {
                    let c = self.get_next_char();
                    c != EOF && c != b'\n' as i32
                } {}
                self.at_line_start = true;
                continue;
            }

            if (ch as u8 as char).is_ascii_whitespace() {
                continue;
            }

            if bol && ch == b';' as i32 {
                return Ok(self.lex_text_field(start_line));
            }

            if ch == b'\'' as i32 || ch == b'"' as i32 {
                return Ok(self.lex_quoted_string(ch as u8, start_line));
            }

            if ch == b'?' as i32 {
                let next = self.get_next_char();
                if next == EOF || is_white(next as u8) {
                    self.retract(next);
                    return Ok(Token::value(start_line, "?", ValueKind::Unknown));
                }
                self.retract(next);
                return Ok(self.lex_unquoted_string(ch as u8, start_line));
            }

            if ch == b'.' as i32 {
                let next = self.get_next_char();
                if next == EOF || is_white(next as u8) {
                    self.retract(next);
                    return Ok(Token::value(start_line, ".", ValueKind::Inapplicable));
                }
                self.retract(next);
                return Ok(self.lex_unquoted_string(ch as u8, start_line));
            }

            if !is_ordinary(ch as u8) {
                return Err(crate::error::CifError::Lex {
                    line: start_line,
                    message: format!("unexpected character {:?}", ch as u8 as char),
                });
            }

            return Ok(self.lex_unquoted_string(ch as u8, start_line));
        }
    }

    fn lex_quoted_string(&mut self, quote: u8, line: u32) -> Token {
        let mut out = Vec::new();
        loop {
            let ch = self.get_next_char();
            if ch == EOF {
                break;
            }
            if ch == quote as i32 {
                let next = self.get_next_char();
                if next == EOF || is_white(next as u8) {
                    self.retract(next);
                    break;
                }
                // embedded quote followed by non-blank: part of the string
                out.push(ch as u8);
                self.retract(next);
                continue;
            }
            if !is_any_print(ch as u8) && ch != b'\n' as i32 {
                continue;
            }
            out.push(ch as u8);
        }
        Token::value(line, String::from_utf8_lossy(&out).into_owned(), ValueKind::QuotedString)
    }

    fn lex_unquoted_string(&mut self, first: u8, line: u32) -> Token {
        let mut out = vec![first];
        loop {
            let ch = self.get_next_char();
            if ch == EOF || !is_non_blank(ch as u8) {
                self.retract(ch);
                break;
            }
            out.push(ch as u8);
        }
        let text = String::from_utf8_lossy(&out).into_owned();

        if text.starts_with('_') {
            return Token::new(TokenKind::Tag, line, text);
        }
        let lower = crate::text::to_lower(&text);
        match lower.as_str() {
            "loop_" => Token::new(TokenKind::Loop, line, text),
            "global_" => Token::new(TokenKind::Global, line, text),
            "stop_" => Token::new(TokenKind::Stop, line, text),
            _ if lower.starts_with("data_") => Token::new(TokenKind::DataBlockName, line, text[5..].to_string()),
            _ if lower.starts_with("save_") && text.len() > 5 => {
                Token::new(TokenKind::SaveFrameName, line, text[5..].to_string())
            }
            "save_" => Token::new(TokenKind::SaveFrameEnd, line, ""),
            _ => {
                let kind = classify_value(&text);
                Token::value(line, text, kind)
            }
        }
    }

    /// A payload line beginning with `;` at column 1 ends the field. A
    /// payload line beginning with `\;` is an escape for a literal `;`
    /// start (§4.2) — the backslash is stripped, the rest of the line
    /// stands.
    fn lex_text_field(&mut self, start_line: u32) -> Token {
        let mut lines = Vec::new();
        lines.push(self.read_rest_of_line());
        loop {
            let nl = self.get_next_char();
            if nl != b'\n' as i32 {
                self.retract(nl);
                break;
            }
            let ch = self.get_next_char();
            if ch == b';' as i32 {
                break;
            }
            if ch == b'\\' as i32 {
                let next = self.get_next_char();
                if next == b';' as i32 {
                    let mut line = String::from(";");
                    line.push_str(&self.read_rest_of_line());
                    lines.push(line);
                    continue;
                }
                self.retract(next);
                let mut line = String::from("\\");
                line.push_str(&self.read_rest_of_line());
                lines.push(line);
                continue;
            }
            if ch == EOF {
                break;
            }
            self.retract(ch);
            lines.push(self.read_rest_of_line());
        }
        Token::value(start_line, lines.join("\n"), ValueKind::TextField)
    }
}

/// Classifies an unquoted value's shape per §4.2: optional sign, optional
/// integer part, optional `.digits` fraction, optional `[eE][+-]?digits`
/// exponent, optional trailing `(digits)` standard-uncertainty suffix. A
/// pure integer is `Int`; a fraction or exponent makes it `Float`; an
/// su suffix on either makes it `Numeric`. Anything left over, or no digits
/// at all, falls back to `UnquotedString`.
fn classify_value(text: &str) -> ValueKind {
    let bytes = text.as_bytes();
    let n = bytes.len();
    let mut i = 0;

    if i < n && (bytes[i] == b'+' || bytes[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < n && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let has_int = i > int_start;

    let mut has_frac = false;
    if i < n && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < n && bytes[i].is_ascii_digit() {
            i += 1;
        }
        has_frac = i > frac_start;
    }
    if !has_int && !has_frac {
        return ValueKind::UnquotedString;
    }

    let mut has_exp = false;
    if i < n && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mark = i;
        let mut j = i + 1;
        if j < n && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        let exp_digit_start = j;
        while j < n && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_digit_start {
            has_exp = true;
            i = j;
        } else {
            i = mark;
        }
    }

    let mut has_su = false;
    if i < n && bytes[i] == b'(' {
        let mark = i;
        let mut j = i + 1;
        let su_start = j;
        while j < n && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > su_start && j < n && bytes[j] == b')' && j + 1 == n {
            has_su = true;
            i = j + 1;
        } else {
            i = mark;
        }
    }

    if i != n {
        return ValueKind::UnquotedString;
    }
    if has_su {
        ValueKind::Numeric
    } else if has_frac || has_exp {
        ValueKind::Float
    } else {
        ValueKind::Int
    }
}
