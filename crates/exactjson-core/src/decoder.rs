//! JSON decoder — UTF-8 text → [`Value`] tree.
//!
//! A recursive-descent parser over the raw bytes, tracking the byte offset
//! for diagnostics. It accepts exactly one top-level value surrounded by
//! optional whitespace and enforces the strict JSON grammar: no trailing
//! commas, no comments, no leading zeros, no raw control characters inside
//! strings. Beyond the bare grammar it carries the conventions of the
//! framework library it reimplements:
//!
//! - Integer literals keep every digit: values outside `i64` become
//!   [`Value::BigInt`] instead of truncating or turning into floats.
//! - Duplicate object keys are accepted; the latest occurrence wins both the
//!   value and the ordering slot (see [`Object::insert`]).
//! - With [`DecodeOptions::datetime_strings`] set, string values shaped like
//!   ISO-8601 datetimes decode to [`Value::DateTime`].
//! - A grammar-valid exponent too large for `f64` (`1e999`) saturates to an
//!   infinite float rather than failing, matching the reference behavior.
//!
//! # Key design decisions
//!
//! - **Byte cursor, char-boundary slices**: the cursor advances per byte, but
//!   string content is copied in contiguous runs delimited by `"`/`\`/control
//!   bytes, which never occur inside a multi-byte UTF-8 sequence, so every
//!   slice is boundary-safe.
//! - **Depth as a call argument**: nesting depth rides the recursion instead
//!   of parser state, so a failed subtree cannot leave a stale count behind.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use num_bigint::BigInt;

use crate::error::{DecodeResult, ParseError};
use crate::types::{Object, Value};

/// Knobs for a decode call. `Default` matches the reference library:
/// datetime recognition off, 128 levels of nesting.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Maximum container nesting before the parser fails with
    /// [`ParseError::DepthExceeded`] instead of overflowing the call stack.
    pub max_depth: usize,
    /// Promote string values shaped like `YYYY-MM-DDTHH:MM:SS[.f][Z|±HH:MM]`
    /// to [`Value::DateTime`]. Keys are never promoted.
    pub datetime_strings: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            max_depth: 128,
            datetime_strings: false,
        }
    }
}

/// Decode a complete JSON document with default options.
///
/// The input must contain exactly one top-level value; anything other than
/// whitespace after it fails with [`ParseError::TrailingContent`].
pub fn decode(text: &str) -> DecodeResult<Value> {
    decode_with(text, &DecodeOptions::default())
}

/// Decode a complete JSON document with explicit options.
pub fn decode_with(text: &str, options: &DecodeOptions) -> DecodeResult<Value> {
    let mut parser = Parser {
        input: text,
        bytes: text.as_bytes(),
        pos: 0,
        options,
    };
    parser.skip_whitespace();
    let value = parser.parse_value(0)?;
    parser.skip_whitespace();
    if parser.pos < parser.bytes.len() {
        return Err(ParseError::TrailingContent { offset: parser.pos });
    }
    Ok(value)
}

/// Decode from raw bytes, validating UTF-8 first.
///
/// This is the only path that can produce [`ParseError::InvalidUtf8`]; the
/// offset is the length of the longest valid prefix.
pub fn decode_bytes(bytes: &[u8]) -> DecodeResult<Value> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })?;
    decode(text)
}

struct Parser<'a, 'o> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
    options: &'o DecodeOptions,
}

impl Parser<'_, '_> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    /// The character starting at `offset`, for diagnostics.
    fn char_at(&self, offset: usize) -> char {
        self.input
            .get(offset..)
            .and_then(|s| s.chars().next())
            .unwrap_or('\u{fffd}')
    }

    fn unexpected(&self, offset: usize) -> ParseError {
        ParseError::UnexpectedToken {
            offset,
            found: self.char_at(offset),
        }
    }

    fn end_of_input(&self) -> ParseError {
        ParseError::UnexpectedEndOfInput { offset: self.pos }
    }

    /// Dispatch on the first byte of a value.
    fn parse_value(&mut self, depth: usize) -> DecodeResult<Value> {
        match self.peek() {
            None => Err(self.end_of_input()),
            Some(b'{') => self.parse_object(depth),
            Some(b'[') => self.parse_array(depth),
            Some(b'"') => {
                let s = self.parse_string()?;
                Ok(self.string_value(s))
            }
            Some(b't' | b'f' | b'n') => self.parse_literal(),
            Some(b'-' | b'0'..=b'9') => self.parse_number(),
            Some(_) => Err(self.unexpected(self.pos)),
        }
    }

    fn check_depth(&self, depth: usize) -> DecodeResult<()> {
        if depth >= self.options.max_depth {
            return Err(ParseError::DepthExceeded {
                offset: self.pos,
                limit: self.options.max_depth,
            });
        }
        Ok(())
    }

    /// `{` already peeked. Duplicate keys go through [`Object::insert`],
    /// which keeps the last occurrence.
    fn parse_object(&mut self, depth: usize) -> DecodeResult<Value> {
        self.check_depth(depth)?;
        self.pos += 1;
        let mut object = Object::new();
        self.skip_whitespace();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(Value::object(object));
        }
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(b'"') => {}
                Some(_) => return Err(self.unexpected(self.pos)),
                None => return Err(self.end_of_input()),
            }
            let key = self.parse_string()?;
            self.skip_whitespace();
            match self.peek() {
                Some(b':') => self.pos += 1,
                Some(_) => return Err(self.unexpected(self.pos)),
                None => return Err(self.end_of_input()),
            }
            self.skip_whitespace();
            let value = self.parse_value(depth + 1)?;
            object.insert(key, value);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::object(object));
                }
                Some(_) => return Err(self.unexpected(self.pos)),
                None => return Err(self.end_of_input()),
            }
        }
    }

    /// `[` already peeked. A comma followed by `]` fails at the `]`, which is
    /// what rejects trailing commas.
    fn parse_array(&mut self, depth: usize) -> DecodeResult<Value> {
        self.check_depth(depth)?;
        self.pos += 1;
        let mut items = Vec::new();
        self.skip_whitespace();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(Value::array(items));
        }
        loop {
            self.skip_whitespace();
            items.push(self.parse_value(depth + 1)?);
            self.skip_whitespace();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(Value::array(items));
                }
                Some(_) => return Err(self.unexpected(self.pos)),
                None => return Err(self.end_of_input()),
            }
        }
    }

    /// Exact lowercase `true` / `false` / `null`. A proper prefix cut short
    /// by the end of input reports `UnexpectedEndOfInput`, not a bad token.
    fn parse_literal(&mut self) -> DecodeResult<Value> {
        let (text, value) = match self.bytes[self.pos] {
            b't' => ("true", Value::Bool(true)),
            b'f' => ("false", Value::Bool(false)),
            _ => ("null", Value::Null),
        };
        let start = self.pos;
        let remaining = &self.bytes[start..];
        if remaining.len() < text.len() {
            if text.as_bytes().starts_with(remaining) {
                self.pos = self.bytes.len();
                return Err(self.end_of_input());
            }
            return Err(self.unexpected(start));
        }
        if &remaining[..text.len()] != text.as_bytes() {
            return Err(self.unexpected(start));
        }
        self.pos += text.len();
        Ok(value)
    }

    /// JSON number grammar: `-? (0 | [1-9][0-9]*) (\.[0-9]+)? ([eE][+-]?[0-9]+)?`.
    ///
    /// A literal with no fraction and no exponent is an integer and keeps
    /// every digit — `i64` when it fits, `BigInt` past that. Everything else
    /// is a float.
    fn parse_number(&mut self) -> DecodeResult<Value> {
        let start = self.pos;
        let mut is_float = false;

        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                if matches!(self.peek(), Some(b'0'..=b'9')) {
                    return Err(self.number_error(start));
                }
            }
            Some(b'1'..=b'9') => {
                self.pos += 1;
                self.skip_digits();
            }
            _ => return Err(self.number_error(start)),
        }
        if self.peek() == Some(b'.') {
            is_float = true;
            self.pos += 1;
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.number_error(start));
            }
            self.skip_digits();
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            is_float = true;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.pos += 1;
            }
            if !matches!(self.peek(), Some(b'0'..=b'9')) {
                return Err(self.number_error(start));
            }
            self.skip_digits();
        }

        let literal = &self.input[start..self.pos];
        if is_float {
            // Out-of-range magnitudes saturate to ±inf here; the default
            // encode policy will then refuse them.
            let f: f64 = literal.parse().map_err(|_| self.number_error(start))?;
            Ok(Value::Float(f))
        } else if let Ok(i) = literal.parse::<i64>() {
            Ok(Value::Int(i))
        } else {
            let n: BigInt = literal.parse().map_err(|_| self.number_error(start))?;
            Ok(Value::BigInt(n))
        }
    }

    fn skip_digits(&mut self) {
        while matches!(self.peek(), Some(b'0'..=b'9')) {
            self.pos += 1;
        }
    }

    /// Extend the reported literal through the rest of the number-ish run so
    /// the diagnostic shows the whole malformed token, not just its prefix.
    fn number_error(&self, start: usize) -> ParseError {
        let mut end = self.pos;
        while end < self.bytes.len()
            && matches!(self.bytes[end], b'0'..=b'9' | b'.' | b'e' | b'E' | b'+' | b'-')
        {
            end += 1;
        }
        ParseError::InvalidNumber {
            offset: start,
            literal: self.input[start..end].to_string(),
        }
    }

    /// `"` already peeked. Content is copied in contiguous runs between
    /// escapes; raw control characters are a syntax error.
    fn parse_string(&mut self) -> DecodeResult<String> {
        self.pos += 1;
        let mut buf = String::new();
        let mut run_start = self.pos;
        loop {
            match self.peek() {
                None => return Err(self.end_of_input()),
                Some(b'"') => {
                    buf.push_str(&self.input[run_start..self.pos]);
                    self.pos += 1;
                    return Ok(buf);
                }
                Some(b'\\') => {
                    buf.push_str(&self.input[run_start..self.pos]);
                    self.pos += 1;
                    self.parse_escape(&mut buf)?;
                    run_start = self.pos;
                }
                Some(b) if b < 0x20 => return Err(self.unexpected(self.pos)),
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Cursor sits just past the backslash.
    fn parse_escape(&mut self, buf: &mut String) -> DecodeResult<()> {
        let escape_pos = self.pos - 1;
        let Some(b) = self.peek() else {
            return Err(self.end_of_input());
        };
        self.pos += 1;
        match b {
            b'"' => buf.push('"'),
            b'\\' => buf.push('\\'),
            b'/' => buf.push('/'),
            b'b' => buf.push('\u{0008}'),
            b'f' => buf.push('\u{000c}'),
            b'n' => buf.push('\n'),
            b'r' => buf.push('\r'),
            b't' => buf.push('\t'),
            b'u' => {
                let unit = self.parse_hex4(escape_pos)?;
                if (0xD800..=0xDBFF).contains(&unit) {
                    // High surrogate: a low half must follow immediately.
                    if self.peek() != Some(b'\\') || self.bytes.get(self.pos + 1) != Some(&b'u') {
                        return Err(ParseError::InvalidEscape {
                            offset: escape_pos,
                            reason: format!("unpaired high surrogate \\u{unit:04x}"),
                        });
                    }
                    self.pos += 2;
                    let low = self.parse_hex4(escape_pos)?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(ParseError::InvalidEscape {
                            offset: escape_pos,
                            reason: format!("expected low surrogate, found \\u{low:04x}"),
                        });
                    }
                    let combined =
                        0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                    match char::from_u32(combined) {
                        Some(c) => buf.push(c),
                        None => {
                            return Err(ParseError::InvalidEscape {
                                offset: escape_pos,
                                reason: format!("surrogate pair outside Unicode: {combined:#x}"),
                            })
                        }
                    }
                } else if (0xDC00..=0xDFFF).contains(&unit) {
                    return Err(ParseError::InvalidEscape {
                        offset: escape_pos,
                        reason: format!("lone low surrogate \\u{unit:04x}"),
                    });
                } else {
                    match char::from_u32(u32::from(unit)) {
                        Some(c) => buf.push(c),
                        None => {
                            return Err(ParseError::InvalidEscape {
                                offset: escape_pos,
                                reason: format!("invalid code point \\u{unit:04x}"),
                            })
                        }
                    }
                }
            }
            _ => {
                return Err(ParseError::InvalidEscape {
                    offset: escape_pos,
                    reason: format!("unrecognized escape {:?}", self.char_at(escape_pos + 1)),
                })
            }
        }
        Ok(())
    }

    /// Four ASCII hex digits after `\u`.
    fn parse_hex4(&mut self, escape_pos: usize) -> DecodeResult<u16> {
        if self.pos + 4 > self.bytes.len() {
            self.pos = self.bytes.len();
            return Err(self.end_of_input());
        }
        let digits = &self.bytes[self.pos..self.pos + 4];
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return Err(ParseError::InvalidEscape {
                offset: escape_pos,
                reason: "expected four hex digits after \\u".to_string(),
            });
        }
        let unit = u16::from_str_radix(&self.input[self.pos..self.pos + 4], 16).map_err(|_| {
            ParseError::InvalidEscape {
                offset: escape_pos,
                reason: "expected four hex digits after \\u".to_string(),
            }
        })?;
        self.pos += 4;
        Ok(unit)
    }

    /// Value-position strings only: keys never become datetimes.
    fn string_value(&self, s: String) -> Value {
        if self.options.datetime_strings {
            if let Some(dt) = parse_datetime(&s) {
                return Value::DateTime(dt);
            }
        }
        Value::String(s)
    }
}

/// Recognize the ISO-8601 extended shape `YYYY-MM-DDTHH:MM:SS[.f][Z|±HH:MM]`.
/// A zoneless form is taken as UTC; anything else stays a plain string.
fn parse_datetime(s: &str) -> Option<DateTime<FixedOffset>> {
    let b = s.as_bytes();
    if b.len() < 19
        || b[4] != b'-'
        || b[7] != b'-'
        || b[10] != b'T'
        || b[13] != b':'
        || b[16] != b':'
        || !b[..4].iter().all(u8::is_ascii_digit)
    {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc().fixed_offset())
}
