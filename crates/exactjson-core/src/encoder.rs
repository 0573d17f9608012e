//! JSON encoder — [`Value`] tree → UTF-8 text.
//!
//! Walks the tree recursively, emitting compact output by default (no
//! insignificant whitespace) or pretty output when an indent width is set.
//! The serialization rules carry the framework library's conventions rather
//! than the minimal grammar:
//!
//! - Integers print exactly at any magnitude; no 64-bit truncation.
//! - Finite floats use the shortest decimal that parses back to the same
//!   bits, with `.0` forced onto integral values so they stay floats on
//!   re-decode.
//! - `/` is escaped to `\/` by default; non-ASCII is literal UTF-8 unless
//!   ASCII-only mode is on, in which case it becomes lowercase `\uxxxx`
//!   (surrogate pairs above the BMP).
//! - Datetimes render as ISO-8601 extended strings with microsecond
//!   precision and a numeric offset.
//! - NaN and infinities are refused by default; the opt-in sentinel policy
//!   emits `null` the way the reference library's `as_json` does.
//!
//! # Key design decisions
//!
//! - **Identity path-set for cycles**: container addresses on the active
//!   recursion path live in a stack — pushed on entry, popped on exit — so a
//!   container that appears twice in *sibling* positions is fine while a
//!   container inside itself fails with `CyclicStructure`.
//! - **Breadcrumb paths in errors**: encode failures point at the offending
//!   value (`$.events[3].start`), since there is no byte offset to report.

use std::rc::Rc;

use crate::error::{EncodeError, EncodeResult};
use crate::types::{Object, Value};

/// Knobs for an encode call. `Default` is the framework convention: compact,
/// forward slashes escaped, literal UTF-8, non-finite floats refused.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
    /// Escape every non-ASCII character as `\uxxxx` instead of emitting
    /// literal UTF-8.
    pub ascii_only: bool,
    /// Pretty-print with this many spaces per nesting level; `None` means
    /// compact output.
    pub indent: Option<usize>,
    /// Emit `/` as `\/`. On by default — a library convention, not a
    /// grammar requirement.
    pub escape_forward_slash: bool,
    /// What to do with NaN and infinite floats.
    pub non_finite: NonFinitePolicy,
    /// Maximum container nesting before failing with
    /// [`EncodeError::DepthExceeded`].
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            ascii_only: false,
            indent: None,
            escape_forward_slash: true,
            non_finite: NonFinitePolicy::Fail,
            max_depth: 128,
        }
    }
}

/// Policy for floats that plain JSON cannot spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonFinitePolicy {
    /// Fail the call with [`EncodeError::NonFiniteNumber`].
    #[default]
    Fail,
    /// Emit the literal `null`, the reference library's sentinel.
    Null,
}

/// Encode a value tree with default options.
pub fn encode(value: &Value) -> EncodeResult<String> {
    encode_with(value, &EncodeOptions::default())
}

/// Encode a value tree with explicit options.
pub fn encode_with(value: &Value, options: &EncodeOptions) -> EncodeResult<String> {
    let mut encoder = Encoder {
        out: String::new(),
        options,
        active: Vec::new(),
        path: Vec::new(),
    };
    encoder.write_value(value, 0)?;
    Ok(encoder.out)
}

enum PathSegment {
    Key(String),
    Index(usize),
}

struct Encoder<'o> {
    out: String,
    options: &'o EncodeOptions,
    /// Addresses of the containers currently being encoded, outermost first.
    active: Vec<usize>,
    /// Breadcrumb to the value currently being encoded, for diagnostics.
    path: Vec<PathSegment>,
}

impl Encoder<'_> {
    fn write_value(&mut self, value: &Value, depth: usize) -> EncodeResult<()> {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(true) => self.out.push_str("true"),
            Value::Bool(false) => self.out.push_str("false"),
            Value::Int(i) => self.out.push_str(&i.to_string()),
            Value::BigInt(n) => self.out.push_str(&n.to_string()),
            Value::Float(f) => self.write_float(*f)?,
            Value::String(s) => self.write_string(s),
            Value::DateTime(dt) => {
                self.out.push('"');
                self.out
                    .push_str(&dt.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string());
                self.out.push('"');
            }
            Value::Array(items) => {
                self.enter(Rc::as_ptr(items) as usize, depth)?;
                let items = items.borrow();
                self.write_array(&items, depth)?;
                self.leave();
            }
            Value::Object(object) => {
                self.enter(Rc::as_ptr(object) as usize, depth)?;
                let object = object.borrow();
                self.write_object(&object, depth)?;
                self.leave();
            }
        }
        Ok(())
    }

    /// Guard a container: cycle check, depth check, then mark it active.
    fn enter(&mut self, container: usize, depth: usize) -> EncodeResult<()> {
        if self.active.contains(&container) {
            return Err(EncodeError::CyclicStructure {
                path: self.render_path(),
            });
        }
        if depth >= self.options.max_depth {
            return Err(EncodeError::DepthExceeded {
                path: self.render_path(),
                limit: self.options.max_depth,
            });
        }
        self.active.push(container);
        Ok(())
    }

    fn leave(&mut self) {
        self.active.pop();
    }

    fn write_array(&mut self, items: &[Value], depth: usize) -> EncodeResult<()> {
        if items.is_empty() {
            self.out.push_str("[]");
            return Ok(());
        }
        self.out.push('[');
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline_indent(depth + 1);
            self.path.push(PathSegment::Index(i));
            self.write_value(item, depth + 1)?;
            self.path.pop();
        }
        self.newline_indent(depth);
        self.out.push(']');
        Ok(())
    }

    fn write_object(&mut self, object: &Object, depth: usize) -> EncodeResult<()> {
        if object.is_empty() {
            self.out.push_str("{}");
            return Ok(());
        }
        self.out.push('{');
        for (i, (key, value)) in object.iter().enumerate() {
            if i > 0 {
                self.out.push(',');
            }
            self.newline_indent(depth + 1);
            self.write_string(key);
            self.out.push(':');
            if self.options.indent.is_some() {
                self.out.push(' ');
            }
            self.path.push(PathSegment::Key(key.clone()));
            self.write_value(value, depth + 1)?;
            self.path.pop();
        }
        self.newline_indent(depth);
        self.out.push('}');
        Ok(())
    }

    fn newline_indent(&mut self, depth: usize) {
        if let Some(width) = self.options.indent {
            self.out.push('\n');
            for _ in 0..depth * width {
                self.out.push(' ');
            }
        }
    }

    fn write_float(&mut self, f: f64) -> EncodeResult<()> {
        if !f.is_finite() {
            return match self.options.non_finite {
                NonFinitePolicy::Fail => Err(EncodeError::NonFiniteNumber {
                    path: self.render_path(),
                }),
                NonFinitePolicy::Null => {
                    self.out.push_str("null");
                    Ok(())
                }
            };
        }
        // `Display` for f64 is the shortest decimal that parses back to the
        // same bits, and never uses exponent form. Integral values print
        // without a point and would re-decode as integers, so force one on.
        let text = f.to_string();
        self.out.push_str(&text);
        if !text.contains('.') {
            self.out.push_str(".0");
        }
        Ok(())
    }

    fn write_string(&mut self, s: &str) {
        self.out.push('"');
        for c in s.chars() {
            match c {
                '"' => self.out.push_str("\\\""),
                '\\' => self.out.push_str("\\\\"),
                '/' if self.options.escape_forward_slash => self.out.push_str("\\/"),
                '\u{0008}' => self.out.push_str("\\b"),
                '\u{000c}' => self.out.push_str("\\f"),
                '\n' => self.out.push_str("\\n"),
                '\r' => self.out.push_str("\\r"),
                '\t' => self.out.push_str("\\t"),
                c if (c as u32) < 0x20 => {
                    self.out.push_str(&format!("\\u{:04x}", c as u32));
                }
                c if self.options.ascii_only && !c.is_ascii() => {
                    let mut units = [0u16; 2];
                    for unit in c.encode_utf16(&mut units) {
                        self.out.push_str(&format!("\\u{unit:04x}"));
                    }
                }
                c => self.out.push(c),
            }
        }
        self.out.push('"');
    }

    fn render_path(&self) -> String {
        let mut out = String::from("$");
        for segment in &self.path {
            match segment {
                PathSegment::Key(key) => {
                    out.push('.');
                    out.push_str(key);
                }
                PathSegment::Index(i) => {
                    out.push_str(&format!("[{i}]"));
                }
            }
        }
        out
    }
}
