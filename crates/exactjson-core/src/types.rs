//! The in-memory value tree shared by the decoder and encoder.
//!
//! Mirrors JSON types but separates machine-width integers from
//! arbitrary-precision ones (a decoded literal keeps every digit, even past
//! 64 bits) and uses `Vec<(String, Value)>` for objects to maintain insertion
//! order without depending on `IndexMap`. Containers are shared
//! (`Rc<RefCell<_>>`) so programmatically built trees can alias a container
//! in several positions; the encoder detects the degenerate case where a
//! container ends up inside itself.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset};
use num_bigint::BigInt;

/// Shared array payload. Cloning a `Value::Array` clones the handle, not the
/// elements.
pub type ArrayRef = Rc<RefCell<Vec<Value>>>;

/// Shared object payload.
pub type ObjectRef = Rc<RefCell<Object>>;

/// A decoded (or to-be-encoded) JSON document value.
///
/// Integers outside the `i64` range are held exactly in [`Value::BigInt`];
/// the decoder only produces that variant when the magnitude requires it, and
/// [`Value::integer`] normalizes the same way. The two integer variants
/// compare numerically equal, so `Value::Int(7) == Value::integer(7.into())`.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    /// Integer whose magnitude does not fit `i64`.
    BigInt(BigInt),
    Float(f64),
    String(String),
    /// Calendar date + time + UTC offset, sub-second precision. Produced by
    /// decoding ISO-8601 strings when `DecodeOptions::datetime_strings` is
    /// set, or supplied programmatically.
    DateTime(DateTime<FixedOffset>),
    Array(ArrayRef),
    Object(ObjectRef),
}

impl Value {
    /// Wrap a vector of elements in a fresh shared array container.
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(items)))
    }

    /// Wrap an [`Object`] in a fresh shared container.
    pub fn object(object: Object) -> Value {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// Build an integer value, normalized to [`Value::Int`] when it fits.
    pub fn integer(n: BigInt) -> Value {
        match i64::try_from(&n) {
            Ok(i) => Value::Int(i),
            Err(_) => Value::BigInt(n),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
}

/// Deep structural equality. Containers compare by contents (with a pointer
/// shortcut when both sides are the same allocation); the integer variants
/// compare numerically across widths.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Int(a), Value::BigInt(b)) => BigInt::from(*a) == *b,
            (Value::BigInt(a), Value::Int(b)) => *a == BigInt::from(*b),
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Value {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Value {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Value {
        Value::integer(n)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Value {
        Value::array(items)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Value {
        Value::object(object)
    }
}

/// Key-value pairs in insertion order. Keys are unique: inserting a key that
/// is already present removes the earlier entry and appends the new pair, so
/// the latest occurrence wins both the value and the ordering slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    entries: Vec<(String, Value)>,
}

impl Object {
    pub fn new() -> Object {
        Object::default()
    }

    /// Insert, keep-last: an earlier entry under the same key is dropped and
    /// the new pair goes to the end.
    pub fn insert(&mut self, key: String, value: Value) {
        if let Some(idx) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(idx);
        }
        self.entries.push((key, value));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, (String, Value)> {
        self.entries.iter()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl From<Vec<(String, Value)>> for Object {
    fn from(pairs: Vec<(String, Value)>) -> Object {
        let mut object = Object::new();
        for (key, value) in pairs {
            object.insert(key, value);
        }
        object
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
