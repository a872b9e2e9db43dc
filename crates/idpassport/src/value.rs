//! Schema-less claims model
//!
//! Identity providers put arbitrary data into an ID token payload. `ClaimsValue`
//! models that payload as a tagged union so consumers match on it exhaustively,
//! and `ClaimsObject` keeps keys in the order the token declared them.
//!
//! JSON decoding and encoding go through `miniserde`, whose driver is
//! non-recursive: deeply nested payloads are limited by memory, not stack.

use crate::error::{Error, Result};
use miniserde::{de, make_place, ser};
use std::borrow::Cow;
use std::fmt;
use std::mem;

/// A decoded claim value
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimsValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<ClaimsValue>),
    Object(ClaimsObject),
}

/// A JSON number, integers kept exact
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

/// Insertion-ordered mapping from claim name to value
///
/// Keys are unique. Inserting an existing key replaces its value in place,
/// so the key keeps the position of its first occurrence.
///
/// Lookups and inserts scan the entries linearly, so decoding is quadratic in
/// the number of keys per object. Payloads are capped at 64 KiB, which keeps
/// that to a few thousand keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimsObject {
    entries: Vec<(String, ClaimsValue)>,
}

impl ClaimsValue {
    /// Decode any JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        miniserde::json::from_str(json)
            .map_err(|e| Error::FormatInvalidJson(format!("Failed to parse claims: {e}")))
    }

    /// Compact JSON text, keys in insertion order
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(self)
    }

    /// JSON type name, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            ClaimsValue::Null => "null",
            ClaimsValue::Bool(_) => "boolean",
            ClaimsValue::Number(_) => "number",
            ClaimsValue::String(_) => "string",
            ClaimsValue::Array(_) => "array",
            ClaimsValue::Object(_) => "object",
        }
    }

    pub fn as_object(&self) -> Option<&ClaimsObject> {
        match self {
            ClaimsValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn into_object(mut self) -> Result<ClaimsObject> {
        match &mut self {
            ClaimsValue::Object(object) => Ok(mem::take(object)),
            other => Err(Error::PayloadNotObject {
                found: other.kind(),
            }),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ClaimsValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ClaimsValue::Null)
    }
}

impl ClaimsObject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a JSON document whose top level must be an object
    pub fn from_json(json: &str) -> Result<Self> {
        ClaimsValue::from_json(json)?.into_object()
    }

    /// Insert a claim, returning the previous value for that key
    pub fn insert(&mut self, key: impl Into<String>, value: ClaimsValue) -> Option<ClaimsValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => Some(mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&ClaimsValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Claims in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimsValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub(crate) fn entries(&self) -> std::slice::Iter<'_, (String, ClaimsValue)> {
        self.entries.iter()
    }

    fn take_values(&mut self) -> Vec<ClaimsValue> {
        mem::take(&mut self.entries)
            .into_iter()
            .map(|(_, value)| value)
            .collect()
    }

    /// Compact JSON text, keys in insertion order
    pub fn to_json(&self) -> String {
        miniserde::json::to_string(self)
    }
}

// Iterative so teardown depth is not bounded by the thread's stack
impl Drop for ClaimsValue {
    fn drop(&mut self) {
        let mut stack = match self {
            ClaimsValue::Array(items) if !items.is_empty() => mem::take(items),
            ClaimsValue::Object(object) if !object.is_empty() => object.take_values(),
            _ => return,
        };

        while let Some(mut value) = stack.pop() {
            match &mut value {
                ClaimsValue::Array(items) => stack.append(items),
                ClaimsValue::Object(object) => stack.extend(object.take_values()),
                _ => {}
            }
        }
    }
}

impl<K: Into<String>> FromIterator<(K, ClaimsValue)> for ClaimsObject {
    fn from_iter<I: IntoIterator<Item = (K, ClaimsValue)>>(iter: I) -> Self {
        let mut object = ClaimsObject::new();
        for (key, value) in iter {
            object.insert(key, value);
        }
        object
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::PosInt(n) => write!(f, "{n}"),
            Number::NegInt(n) => write!(f, "{n}"),
            Number::Float(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ClaimsValue {
    fn from(value: &str) -> Self {
        ClaimsValue::String(value.to_owned())
    }
}

impl From<String> for ClaimsValue {
    fn from(value: String) -> Self {
        ClaimsValue::String(value)
    }
}

impl From<bool> for ClaimsValue {
    fn from(value: bool) -> Self {
        ClaimsValue::Bool(value)
    }
}

impl From<i64> for ClaimsValue {
    fn from(value: i64) -> Self {
        if value < 0 {
            ClaimsValue::Number(Number::NegInt(value))
        } else {
            ClaimsValue::Number(Number::PosInt(value.unsigned_abs()))
        }
    }
}

impl From<u64> for ClaimsValue {
    fn from(value: u64) -> Self {
        ClaimsValue::Number(Number::PosInt(value))
    }
}

impl From<f64> for ClaimsValue {
    fn from(value: f64) -> Self {
        ClaimsValue::Number(Number::Float(value))
    }
}

impl From<Vec<ClaimsValue>> for ClaimsValue {
    fn from(value: Vec<ClaimsValue>) -> Self {
        ClaimsValue::Array(value)
    }
}

impl From<ClaimsObject> for ClaimsValue {
    fn from(value: ClaimsObject) -> Self {
        ClaimsValue::Object(value)
    }
}

// ============================================================================
// miniserde decoding
// ============================================================================

make_place!(Place);

impl de::Visitor for Place<ClaimsValue> {
    fn null(&mut self) -> miniserde::Result<()> {
        self.out = Some(ClaimsValue::Null);
        Ok(())
    }

    fn boolean(&mut self, b: bool) -> miniserde::Result<()> {
        self.out = Some(ClaimsValue::Bool(b));
        Ok(())
    }

    fn string(&mut self, s: &str) -> miniserde::Result<()> {
        self.out = Some(ClaimsValue::String(s.to_owned()));
        Ok(())
    }

    fn negative(&mut self, n: i64) -> miniserde::Result<()> {
        self.out = Some(ClaimsValue::Number(Number::NegInt(n)));
        Ok(())
    }

    fn nonnegative(&mut self, n: u64) -> miniserde::Result<()> {
        self.out = Some(ClaimsValue::Number(Number::PosInt(n)));
        Ok(())
    }

    fn float(&mut self, n: f64) -> miniserde::Result<()> {
        self.out = Some(ClaimsValue::Number(Number::Float(n)));
        Ok(())
    }

    fn seq(&mut self) -> miniserde::Result<Box<dyn de::Seq + '_>> {
        Ok(Box::new(ArrayBuilder {
            out: &mut self.out,
            array: Vec::new(),
            element: None,
        }))
    }

    fn map(&mut self) -> miniserde::Result<Box<dyn de::Map + '_>> {
        Ok(Box::new(ObjectBuilder {
            out: &mut self.out,
            object: ClaimsObject::new(),
            key: None,
            value: None,
        }))
    }
}

struct ArrayBuilder<'a> {
    out: &'a mut Option<ClaimsValue>,
    array: Vec<ClaimsValue>,
    element: Option<ClaimsValue>,
}

impl ArrayBuilder<'_> {
    fn shift(&mut self) {
        if let Some(element) = self.element.take() {
            self.array.push(element);
        }
    }
}

impl de::Seq for ArrayBuilder<'_> {
    fn element(&mut self) -> miniserde::Result<&mut dyn de::Visitor> {
        self.shift();
        Ok(<ClaimsValue as miniserde::Deserialize>::begin(
            &mut self.element,
        ))
    }

    fn finish(&mut self) -> miniserde::Result<()> {
        self.shift();
        *self.out = Some(ClaimsValue::Array(mem::take(&mut self.array)));
        Ok(())
    }
}

struct ObjectBuilder<'a> {
    out: &'a mut Option<ClaimsValue>,
    object: ClaimsObject,
    key: Option<String>,
    value: Option<ClaimsValue>,
}

impl ObjectBuilder<'_> {
    fn shift(&mut self) {
        if let (Some(key), Some(value)) = (self.key.take(), self.value.take()) {
            self.object.insert(key, value);
        }
    }
}

impl de::Map for ObjectBuilder<'_> {
    fn key(&mut self, k: &str) -> miniserde::Result<&mut dyn de::Visitor> {
        self.shift();
        self.key = Some(k.to_owned());
        Ok(<ClaimsValue as miniserde::Deserialize>::begin(&mut self.value))
    }

    fn finish(&mut self) -> miniserde::Result<()> {
        self.shift();
        *self.out = Some(ClaimsValue::Object(mem::take(&mut self.object)));
        Ok(())
    }
}

impl miniserde::Deserialize for ClaimsValue {
    fn begin(out: &mut Option<Self>) -> &mut dyn de::Visitor {
        Place::new(out)
    }
}

// ============================================================================
// miniserde encoding
// ============================================================================

struct ArrayStream<'a>(std::slice::Iter<'a, ClaimsValue>);

impl ser::Seq for ArrayStream<'_> {
    fn next(&mut self) -> Option<&dyn ser::Serialize> {
        let element = self.0.next()?;
        Some(element)
    }
}

struct ObjectStream<'a>(std::slice::Iter<'a, (String, ClaimsValue)>);

impl ser::Map for ObjectStream<'_> {
    fn next(&mut self) -> Option<(Cow<'_, str>, &dyn ser::Serialize)> {
        let (key, value) = self.0.next()?;
        Some((Cow::Borrowed(key.as_str()), value))
    }
}

impl ser::Serialize for ClaimsValue {
    fn begin(&self) -> ser::Fragment<'_> {
        match self {
            ClaimsValue::Null => ser::Fragment::Null,
            ClaimsValue::Bool(b) => ser::Fragment::Bool(*b),
            ClaimsValue::Number(Number::PosInt(n)) => ser::Fragment::U64(*n),
            ClaimsValue::Number(Number::NegInt(n)) => ser::Fragment::I64(*n),
            ClaimsValue::Number(Number::Float(n)) => ser::Fragment::F64(*n),
            ClaimsValue::String(s) => ser::Fragment::Str(Cow::Borrowed(s)),
            ClaimsValue::Array(items) => ser::Fragment::Seq(Box::new(ArrayStream(items.iter()))),
            ClaimsValue::Object(object) => ser::Serialize::begin(object),
        }
    }
}

impl ser::Serialize for ClaimsObject {
    fn begin(&self) -> ser::Fragment<'_> {
        ser::Fragment::Map(Box::new(ObjectStream(self.entries.iter())))
    }
}
