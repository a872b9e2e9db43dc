//! Claims flattening for list display
//!
//! `flatten` turns a claims object into display rows. Nested objects are
//! expanded in place: their rows become siblings of the surrounding rows and
//! the object's own key produces no row. Arrays and scalars are leaves.
//!
//! ```text
//! {"sub":"abc123","name":{"first":"Jane","last":"Doe"},"email":"jane@x.com"}
//!
//! title  value        path
//! sub    abc123       /sub
//! first  Jane         /name/first
//! last   Doe          /name/last
//! email  jane@x.com   /email
//! ```
//!
//! Titles are the local key only, so two rows may share a title. The `path`
//! (an RFC 6901 JSON Pointer) is unique within one result and is the row
//! identity to use when reconciling lists.

use crate::value::{ClaimsObject, ClaimsValue};
use miniserde::Serialize;
use std::slice;

/// One displayable claim
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    /// Local key name of the claim
    pub title: String,
    /// Display string of the claim value
    pub value: String,
    /// JSON Pointer to the claim inside the payload
    pub path: String,
}

impl DisplayRow {
    /// `(title, value)` view of the row
    pub fn as_pair(&self) -> (&str, &str) {
        (&self.title, &self.value)
    }
}

/// Flatten a claims object into display rows
///
/// Rows follow a depth-first pre-order walk in key insertion order. The walk
/// keeps its own stack on the heap, so nesting depth is bounded by memory
/// only. An empty object yields no rows.
pub fn flatten(claims: &ClaimsObject) -> Vec<DisplayRow> {
    let mut rows = Vec::with_capacity(claims.len());
    let mut stack: Vec<(slice::Iter<'_, (String, ClaimsValue)>, String)> =
        vec![(claims.entries(), String::new())];

    while let Some((entries, prefix)) = stack.last_mut() {
        let Some((key, value)) = entries.next() else {
            stack.pop();
            continue;
        };

        let mut path = String::with_capacity(prefix.len() + key.len() + 1);
        path.push_str(prefix);
        push_pointer_token(&mut path, key);

        match value {
            ClaimsValue::Object(nested) => stack.push((nested.entries(), path)),
            leaf => rows.push(DisplayRow {
                title: key.clone(),
                value: display_value(leaf),
                path,
            }),
        }
    }

    rows
}

impl ClaimsObject {
    /// Flatten into display rows, see [`flatten`]
    pub fn flatten(&self) -> Vec<DisplayRow> {
        flatten(self)
    }
}

/// Display string of a leaf value
///
/// Strings are verbatim, null is empty, arrays join their elements with `,`
/// (nested arrays joined the same way, objects as compact JSON).
pub fn display_value(value: &ClaimsValue) -> String {
    let mut out = String::new();
    match value {
        ClaimsValue::Array(items) => push_joined(&mut out, items),
        other => push_scalar(&mut out, other),
    }
    out
}

fn push_scalar(out: &mut String, value: &ClaimsValue) {
    match value {
        ClaimsValue::Null => {}
        ClaimsValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        ClaimsValue::Number(n) => out.push_str(&n.to_string()),
        ClaimsValue::String(s) => out.push_str(s),
        ClaimsValue::Array(items) => push_joined(out, items),
        ClaimsValue::Object(object) => out.push_str(&object.to_json()),
    }
}

fn push_joined(out: &mut String, items: &[ClaimsValue]) {
    // (remaining elements, next element is the first of its array)
    let mut stack: Vec<(slice::Iter<'_, ClaimsValue>, bool)> = vec![(items.iter(), true)];

    while let Some((elements, first)) = stack.last_mut() {
        let Some(element) = elements.next() else {
            stack.pop();
            continue;
        };

        if !*first {
            out.push(',');
        }
        *first = false;

        match element {
            ClaimsValue::Array(nested) => stack.push((nested.iter(), true)),
            other => push_scalar(out, other),
        }
    }
}

/// Append `/token` with `~` and `/` escaped per RFC 6901
fn push_pointer_token(path: &mut String, token: &str) {
    path.push('/');
    for c in token.chars() {
        match c {
            '~' => path.push_str("~0"),
            '/' => path.push_str("~1"),
            c => path.push(c),
        }
    }
}
