//! Declarative shape checks for untyped JSON records
//!
//! Each record type is described once as a [`Schema`]: an ordered list of
//! [`Field`] expectations. The same [`Schema::check`] routine validates both
//! top-level containers (where a violation aborts the pipeline) and individual
//! rows (where a violation only drops that row).

use serde_json::{Map, Value};

use crate::error::ErrorKind;

/// Expected primitive kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Text,
    /// Any finite number
    Number,
    /// Finite and strictly greater than zero
    PositiveNumber,
    /// Finite and greater than or equal to zero
    NonNegativeNumber,
    /// Finite number without a fractional part
    Integer,
    /// String made of exactly `n` ASCII digits
    Digits(usize),
    /// String equal to one of a fixed set of literals
    OneOf(&'static [&'static str]),
    Object,
    /// Non-empty sequence
    Rows,
    /// Sequence of strings (may be empty)
    TextList,
    Any,
}

impl Kind {
    /// Human-readable description used in violation messages
    pub fn describe(&self) -> String {
        match self {
            Kind::Text => "a string".to_string(),
            Kind::Number => "a finite number".to_string(),
            Kind::PositiveNumber => "a positive number".to_string(),
            Kind::NonNegativeNumber => "a non-negative number".to_string(),
            Kind::Integer => "an integer".to_string(),
            Kind::Digits(n) => format!("a string of {n} digits"),
            Kind::OneOf(options) => format!("one of {}", options.join(", ")),
            Kind::Object => "an object".to_string(),
            Kind::Rows => "a non-empty sequence".to_string(),
            Kind::TextList => "a sequence of strings".to_string(),
            Kind::Any => "any value".to_string(),
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            Kind::Text => value.is_string(),
            Kind::Number => finite(value).is_some(),
            Kind::PositiveNumber => finite(value).is_some_and(|n| n > 0.0),
            Kind::NonNegativeNumber => finite(value).is_some_and(|n| n >= 0.0),
            Kind::Integer => finite(value).is_some_and(|n| n.fract() == 0.0),
            Kind::Digits(len) => value.as_str().is_some_and(|s| {
                s.chars().count() == *len && s.chars().all(|c| c.is_ascii_digit())
            }),
            Kind::OneOf(options) => value
                .as_str()
                .is_some_and(|s| options.iter().any(|option| *option == s)),
            Kind::Object => value.is_object(),
            Kind::Rows => value.as_array().is_some_and(|rows| !rows.is_empty()),
            Kind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            Kind::Any => true,
        }
    }
}

/// One named field expectation
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub kind: Kind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: Kind) -> Self {
        Field {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: Kind) -> Self {
        Field {
            name,
            kind,
            required: false,
        }
    }
}

/// Shape description of one record type
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// Why a value does not conform to its schema
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Violation {
    #[error("expected an object")]
    NotAnObject,

    #[error("expected a sequence")]
    NotASequence,

    #[error("missing required field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongKind {
        field: &'static str,
        expected: String,
    },

    #[error("`{0}` must not be empty")]
    Empty(&'static str),
}

impl Schema {
    /// Check `value` against every field in declaration order
    ///
    /// Returns the object map on success, or the first violation found.
    /// A `null` field counts as absent.
    pub fn check<'a>(&self, value: &'a Value) -> Result<&'a Map<String, Value>, Violation> {
        let map = value.as_object().ok_or(Violation::NotAnObject)?;

        for field in self.fields {
            match map.get(field.name).filter(|v| !v.is_null()) {
                None if field.required => return Err(Violation::Missing(field.name)),
                None => {}
                Some(Value::Array(items)) if field.kind == Kind::Rows && items.is_empty() => {
                    return Err(Violation::Empty(field.name));
                }
                Some(v) if !field.kind.accepts(v) => {
                    return Err(Violation::WrongKind {
                        field: field.name,
                        expected: field.kind.describe(),
                    });
                }
                Some(_) => {}
            }
        }

        Ok(map)
    }
}

/// Check that `value` is a non-empty sequence and return its elements
pub fn rows<'a>(value: &'a Value, name: &'static str) -> Result<&'a [Value], Violation> {
    let items = value.as_array().ok_or(Violation::NotASequence)?;
    if items.is_empty() {
        return Err(Violation::Empty(name));
    }
    Ok(items)
}

/// A row dropped by a row filter
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// Position of the row in the input sequence
    pub index: usize,
    pub reason: Violation,
}

/// Output of a row filter: surviving rows plus what was dropped, both in input order
#[derive(Debug, Clone)]
pub struct Filtered<T> {
    pub kept: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl Rejection {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidRow
    }
}

impl<T> Filtered<T> {
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

/// Apply a per-row predicate, keeping successes and recording failures
pub fn filter_rows<'a, T, F>(rows: &'a [Value], mut accept: F) -> Filtered<T>
where
    F: FnMut(&'a Value) -> Result<T, Violation>,
{
    let mut kept = Vec::with_capacity(rows.len());
    let mut rejected = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        match accept(row) {
            Ok(item) => kept.push(item),
            Err(reason) => rejected.push(Rejection { index, reason }),
        }
    }

    Filtered { kept, rejected }
}

fn finite(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

/// Read a string field already checked by a schema
pub fn text<'a>(map: &'a Map<String, Value>, name: &str) -> Option<&'a str> {
    map.get(name).and_then(Value::as_str)
}

/// Read a numeric field already checked by a schema
pub fn number(map: &Map<String, Value>, name: &str) -> Option<f64> {
    map.get(name).and_then(Value::as_f64)
}

/// Render a scalar for display: strings verbatim, numbers and booleans via
/// their JSON text, anything else (including absence) as an empty string
pub fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
        _ => String::new(),
    }
}
