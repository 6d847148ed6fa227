//! Validation issues accumulated while parsing and validating documents.

use serde::{Serialize, Serializer};
use std::fmt;

/// A single problem with a value in a document.
///
/// None of these are fatal: parsers and validators keep going after
/// reporting one, and callers decide what to do with the collected set.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("type is not string")]
    TypeNotString,

    #[error("type is not int")]
    TypeNotInt,

    #[error("type is not float64")]
    TypeNotFloat64,

    #[error("type is not bool")]
    TypeNotBool,

    #[error("type is not array")]
    TypeNotArray,

    #[error("type is not object")]
    TypeNotObject,

    #[error("value does not exist")]
    ValueNotExists,

    #[error("value exists")]
    ValueExists,

    #[error("value is empty")]
    ValueEmpty,

    #[error("value is a duplicate")]
    ValueDuplicate,

    #[error("value {value} is not equal to {expected}")]
    ValueNotEqualTo { value: f64, expected: f64 },

    #[error("value {value:?} is not equal to {expected:?}")]
    ValueStringNotEqualTo { value: String, expected: String },

    #[error("value {value} is not between {min} and {max}")]
    ValueNotInRange { value: f64, min: f64, max: f64 },

    #[error("value {value:?} is not one of {allowed:?}")]
    ValueStringNotOneOf { value: String, allowed: Vec<String> },

    #[error("length {length} is not less than or equal to {maximum}")]
    LengthNotLessThanOrEqualTo { length: usize, maximum: usize },

    #[error("value {value:?} is not a valid time")]
    ValueStringAsTimeNotValid { value: String },
}

impl ValidationError {
    /// Stable machine-readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::TypeNotString => "type-not-string",
            ValidationError::TypeNotInt => "type-not-int",
            ValidationError::TypeNotFloat64 => "type-not-float64",
            ValidationError::TypeNotBool => "type-not-bool",
            ValidationError::TypeNotArray => "type-not-array",
            ValidationError::TypeNotObject => "type-not-object",
            ValidationError::ValueNotExists => "value-not-exists",
            ValidationError::ValueExists => "value-exists",
            ValidationError::ValueEmpty => "value-empty",
            ValidationError::ValueDuplicate => "value-duplicate",
            ValidationError::ValueNotEqualTo { .. } => "value-not-equal-to",
            ValidationError::ValueStringNotEqualTo { .. } => "value-not-equal-to",
            ValidationError::ValueNotInRange { .. } => "value-not-in-range",
            ValidationError::ValueStringNotOneOf { .. } => "value-not-one-of",
            ValidationError::LengthNotLessThanOrEqualTo { .. } => {
                "length-not-less-than-or-equal-to"
            }
            ValidationError::ValueStringAsTimeNotValid { .. } => "value-not-valid",
        }
    }

    /// Short human-readable title shared by every instance of a code.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::TypeNotString
            | ValidationError::TypeNotInt
            | ValidationError::TypeNotFloat64
            | ValidationError::TypeNotBool
            | ValidationError::TypeNotArray
            | ValidationError::TypeNotObject => "type is not valid",
            ValidationError::ValueNotExists => "value does not exist",
            ValidationError::ValueExists => "value exists",
            ValidationError::ValueEmpty => "value is empty",
            ValidationError::ValueDuplicate => "value is a duplicate",
            ValidationError::ValueNotEqualTo { .. }
            | ValidationError::ValueStringNotEqualTo { .. } => "value is not equal to",
            ValidationError::ValueNotInRange { .. } => "value is not in range",
            ValidationError::ValueStringNotOneOf { .. } => "value is not one of the allowed values",
            ValidationError::LengthNotLessThanOrEqualTo { .. } => "length is too long",
            ValidationError::ValueStringAsTimeNotValid { .. } => "value is not valid",
        }
    }

    pub(crate) fn not_one_of(value: &str, allowed: &[&str]) -> Self {
        ValidationError::ValueStringNotOneOf {
            value: value.to_string(),
            allowed: allowed.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Identifies the datum that owns an issue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Meta {
    #[serde(rename = "type")]
    pub datum_type: String,

    #[serde(rename = "subType", skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
}

impl Meta {
    pub fn new(datum_type: &str, sub_type: Option<&str>) -> Self {
        Self {
            datum_type: datum_type.to_string(),
            sub_type: sub_type.map(str::to_string),
        }
    }
}

impl fmt::Display for Meta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_type {
            Some(sub_type) => write!(f, "{}/{}", self.datum_type, sub_type),
            None => f.write_str(&self.datum_type),
        }
    }
}

/// A [`ValidationError`] located in a document.
#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    pub error: ValidationError,
    /// JSON pointer to the offending value.
    pub pointer: String,
    pub meta: Option<Meta>,
}

impl Issue {
    pub fn new(error: ValidationError, pointer: impl Into<String>, meta: Option<Meta>) -> Self {
        Self {
            error,
            pointer: pointer.into(),
            meta,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() { "/" } else { &self.pointer };
        match &self.meta {
            Some(meta) => write!(f, "{} [{}]: {}", pointer, meta, self.error),
            None => write!(f, "{}: {}", pointer, self.error),
        }
    }
}

#[derive(Serialize)]
struct IssueSource<'a> {
    pointer: &'a str,
}

#[derive(Serialize)]
struct IssueDocument<'a> {
    code: &'static str,
    title: &'static str,
    detail: String,
    source: IssueSource<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<&'a Meta>,
}

impl Serialize for Issue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        IssueDocument {
            code: self.error.code(),
            title: self.error.title(),
            detail: self.error.to_string(),
            source: IssueSource {
                pointer: &self.pointer,
            },
            meta: self.meta.as_ref(),
        }
        .serialize(serializer)
    }
}
