//! Parse-side collaborators over loosely-typed JSON documents.
//!
//! Missing keys and JSON `null` are plain absence. A value of the wrong JSON
//! type is reported as a `TypeNot*` issue at its pointer and is then treated
//! as absent, so parsing never fails outright.

use super::issue::{Issue, Meta, ValidationError};
use super::origin::Origin;
use super::pointer;
use super::Parse;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Reads named fields out of a JSON object.
pub struct ObjectParser<'d, 'e> {
    object: &'d Map<String, Value>,
    pointer: String,
    origin: Origin,
    meta: Option<Meta>,
    issues: &'e mut Vec<Issue>,
}

impl<'d, 'e> ObjectParser<'d, 'e> {
    pub fn new(object: &'d Map<String, Value>, issues: &'e mut Vec<Issue>) -> Self {
        Self {
            object,
            pointer: String::new(),
            origin: Origin::default(),
            meta: None,
            issues,
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Keys of the object, sorted.
    pub fn references(&self) -> Vec<String> {
        let mut references: Vec<String> = self.object.keys().cloned().collect();
        references.sort();
        references
    }

    /// Whether `reference` holds a non-null value.
    pub fn exists(&self, reference: &str) -> bool {
        self.raw(reference).is_some()
    }

    fn raw(&self, reference: &str) -> Option<&'d Value> {
        self.object.get(reference).filter(|value| !value.is_null())
    }

    pub fn report_error(&mut self, reference: &str, error: ValidationError) {
        self.issues.push(Issue::new(
            error,
            pointer::append(&self.pointer, reference),
            self.meta.clone(),
        ));
    }

    pub fn string(&mut self, reference: &str) -> Option<String> {
        let raw = self.raw(reference)?;
        match raw.as_str() {
            Some(value) => Some(value.to_string()),
            None => {
                self.report_error(reference, ValidationError::TypeNotString);
                None
            }
        }
    }

    pub fn int(&mut self, reference: &str) -> Option<i64> {
        let raw = self.raw(reference)?;
        match as_int(raw) {
            Some(value) => Some(value),
            None => {
                self.report_error(reference, ValidationError::TypeNotInt);
                None
            }
        }
    }

    pub fn float64(&mut self, reference: &str) -> Option<f64> {
        let raw = self.raw(reference)?;
        match raw.as_f64() {
            Some(value) => Some(value),
            None => {
                self.report_error(reference, ValidationError::TypeNotFloat64);
                None
            }
        }
    }

    pub fn bool(&mut self, reference: &str) -> Option<bool> {
        let raw = self.raw(reference)?;
        match raw.as_bool() {
            Some(value) => Some(value),
            None => {
                self.report_error(reference, ValidationError::TypeNotBool);
                None
            }
        }
    }

    /// Array of strings; non-string elements are reported and dropped.
    pub fn string_array(&mut self, reference: &str) -> Option<Vec<String>> {
        let raw = self.raw(reference)?;
        let Some(elements) = raw.as_array() else {
            self.report_error(reference, ValidationError::TypeNotArray);
            return None;
        };

        let array_pointer = pointer::append(&self.pointer, reference);
        let mut values = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            match element.as_str() {
                Some(value) => values.push(value.to_string()),
                None => self.issues.push(Issue::new(
                    ValidationError::TypeNotString,
                    pointer::append(&array_pointer, &index.to_string()),
                    self.meta.clone(),
                )),
            }
        }
        Some(values)
    }

    /// RFC 3339 timestamp.
    pub fn time(&mut self, reference: &str) -> Option<DateTime<Utc>> {
        let value = self.string(reference)?;
        match DateTime::parse_from_rfc3339(&value) {
            Ok(time) => Some(time.with_timezone(&Utc)),
            Err(_) => {
                self.report_error(reference, ValidationError::ValueStringAsTimeNotValid { value });
                None
            }
        }
    }

    pub fn with_reference_object_parser(
        &mut self,
        reference: &str,
    ) -> Option<ObjectParser<'d, '_>> {
        let raw = self.raw(reference)?;
        match raw.as_object() {
            Some(object) => Some(ObjectParser {
                object,
                pointer: pointer::append(&self.pointer, reference),
                origin: self.origin,
                meta: self.meta.clone(),
                issues: &mut *self.issues,
            }),
            None => {
                self.report_error(reference, ValidationError::TypeNotObject);
                None
            }
        }
    }

    pub fn with_reference_array_parser(
        &mut self,
        reference: &str,
    ) -> Option<ArrayParser<'d, '_>> {
        let raw = self.raw(reference)?;
        match raw.as_array() {
            Some(array) => Some(ArrayParser {
                array,
                pointer: pointer::append(&self.pointer, reference),
                origin: self.origin,
                meta: self.meta.clone(),
                issues: &mut *self.issues,
            }),
            None => {
                self.report_error(reference, ValidationError::TypeNotArray);
                None
            }
        }
    }

    /// Parse a nested object into a fresh `T`.
    pub fn object<T: Parse + Default>(&mut self, reference: &str) -> Option<T> {
        let mut parser = self.with_reference_object_parser(reference)?;
        let mut value = T::default();
        value.parse(&mut parser);
        Some(value)
    }
}

/// Walks the elements of a JSON array.
pub struct ArrayParser<'d, 'e> {
    array: &'d [Value],
    pointer: String,
    origin: Origin,
    meta: Option<Meta>,
    issues: &'e mut Vec<Issue>,
}

impl<'d, 'e> ArrayParser<'d, 'e> {
    pub fn new(array: &'d [Value], issues: &'e mut Vec<Issue>) -> Self {
        Self {
            array,
            pointer: String::new(),
            origin: Origin::default(),
            meta: None,
            issues,
        }
    }

    pub fn len(&self) -> usize {
        self.array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Parser for the object at `index`. Null elements yield `None` quietly.
    pub fn object_parser(&mut self, index: usize) -> Option<ObjectParser<'d, '_>> {
        let raw = self.array.get(index).filter(|value| !value.is_null())?;
        let element_pointer = pointer::append(&self.pointer, &index.to_string());
        match raw.as_object() {
            Some(object) => Some(ObjectParser {
                object,
                pointer: element_pointer,
                origin: self.origin,
                meta: self.meta.clone(),
                issues: &mut *self.issues,
            }),
            None => {
                self.issues.push(Issue::new(
                    ValidationError::TypeNotObject,
                    element_pointer,
                    self.meta.clone(),
                ));
                None
            }
        }
    }

    pub fn object<T: Parse + Default>(&mut self, index: usize) -> Option<T> {
        let mut parser = self.object_parser(index)?;
        let mut value = T::default();
        value.parse(&mut parser);
        Some(value)
    }
}

fn as_int(value: &Value) -> Option<i64> {
    if let Some(int) = value.as_i64() {
        return Some(int);
    }
    // Integral floats such as 3600.0 are accepted.
    value
        .as_f64()
        .filter(|float| float.fract() == 0.0 && float.abs() < i64::MAX as f64)
        .map(|float| float as i64)
}
