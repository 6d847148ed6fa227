//! Validate-side collaborator.
//!
//! A [`Validator`] carries the issue sink, the pointer of the object being
//! validated, the owning datum's [`Meta`] and the document [`Origin`]. Field
//! validators are chainable and every link reports independently; links
//! other than `exists` do nothing when the value is absent.

use super::issue::{Issue, Meta, ValidationError};
use super::origin::Origin;
use super::pointer;
use std::collections::HashSet;

pub struct Validator<'e> {
    issues: &'e mut Vec<Issue>,
    pointer: String,
    meta: Option<Meta>,
    origin: Origin,
}

impl<'e> Validator<'e> {
    pub fn new(issues: &'e mut Vec<Issue>) -> Self {
        Self {
            issues,
            pointer: String::new(),
            meta: None,
            origin: Origin::default(),
        }
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Number of issues in the sink so far, including ones reported by
    /// other validators sharing it.
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    pub fn with_reference(&mut self, reference: &str) -> Validator<'_> {
        Validator {
            pointer: pointer::append(&self.pointer, reference),
            issues: &mut *self.issues,
            meta: self.meta.clone(),
            origin: self.origin,
        }
    }

    pub fn with_meta(&mut self, meta: Meta) -> Validator<'_> {
        Validator {
            pointer: self.pointer.clone(),
            issues: &mut *self.issues,
            meta: Some(meta),
            origin: self.origin,
        }
    }

    /// Report an error against the current object.
    pub fn report(&mut self, error: ValidationError) {
        self.issues
            .push(Issue::new(error, self.pointer.clone(), self.meta.clone()));
    }

    pub fn report_error(&mut self, reference: &str, error: ValidationError) {
        self.field(reference).report(error);
    }

    fn field(&mut self, reference: &str) -> Field<'_> {
        Field {
            pointer: pointer::append(&self.pointer, reference),
            issues: &mut *self.issues,
            meta: self.meta.as_ref(),
        }
    }

    pub fn float64<'v>(&'v mut self, reference: &str, value: Option<f64>) -> Float64Validator<'v> {
        Float64Validator {
            field: self.field(reference),
            value,
        }
    }

    pub fn int<'v>(&'v mut self, reference: &str, value: Option<i64>) -> IntValidator<'v> {
        IntValidator {
            field: self.field(reference),
            value,
        }
    }

    pub fn bool<'v>(&'v mut self, reference: &str, value: Option<bool>) -> BoolValidator<'v> {
        BoolValidator {
            field: self.field(reference),
            value,
        }
    }

    pub fn string<'v>(&'v mut self, reference: &str, value: Option<&'v str>) -> StringValidator<'v> {
        StringValidator {
            field: self.field(reference),
            value,
        }
    }

    pub fn string_array<'v>(
        &'v mut self,
        reference: &str,
        value: Option<&'v [String]>,
    ) -> StringArrayValidator<'v> {
        StringArrayValidator {
            field: self.field(reference),
            value,
        }
    }

    /// Presence-only checks for objects, arrays, maps and times.
    pub fn value<'v>(&'v mut self, reference: &str, present: bool) -> PresenceValidator<'v> {
        PresenceValidator {
            field: self.field(reference),
            present,
        }
    }
}

struct Field<'v> {
    pointer: String,
    issues: &'v mut Vec<Issue>,
    meta: Option<&'v Meta>,
}

impl Field<'_> {
    fn report(&mut self, error: ValidationError) {
        self.issues
            .push(Issue::new(error, self.pointer.clone(), self.meta.cloned()));
    }

    fn report_at(&mut self, index: usize, error: ValidationError) {
        self.issues.push(Issue::new(
            error,
            pointer::append(&self.pointer, &index.to_string()),
            self.meta.cloned(),
        ));
    }

    fn presence(&mut self, present: bool, required: bool) {
        match (present, required) {
            (false, true) => self.report(ValidationError::ValueNotExists),
            (true, false) => self.report(ValidationError::ValueExists),
            _ => {}
        }
    }
}

pub struct Float64Validator<'v> {
    field: Field<'v>,
    value: Option<f64>,
}

impl Float64Validator<'_> {
    pub fn exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), true);
        self
    }

    pub fn not_exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), false);
        self
    }

    pub fn equal_to(mut self, expected: f64) -> Self {
        if let Some(value) = self.value {
            if value != expected {
                self.field
                    .report(ValidationError::ValueNotEqualTo { value, expected });
            }
        }
        self
    }

    pub fn in_range(mut self, min: f64, max: f64) -> Self {
        if let Some(value) = self.value {
            if value < min || value > max {
                self.field
                    .report(ValidationError::ValueNotInRange { value, min, max });
            }
        }
        self
    }
}

pub struct IntValidator<'v> {
    field: Field<'v>,
    value: Option<i64>,
}

impl IntValidator<'_> {
    pub fn exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), true);
        self
    }

    pub fn not_exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), false);
        self
    }

    pub fn equal_to(mut self, expected: i64) -> Self {
        if let Some(value) = self.value {
            if value != expected {
                self.field.report(ValidationError::ValueNotEqualTo {
                    value: value as f64,
                    expected: expected as f64,
                });
            }
        }
        self
    }

    pub fn in_range(mut self, min: i64, max: i64) -> Self {
        if let Some(value) = self.value {
            if value < min || value > max {
                self.field.report(ValidationError::ValueNotInRange {
                    value: value as f64,
                    min: min as f64,
                    max: max as f64,
                });
            }
        }
        self
    }
}

pub struct BoolValidator<'v> {
    field: Field<'v>,
    value: Option<bool>,
}

impl BoolValidator<'_> {
    pub fn exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), true);
        self
    }

    pub fn not_exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), false);
        self
    }
}

pub struct StringValidator<'v> {
    field: Field<'v>,
    value: Option<&'v str>,
}

impl StringValidator<'_> {
    pub fn exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), true);
        self
    }

    pub fn not_exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), false);
        self
    }

    pub fn not_empty(mut self) -> Self {
        if self.value == Some("") {
            self.field.report(ValidationError::ValueEmpty);
        }
        self
    }

    pub fn equal_to(mut self, expected: &str) -> Self {
        if let Some(value) = self.value {
            if value != expected {
                self.field.report(ValidationError::ValueStringNotEqualTo {
                    value: value.to_string(),
                    expected: expected.to_string(),
                });
            }
        }
        self
    }

    pub fn one_of(mut self, allowed: &[&str]) -> Self {
        if let Some(value) = self.value {
            if !allowed.contains(&value) {
                self.field
                    .report(ValidationError::not_one_of(value, allowed));
            }
        }
        self
    }

    /// Length in characters.
    pub fn length_less_than_or_equal_to(mut self, maximum: usize) -> Self {
        if let Some(value) = self.value {
            let length = value.chars().count();
            if length > maximum {
                self.field
                    .report(ValidationError::LengthNotLessThanOrEqualTo { length, maximum });
            }
        }
        self
    }
}

pub struct StringArrayValidator<'v> {
    field: Field<'v>,
    value: Option<&'v [String]>,
}

impl StringArrayValidator<'_> {
    pub fn exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), true);
        self
    }

    pub fn not_exists(mut self) -> Self {
        self.field.presence(self.value.is_some(), false);
        self
    }

    pub fn not_empty(mut self) -> Self {
        if matches!(self.value, Some(values) if values.is_empty()) {
            self.field.report(ValidationError::ValueEmpty);
        }
        self
    }

    /// Number of elements.
    pub fn length_less_than_or_equal_to(mut self, maximum: usize) -> Self {
        if let Some(values) = self.value {
            if values.len() > maximum {
                self.field.report(ValidationError::LengthNotLessThanOrEqualTo {
                    length: values.len(),
                    maximum,
                });
            }
        }
        self
    }

    pub fn each_not_empty(mut self) -> Self {
        if let Some(values) = self.value {
            for (index, value) in values.iter().enumerate() {
                if value.is_empty() {
                    self.field.report_at(index, ValidationError::ValueEmpty);
                }
            }
        }
        self
    }

    pub fn each_one_of(mut self, allowed: &[&str]) -> Self {
        if let Some(values) = self.value {
            for (index, value) in values.iter().enumerate() {
                if !allowed.contains(&value.as_str()) {
                    self.field
                        .report_at(index, ValidationError::not_one_of(value, allowed));
                }
            }
        }
        self
    }

    pub fn each_length_less_than_or_equal_to(mut self, maximum: usize) -> Self {
        if let Some(values) = self.value {
            for (index, value) in values.iter().enumerate() {
                let length = value.chars().count();
                if length > maximum {
                    self.field.report_at(
                        index,
                        ValidationError::LengthNotLessThanOrEqualTo { length, maximum },
                    );
                }
            }
        }
        self
    }

    /// Every repeat after the first occurrence is reported.
    pub fn each_unique(mut self) -> Self {
        if let Some(values) = self.value {
            let mut seen = HashSet::with_capacity(values.len());
            for (index, value) in values.iter().enumerate() {
                if !seen.insert(value.as_str()) {
                    self.field.report_at(index, ValidationError::ValueDuplicate);
                }
            }
        }
        self
    }
}

pub struct PresenceValidator<'v> {
    field: Field<'v>,
    present: bool,
}

impl PresenceValidator<'_> {
    pub fn exists(mut self) -> Self {
        self.field.presence(self.present, true);
        self
    }

    pub fn not_exists(mut self) -> Self {
        self.field.presence(self.present, false);
        self
    }
}
