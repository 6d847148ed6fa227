//! Units declared by a pump, and the context handed to unit-aware children.

use crate::blood_glucose;
use crate::range::{EXCHANGES, GRAMS, UNITS};
use crate::structure::{Normalizer, ObjectParser, Parse, Validator};
use serde::Serialize;

pub const CARBOHYDRATE_UNITS: [&str; 2] = [GRAMS, EXCHANGES];
pub const INSULIN_UNITS: [&str; 1] = [UNITS];

/// Read-only view of the units in effect for a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UnitsContext<'a> {
    pub blood_glucose: Option<&'a str>,
    pub carbohydrate: Option<&'a str>,
}

impl<'a> UnitsContext<'a> {
    pub fn blood_glucose(units: Option<&'a str>) -> Self {
        Self {
            blood_glucose: units,
            carbohydrate: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Units {
    #[serde(rename = "bg", skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<String>,
    #[serde(rename = "carb", skip_serializing_if = "Option::is_none")]
    pub carbohydrate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin: Option<String>,
}

impl Parse for Units {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.blood_glucose = parser.string("bg");
        self.carbohydrate = parser.string("carb");
        self.insulin = parser.string("insulin");
    }
}

impl Units {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        let glucose_units = blood_glucose::units_for_origin(validator.origin());
        validator
            .string("bg", self.blood_glucose.as_deref())
            .exists()
            .one_of(glucose_units);
        validator
            .string("carb", self.carbohydrate.as_deref())
            .exists()
            .one_of(&CARBOHYDRATE_UNITS);
        validator
            .string("insulin", self.insulin.as_deref())
            .exists()
            .one_of(&INSULIN_UNITS);
    }

    /// Rewrite the glucose unit to its storage spelling. Children must have
    /// been normalized against the original unit before this runs.
    pub fn normalize(&mut self, normalizer: &Normalizer) {
        if normalizer.is_external() {
            self.blood_glucose = blood_glucose::normalize_units(self.blood_glucose.as_deref());
        }
    }

    pub fn context(&self) -> UnitsContext<'_> {
        UnitsContext {
            blood_glucose: self.blood_glucose.as_deref(),
            carbohydrate: self.carbohydrate.as_deref(),
        }
    }
}
