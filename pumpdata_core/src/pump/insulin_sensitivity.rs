//! Insulin sensitivity schedule entries.

use super::UnitsContext;
use crate::blood_glucose::normalize_in_place;
use crate::range::{range_for_unit, Quantity};
use crate::schedule::{validate_start, StartEntry};
use crate::structure::{Normalizer, ObjectParser, Parse, Validator};
use serde::Serialize;

/// Expected glucose drop per unit of insulin, in the record's glucose unit.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct InsulinSensitivityStart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
}

impl Parse for InsulinSensitivityStart {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.amount = parser.float64("amount");
        self.start = parser.int("start");
    }
}

impl StartEntry for InsulinSensitivityStart {
    fn start(&self) -> Option<i64> {
        self.start
    }

    fn validate(&self, validator: &mut Validator<'_>, start_minimum: i64, units: UnitsContext<'_>) {
        let (min, max) = range_for_unit(Quantity::InsulinSensitivity, units.blood_glucose);
        validator.float64("amount", self.amount).exists().in_range(min, max);
        validate_start(validator, self.start, start_minimum);
    }

    fn normalize(&mut self, normalizer: &Normalizer, units: UnitsContext<'_>) {
        if normalizer.is_external() {
            normalize_in_place(&mut self.amount, units.blood_glucose);
        }
    }
}
