//! Basal rate schedules and basal delivery limits.

use super::UnitsContext;
use crate::range::{range_for_unit, Quantity, UNITS_PER_HOUR};
use crate::schedule::{validate_start, StartEntry};
use crate::structure::{ObjectParser, Parse, Validator};
use serde::Serialize;

pub const BASAL_TEMPORARY_TYPES: [&str; 3] = ["off", "percent", UNITS_PER_HOUR];

/// Rate (Units/hour) in effect from `start`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BasalRateStart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
}

impl Parse for BasalRateStart {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.rate = parser.float64("rate");
        self.start = parser.int("start");
    }
}

impl StartEntry for BasalRateStart {
    fn start(&self) -> Option<i64> {
        self.start
    }

    fn validate(&self, validator: &mut Validator<'_>, start_minimum: i64, _units: UnitsContext<'_>) {
        let (min, max) = range_for_unit(Quantity::BasalRate, Some(UNITS_PER_HOUR));
        validator.float64("rate", self.rate).exists().in_range(min, max);
        validate_start(validator, self.start, start_minimum);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BasalRateMaximum {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Parse for BasalRateMaximum {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.units = parser.string("units");
        self.value = parser.float64("value");
    }
}

impl BasalRateMaximum {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        validator
            .string("units", self.units.as_deref())
            .exists()
            .one_of(&[UNITS_PER_HOUR]);
        let (min, max) = range_for_unit(Quantity::BasalRate, self.units.as_deref());
        validator.float64("value", self.value).exists().in_range(min, max);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BasalTemporary {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub temporary_type: Option<String>,
}

impl Parse for BasalTemporary {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.temporary_type = parser.string("type");
    }
}

impl BasalTemporary {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        validator
            .string("type", self.temporary_type.as_deref())
            .exists()
            .one_of(&BASAL_TEMPORARY_TYPES);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Basal {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_maximum: Option<BasalRateMaximum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary: Option<BasalTemporary>,
}

impl Parse for Basal {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.rate_maximum = parser.object("rateMaximum");
        self.temporary = parser.object("temporary");
    }
}

impl Basal {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        if let Some(rate_maximum) = &self.rate_maximum {
            rate_maximum.validate(&mut validator.with_reference("rateMaximum"));
        }
        if let Some(temporary) = &self.temporary {
            temporary.validate(&mut validator.with_reference("temporary"));
        }
    }
}
