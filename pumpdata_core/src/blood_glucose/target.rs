//! Blood glucose target band.

use super::{normalize_in_place, value_range_for_units};
use crate::range::{range_for_unit, Quantity, UNBOUNDED};
use crate::structure::{Normalizer, ObjectParser, Parse, Validator};
use serde::Serialize;

/// A glucose target in one of four shapes:
///
/// * `target` and `range` (target ± range)
/// * `target` and `high` (target up to high)
/// * `target` alone
/// * `low` and `high`
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
}

impl Parse for Target {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.target = parser.float64("target");
        self.range = parser.float64("range");
        self.low = parser.float64("low");
        self.high = parser.float64("high");
    }
}

impl Target {
    pub fn validate(&self, validator: &mut Validator<'_>, units: Option<&str>) {
        let (target_min, target_max) = target_range_for_units(units);
        let (low_min, low_max) = low_range_for_units(units);

        match (self.target, self.range, self.low, self.high) {
            (Some(target), Some(_), _, _) => {
                let (range_min, range_max) = range_range_for_units(target, units);
                validator.float64("target", self.target).in_range(target_min, target_max);
                validator.float64("range", self.range).in_range(range_min, range_max);
                validator.float64("low", self.low).not_exists();
                validator.float64("high", self.high).not_exists();
            }
            (Some(target), None, _, Some(_)) => {
                let (high_min, high_max) = high_range_for_units(target, units);
                validator.float64("target", self.target).in_range(target_min, target_max);
                validator.float64("low", self.low).not_exists();
                validator.float64("high", self.high).in_range(high_min, high_max);
            }
            (Some(_), None, _, None) => {
                validator.float64("target", self.target).in_range(target_min, target_max);
                validator.float64("low", self.low).not_exists();
            }
            (None, _, Some(low), Some(_)) => {
                let (high_min, high_max) = high_range_for_units(low, units);
                validator.float64("range", self.range).not_exists();
                validator.float64("low", self.low).in_range(low_min, low_max);
                validator.float64("high", self.high).in_range(high_min, high_max);
            }
            (None, _, Some(_), None) => {
                validator.float64("range", self.range).not_exists();
                validator.float64("high", self.high).exists();
            }
            (None, _, None, Some(_)) => {
                validator.float64("range", self.range).not_exists();
                validator.float64("low", self.low).exists();
            }
            (None, _, None, None) => {
                validator.float64("target", self.target).exists();
                validator.float64("range", self.range).not_exists();
            }
        }
    }

    /// Convert every populated field into mmol/L for external documents.
    pub fn normalize(&mut self, normalizer: &Normalizer, units: Option<&str>) {
        if !normalizer.is_external() {
            return;
        }
        normalize_in_place(&mut self.target, units);
        normalize_in_place(&mut self.range, units);
        normalize_in_place(&mut self.low, units);
        normalize_in_place(&mut self.high, units);
    }
}

pub fn target_range_for_units(units: Option<&str>) -> (f64, f64) {
    range_for_unit(Quantity::GlucoseTarget, units)
}

pub fn low_range_for_units(units: Option<&str>) -> (f64, f64) {
    range_for_unit(Quantity::GlucoseTarget, units)
}

/// `target ± range` must stay inside the value range.
pub fn range_range_for_units(target: f64, units: Option<&str>) -> (f64, f64) {
    let (min, max) = value_range_for_units(units);
    if (min, max) == UNBOUNDED {
        return UNBOUNDED;
    }
    if target >= min && target <= max {
        (0.0, (target - min).min(max - target))
    } else {
        (0.0, max - min)
    }
}

/// `high` may not fall below `lower` (the target or low) when that is valid.
pub fn high_range_for_units(lower: f64, units: Option<&str>) -> (f64, f64) {
    let (min, max) = value_range_for_units(units);
    if (min, max) == UNBOUNDED {
        return UNBOUNDED;
    }
    if lower >= min && lower <= max {
        (lower, max)
    } else {
        (min, max)
    }
}
