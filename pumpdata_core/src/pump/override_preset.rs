//! Named therapy override presets.

use super::UnitsContext;
use crate::blood_glucose::Target;
use crate::schedule::{NamedMap, NamedValue};
use crate::structure::{Normalizer, ObjectParser, Parse, Validator};
use serde::Serialize;

pub const ABBREVIATION_LENGTH_MAXIMUM: usize = 100;

/// Milliseconds; one week.
pub const DURATION_MINIMUM: i64 = 0;
pub const DURATION_MAXIMUM: i64 = 604_800_000;

pub const SCALE_FACTOR_MINIMUM: f64 = 0.1;
pub const SCALE_FACTOR_MAXIMUM: f64 = 10.0;

/// Validate the three optional scale factors shared by presets and
/// override events.
pub(crate) fn validate_scale_factors(
    validator: &mut Validator<'_>,
    basal_rate: Option<f64>,
    carbohydrate_ratio: Option<f64>,
    insulin_sensitivity: Option<f64>,
) {
    for (reference, value) in [
        ("basalRateScaleFactor", basal_rate),
        ("carbRatioScaleFactor", carbohydrate_ratio),
        ("insulinSensitivityScaleFactor", insulin_sensitivity),
    ] {
        validator
            .float64(reference, value)
            .in_range(SCALE_FACTOR_MINIMUM, SCALE_FACTOR_MAXIMUM);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverridePreset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(rename = "bgTarget", skip_serializing_if = "Option::is_none")]
    pub blood_glucose_target: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basal_rate_scale_factor: Option<f64>,
    #[serde(rename = "carbRatioScaleFactor", skip_serializing_if = "Option::is_none")]
    pub carbohydrate_ratio_scale_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin_sensitivity_scale_factor: Option<f64>,
}

impl Parse for OverridePreset {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.abbreviation = parser.string("abbreviation");
        self.duration = parser.int("duration");
        self.blood_glucose_target = parser.object("bgTarget");
        self.basal_rate_scale_factor = parser.float64("basalRateScaleFactor");
        self.carbohydrate_ratio_scale_factor = parser.float64("carbRatioScaleFactor");
        self.insulin_sensitivity_scale_factor = parser.float64("insulinSensitivityScaleFactor");
    }
}

impl NamedValue for OverridePreset {
    fn parse_named(parser: &mut ObjectParser<'_, '_>, name: &str) -> Option<Self> {
        parser.object(name)
    }

    fn validate(&self, validator: &mut Validator<'_>, units: UnitsContext<'_>) {
        validator
            .string("abbreviation", self.abbreviation.as_deref())
            .not_empty()
            .length_less_than_or_equal_to(ABBREVIATION_LENGTH_MAXIMUM);
        validator
            .int("duration", self.duration)
            .in_range(DURATION_MINIMUM, DURATION_MAXIMUM);
        if let Some(target) = &self.blood_glucose_target {
            target.validate(&mut validator.with_reference("bgTarget"), units.blood_glucose);
        }
        validate_scale_factors(
            validator,
            self.basal_rate_scale_factor,
            self.carbohydrate_ratio_scale_factor,
            self.insulin_sensitivity_scale_factor,
        );
    }

    fn normalize(&mut self, normalizer: &Normalizer, units: UnitsContext<'_>) {
        if let Some(target) = &mut self.blood_glucose_target {
            target.normalize(&normalizer.with_reference("bgTarget"), units.blood_glucose);
        }
    }
}

pub type OverridePresetMap = NamedMap<OverridePreset>;
