//! Temporary override of pump settings, recorded as a device event.

use crate::blood_glucose::{self, Target};
use crate::datum::{Base, Datum};
use crate::error::Result;
use crate::pump::{validate_scale_factors, DURATION_MAXIMUM, DURATION_MINIMUM};
use crate::structure::{Normalizer, ObjectParser, Parse, Validator};
use serde::Serialize;
use serde_json::Value;

pub const DEVICE_EVENT_TYPE: &str = "deviceEvent";
pub const PUMP_SETTINGS_OVERRIDE_SUB_TYPE: &str = "pumpSettingsOverride";

pub const OVERRIDE_TYPE_PRESET: &str = "preset";
pub const OVERRIDE_TYPES: [&str; 5] = [
    "custom",
    "physicalActivity",
    "preprandial",
    OVERRIDE_TYPE_PRESET,
    "sleep",
];
pub const OVERRIDE_PRESET_LENGTH_MAXIMUM: usize = 100;

pub const METHODS: [&str; 2] = ["automatic", "manual"];

/// Glucose unit of the override's target.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OverrideUnits {
    #[serde(rename = "bg", skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<String>,
}

impl Parse for OverrideUnits {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.blood_glucose = parser.string("bg");
    }
}

impl OverrideUnits {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        let glucose_units = blood_glucose::units_for_origin(validator.origin());
        validator
            .string("bg", self.blood_glucose.as_deref())
            .exists()
            .one_of(glucose_units);
    }

    pub fn normalize(&mut self, normalizer: &Normalizer) {
        if normalizer.is_external() {
            self.blood_glucose = blood_glucose::normalize_units(self.blood_glucose.as_deref());
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpSettingsOverride {
    #[serde(flatten)]
    pub base: Base,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_preset: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_target: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basal_rate_scale_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carb_ratio_scale_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin_sensitivity_scale_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<OverrideUnits>,
}

impl PumpSettingsOverride {
    fn units_blood_glucose(&self) -> Option<&str> {
        self.units
            .as_ref()
            .and_then(|units| units.blood_glucose.as_deref())
    }
}

impl Datum for PumpSettingsOverride {
    fn datum_type(&self) -> &'static str {
        DEVICE_EVENT_TYPE
    }

    fn sub_type(&self) -> Option<&'static str> {
        Some(PUMP_SETTINGS_OVERRIDE_SUB_TYPE)
    }

    fn base(&self) -> &Base {
        &self.base
    }

    fn init(&mut self) {
        *self = PumpSettingsOverride::default();
        self.base
            .init(DEVICE_EVENT_TYPE, Some(PUMP_SETTINGS_OVERRIDE_SUB_TYPE));
    }

    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.base.parse(parser);

        self.override_type = parser.string("overrideType");
        self.override_preset = parser.string("overridePreset");
        self.method = parser.string("method");
        self.duration = parser.int("duration");
        self.expected_duration = parser.int("expectedDuration");
        self.bg_target = parser.object("bgTarget");
        self.basal_rate_scale_factor = parser.float64("basalRateScaleFactor");
        self.carb_ratio_scale_factor = parser.float64("carbRatioScaleFactor");
        self.insulin_sensitivity_scale_factor = parser.float64("insulinSensitivityScaleFactor");
        self.units = parser.object("units");
    }

    fn validate(&self, validator: &mut Validator<'_>) {
        self.base.validate(
            validator,
            DEVICE_EVENT_TYPE,
            Some(PUMP_SETTINGS_OVERRIDE_SUB_TYPE),
        );

        validator
            .string("overrideType", self.override_type.as_deref())
            .exists()
            .one_of(&OVERRIDE_TYPES);
        let override_preset = validator.string("overridePreset", self.override_preset.as_deref());
        if self.override_type.as_deref() == Some(OVERRIDE_TYPE_PRESET) {
            override_preset
                .exists()
                .not_empty()
                .length_less_than_or_equal_to(OVERRIDE_PRESET_LENGTH_MAXIMUM);
        } else {
            override_preset.not_exists();
        }
        validator
            .string("method", self.method.as_deref())
            .one_of(&METHODS);

        validator
            .int("duration", self.duration)
            .in_range(DURATION_MINIMUM, DURATION_MAXIMUM);
        let expected_duration_minimum = self
            .duration
            .filter(|duration| (DURATION_MINIMUM..=DURATION_MAXIMUM).contains(duration))
            .unwrap_or(DURATION_MINIMUM);
        validator
            .int("expectedDuration", self.expected_duration)
            .in_range(expected_duration_minimum, DURATION_MAXIMUM);

        if let Some(target) = &self.bg_target {
            target.validate(
                &mut validator.with_reference("bgTarget"),
                self.units_blood_glucose(),
            );
        }
        validate_scale_factors(
            validator,
            self.basal_rate_scale_factor,
            self.carb_ratio_scale_factor,
            self.insulin_sensitivity_scale_factor,
        );

        let units = validator.value("units", self.units.is_some());
        if self.bg_target.is_some() {
            units.exists();
        } else {
            units.not_exists();
        }
        if let Some(units) = &self.units {
            units.validate(&mut validator.with_reference("units"));
        }
    }

    fn normalize(&mut self, normalizer: &Normalizer) {
        self.base.normalize(normalizer);

        let units = self
            .units
            .as_ref()
            .and_then(|units| units.blood_glucose.as_deref());
        if let Some(target) = &mut self.bg_target {
            target.normalize(&normalizer.with_reference("bgTarget"), units);
        }
        if let Some(units) = &mut self.units {
            units.normalize(&normalizer.with_reference("units"));
        }
    }

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::parse_datum;
    use crate::structure::{Issue, Origin, ValidationError};
    use serde_json::json;

    fn document() -> Value {
        json!({
            "type": "deviceEvent",
            "subType": "pumpSettingsOverride",
            "time": "2024-03-01T17:30:00Z",
            "overrideType": "physicalActivity",
            "method": "manual",
            "duration": 3600000,
            "expectedDuration": 3600000,
            "bgTarget": { "low": 140, "high": 160 },
            "basalRateScaleFactor": 0.5,
            "units": { "bg": "mg/dL" }
        })
    }

    fn check(value: &Value) -> Vec<Issue> {
        parse_datum(value, Origin::External, false).unwrap().issues
    }

    #[test]
    fn test_valid_override() {
        assert!(check(&document()).is_empty());
    }

    #[test]
    fn test_scale_factor_below_minimum() {
        let mut value = document();
        value["basalRateScaleFactor"] = json!(0.09);
        let issues = check(&value);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/basalRateScaleFactor");
        assert_eq!(
            issues[0].error,
            ValidationError::ValueNotInRange {
                value: 0.09,
                min: 0.1,
                max: 10.0
            }
        );
    }

    #[test]
    fn test_scale_factor_bounds_are_inclusive() {
        for factor in [0.1, 10.0] {
            let mut value = document();
            value["basalRateScaleFactor"] = json!(factor);
            value["carbRatioScaleFactor"] = json!(factor);
            value["insulinSensitivityScaleFactor"] = json!(factor);
            assert!(check(&value).is_empty(), "{}", factor);
        }

        let mut value = document();
        value["insulinSensitivityScaleFactor"] = json!(10.1);
        let issues = check(&value);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/insulinSensitivityScaleFactor");
        assert_eq!(
            issues[0].error.to_string(),
            "value 10.1 is not between 0.1 and 10"
        );
    }

    #[test]
    fn test_expected_duration_not_below_duration() {
        let mut value = document();
        value["duration"] = json!(3600);
        value["expectedDuration"] = json!(3599);
        let issues = check(&value);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/expectedDuration");
        assert_eq!(
            issues[0].error,
            ValidationError::ValueNotInRange {
                value: 3599.0,
                min: 3600.0,
                max: 604800000.0
            }
        );

        // An out-of-range duration does not raise the floor.
        value["duration"] = json!(-1);
        let pointers: Vec<_> = check(&value)
            .into_iter()
            .map(|issue| issue.pointer)
            .collect();
        assert_eq!(pointers, vec!["/duration"]);
    }

    #[test]
    fn test_override_preset_only_for_preset_type() {
        let mut value = document();
        value["overridePreset"] = json!("Running");
        let issues = check(&value);
        assert_eq!(issues[0].pointer, "/overridePreset");
        assert_eq!(issues[0].error, ValidationError::ValueExists);

        value["overrideType"] = json!("preset");
        assert!(check(&value).is_empty());

        value["overridePreset"] = json!("");
        let issues = check(&value);
        assert_eq!(issues[0].error, ValidationError::ValueEmpty);

        value.as_object_mut().unwrap().remove("overridePreset");
        let issues = check(&value);
        assert_eq!(issues[0].error, ValidationError::ValueNotExists);
    }

    #[test]
    fn test_override_preset_length_limit() {
        let mut value = document();
        value["overrideType"] = json!("preset");
        value["overridePreset"] = json!("p".repeat(OVERRIDE_PRESET_LENGTH_MAXIMUM));
        assert!(check(&value).is_empty());

        value["overridePreset"] = json!("p".repeat(OVERRIDE_PRESET_LENGTH_MAXIMUM + 1));
        let issues = check(&value);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/overridePreset");
        assert_eq!(
            issues[0].error,
            ValidationError::LengthNotLessThanOrEqualTo {
                length: 101,
                maximum: 100
            }
        );
    }

    #[test]
    fn test_units_track_bg_target() {
        let mut value = document();
        value.as_object_mut().unwrap().remove("units");
        let found = check(&value);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pointer, "/units");
        assert_eq!(found[0].error, ValidationError::ValueNotExists);

        let mut value = document();
        value.as_object_mut().unwrap().remove("bgTarget");
        let found = check(&value);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].pointer, "/units");
        assert_eq!(found[0].error, ValidationError::ValueExists);
    }

    #[test]
    fn test_unknown_override_type_and_method() {
        let mut value = document();
        value["overrideType"] = json!("vacation");
        value["method"] = json!("remote");
        let pointers: Vec<_> = check(&value).into_iter().map(|i| i.pointer).collect();
        assert_eq!(pointers, vec!["/overrideType", "/method"]);
    }

    #[test]
    fn test_normalize_converts_target_then_units() {
        let processed = parse_datum(&document(), Origin::External, true).unwrap();
        let value = processed.datum.to_value().unwrap();
        assert_eq!(value["units"]["bg"], json!("mmol/L"));
        assert_eq!(value["bgTarget"]["low"], json!(7.77105));
        assert_eq!(value["bgTarget"]["high"], json!(8.8812));
        assert_eq!(value["subType"], json!("pumpSettingsOverride"));
    }
}
