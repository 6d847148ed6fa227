//! Bolus limits and bolus calculator settings.

use super::UnitsContext;
use crate::range::{range_for_unit, Quantity, HOURS, MINUTES, SECONDS, UNITS};
use crate::schedule::{NamedMap, NamedValue};
use crate::structure::{ObjectParser, Parse, Validator};
use serde::Serialize;

pub const INSULIN_DURATION_UNITS: [&str; 3] = [HOURS, MINUTES, SECONDS];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BolusAmountMaximum {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Parse for BolusAmountMaximum {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.units = parser.string("units");
        self.value = parser.float64("value");
    }
}

impl BolusAmountMaximum {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        validator
            .string("units", self.units.as_deref())
            .exists()
            .one_of(&[UNITS]);
        let (min, max) = range_for_unit(Quantity::BolusAmount, self.units.as_deref());
        validator.float64("value", self.value).exists().in_range(min, max);
    }
}

/// Duration of insulin action assumed by the calculator.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BolusCalculatorInsulin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl Parse for BolusCalculatorInsulin {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.duration = parser.float64("duration");
        self.units = parser.string("units");
    }
}

impl BolusCalculatorInsulin {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        let (min, max) = range_for_unit(Quantity::InsulinDuration, self.units.as_deref());
        validator.float64("duration", self.duration).exists().in_range(min, max);
        validator
            .string("units", self.units.as_deref())
            .exists()
            .one_of(&INSULIN_DURATION_UNITS);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BolusCalculator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin: Option<BolusCalculatorInsulin>,
}

impl Parse for BolusCalculator {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.enabled = parser.bool("enabled");
        self.insulin = parser.object("insulin");
    }
}

impl BolusCalculator {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        validator.bool("enabled", self.enabled).exists();
        if let Some(insulin) = &self.insulin {
            insulin.validate(&mut validator.with_reference("insulin"));
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BolusExtended {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl Parse for BolusExtended {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.enabled = parser.bool("enabled");
    }
}

impl BolusExtended {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        validator.bool("enabled", self.enabled).exists();
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bolus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_maximum: Option<BolusAmountMaximum>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculator: Option<BolusCalculator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended: Option<BolusExtended>,
}

impl Parse for Bolus {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.amount_maximum = parser.object("amountMaximum");
        self.calculator = parser.object("calculator");
        self.extended = parser.object("extended");
    }
}

impl NamedValue for Bolus {
    fn parse_named(parser: &mut ObjectParser<'_, '_>, name: &str) -> Option<Self> {
        parser.object(name)
    }

    fn validate(&self, validator: &mut Validator<'_>, _units: UnitsContext<'_>) {
        if let Some(amount_maximum) = &self.amount_maximum {
            amount_maximum.validate(&mut validator.with_reference("amountMaximum"));
        }
        if let Some(calculator) = &self.calculator {
            calculator.validate(&mut validator.with_reference("calculator"));
        }
        if let Some(extended) = &self.extended {
            extended.validate(&mut validator.with_reference("extended"));
        }
    }
}

/// Bolus settings keyed by schedule name.
pub type BolusMap = NamedMap<Bolus>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Issue, ValidationError};
    use serde_json::json;

    fn validate(bolus: &Bolus) -> Vec<Issue> {
        let mut issues = Vec::new();
        bolus.validate(&mut Validator::new(&mut issues), UnitsContext::default());
        issues
    }

    #[test]
    fn test_parse_and_validate_bolus() {
        let doc = json!({
            "amountMaximum": { "units": "Units", "value": 10.0 },
            "calculator": { "enabled": true, "insulin": { "duration": 4.0, "units": "hours" } },
            "extended": { "enabled": false }
        });
        let object = doc.as_object().cloned().unwrap();
        let mut issues = Vec::new();
        let mut bolus = Bolus::default();
        bolus.parse(&mut ObjectParser::new(&object, &mut issues));

        assert!(issues.is_empty());
        assert!(validate(&bolus).is_empty());
        assert_eq!(serde_json::to_value(&bolus).unwrap(), doc);
    }

    #[test]
    fn test_insulin_duration_range_per_unit() {
        let mut bolus = Bolus {
            calculator: Some(BolusCalculator {
                enabled: Some(true),
                insulin: Some(BolusCalculatorInsulin {
                    duration: Some(480.0),
                    units: Some("minutes".into()),
                }),
            }),
            ..Default::default()
        };
        assert!(validate(&bolus).is_empty());

        if let Some(insulin) = bolus
            .calculator
            .as_mut()
            .and_then(|calculator| calculator.insulin.as_mut())
        {
            insulin.units = Some("hours".into());
        }
        let issues = validate(&bolus);
        assert_eq!(issues[0].pointer, "/calculator/insulin/duration");
        assert_eq!(
            issues[0].error,
            ValidationError::ValueNotInRange {
                value: 480.0,
                min: 0.0,
                max: 10.0
            }
        );
    }

    #[test]
    fn test_required_enabled_flags() {
        let bolus = Bolus {
            calculator: Some(BolusCalculator::default()),
            extended: Some(BolusExtended::default()),
            ..Default::default()
        };
        let pointers: Vec<_> = validate(&bolus).into_iter().map(|i| i.pointer).collect();
        assert_eq!(pointers, vec!["/calculator/enabled", "/extended/enabled"]);
    }

    #[test]
    fn test_bolus_map_validates_sorted() {
        let mut boluses = BolusMap::default();
        let bad = Bolus {
            extended: Some(BolusExtended::default()),
            ..Default::default()
        };
        boluses.0.insert("zeta".into(), Some(bad.clone()));
        boluses.0.insert("alpha".into(), Some(bad));

        let mut issues = Vec::new();
        boluses.validate(&mut Validator::new(&mut issues), UnitsContext::default());
        let pointers: Vec<_> = issues.iter().map(|i| i.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/alpha/extended/enabled", "/zeta/extended/enabled"]);
    }
}
