use crate::blood_glucose::{MG_DL, MMOL_L};
use crate::structure::{ObjectParser, Parse, Validator};
use serde::Serialize;

pub const DISPLAY_BLOOD_GLUCOSE_UNITS: [&str; 2] = [MG_DL, MMOL_L];

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DisplayBloodGlucose {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl Parse for DisplayBloodGlucose {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.units = parser.string("units");
    }
}

impl DisplayBloodGlucose {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        validator
            .string("units", self.units.as_deref())
            .exists()
            .one_of(&DISPLAY_BLOOD_GLUCOSE_UNITS);
    }
}

/// How the device presents values to its user.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Display {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_glucose: Option<DisplayBloodGlucose>,
}

impl Parse for Display {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.blood_glucose = parser.object("bloodGlucose");
    }
}

impl Display {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        if let Some(blood_glucose) = &self.blood_glucose {
            blood_glucose.validate(&mut validator.with_reference("bloodGlucose"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::ValidationError;

    #[test]
    fn test_display_units() {
        let mut issues = Vec::new();
        let display = Display {
            blood_glucose: Some(DisplayBloodGlucose {
                units: Some("mg/dl".into()),
            }),
        };
        display.validate(&mut Validator::new(&mut issues));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/bloodGlucose/units");
        assert_eq!(
            issues[0].error,
            ValidationError::not_one_of("mg/dl", &DISPLAY_BLOOD_GLUCOSE_UNITS)
        );
    }

    #[test]
    fn test_display_units_required() {
        let mut issues = Vec::new();
        let display = Display {
            blood_glucose: Some(DisplayBloodGlucose::default()),
        };
        display.validate(&mut Validator::new(&mut issues));
        assert_eq!(issues[0].error, ValidationError::ValueNotExists);
    }
}
