use super::UnitsContext;
use crate::blood_glucose::Target;
use crate::schedule::{validate_start, StartEntry};
use crate::structure::{Normalizer, ObjectParser, Parse, Validator};
use serde::Serialize;

/// A glucose [`Target`] that takes effect at `start`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BloodGlucoseTargetStart {
    #[serde(flatten)]
    pub target: Target,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
}

impl Parse for BloodGlucoseTargetStart {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.target.parse(parser);
        self.start = parser.int("start");
    }
}

impl StartEntry for BloodGlucoseTargetStart {
    fn start(&self) -> Option<i64> {
        self.start
    }

    fn validate(&self, validator: &mut Validator<'_>, start_minimum: i64, units: UnitsContext<'_>) {
        self.target.validate(validator, units.blood_glucose);
        validate_start(validator, self.start, start_minimum);
    }

    fn normalize(&mut self, normalizer: &Normalizer, units: UnitsContext<'_>) {
        self.target.normalize(normalizer, units.blood_glucose);
    }
}
