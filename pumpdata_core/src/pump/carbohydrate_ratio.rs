use super::UnitsContext;
use crate::range::{range_for_unit, Quantity};
use crate::schedule::{validate_start, StartEntry};
use crate::structure::{ObjectParser, Parse, Validator};
use serde::Serialize;

/// Grams (or exchanges) of carbohydrate covered by one unit of insulin.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CarbohydrateRatioStart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
}

impl Parse for CarbohydrateRatioStart {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.amount = parser.float64("amount");
        self.start = parser.int("start");
    }
}

impl StartEntry for CarbohydrateRatioStart {
    fn start(&self) -> Option<i64> {
        self.start
    }

    fn validate(&self, validator: &mut Validator<'_>, start_minimum: i64, units: UnitsContext<'_>) {
        let (min, max) = range_for_unit(Quantity::CarbohydrateRatio, units.carbohydrate);
        validator.float64("amount", self.amount).exists().in_range(min, max);
        validate_start(validator, self.start, start_minimum);
    }
}
