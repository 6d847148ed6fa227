//! Unit-dependent numeric ranges.
//!
//! A range is a pure function of the quantity being measured and the unit
//! string it was reported in. An absent or unrecognized unit yields the
//! widest possible range: the unit is validated on its own, so a misspelled
//! unit produces exactly one issue instead of also rejecting the value.

use crate::blood_glucose::{
    MG_DL, MG_DL_ALIAS, MG_DL_MAXIMUM, MG_DL_MINIMUM, MMOL_L, MMOL_L_ALIAS, MMOL_L_MAXIMUM,
    MMOL_L_MINIMUM,
};

pub const UNITS: &str = "Units";
pub const UNITS_PER_HOUR: &str = "Units/hour";

pub const HOURS: &str = "hours";
pub const MINUTES: &str = "minutes";
pub const SECONDS: &str = "seconds";

pub const GRAMS: &str = "grams";
pub const EXCHANGES: &str = "exchanges";

/// Grams of carbohydrate in one exchange.
pub const GRAMS_PER_EXCHANGE: f64 = 15.0;

pub const BASAL_RATE_MAXIMUM: f64 = 100.0;
pub const BOLUS_AMOUNT_MAXIMUM: f64 = 100.0;
pub const INSULIN_DURATION_HOURS_MAXIMUM: f64 = 10.0;
pub const CARBOHYDRATE_RATIO_GRAMS_MAXIMUM: f64 = 250.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Returned when no table entry applies.
pub const UNBOUNDED: (f64, f64) = (-f64::MAX, f64::MAX);

/// Physical quantity whose legal range depends on its unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Quantity {
    GlucoseValue,
    GlucoseTarget,
    BasalRate,
    BolusAmount,
    InsulinSensitivity,
    InsulinDuration,
    CarbohydrateRatio,
    SleepOffset,
}

impl Quantity {
    pub const ALL: [Quantity; 8] = [
        Quantity::GlucoseValue,
        Quantity::GlucoseTarget,
        Quantity::BasalRate,
        Quantity::BolusAmount,
        Quantity::InsulinSensitivity,
        Quantity::InsulinDuration,
        Quantity::CarbohydrateRatio,
        Quantity::SleepOffset,
    ];
}

/// Inclusive `(min, max)` for `quantity` expressed in `unit`.
pub fn range_for_unit(quantity: Quantity, unit: Option<&str>) -> (f64, f64) {
    let Some(unit) = unit else {
        return UNBOUNDED;
    };

    match quantity {
        Quantity::GlucoseValue | Quantity::GlucoseTarget | Quantity::InsulinSensitivity => {
            match unit {
                MMOL_L | MMOL_L_ALIAS => (MMOL_L_MINIMUM, MMOL_L_MAXIMUM),
                MG_DL | MG_DL_ALIAS => (MG_DL_MINIMUM, MG_DL_MAXIMUM),
                _ => UNBOUNDED,
            }
        }
        Quantity::BasalRate => match unit {
            UNITS_PER_HOUR => (0.0, BASAL_RATE_MAXIMUM),
            _ => UNBOUNDED,
        },
        Quantity::BolusAmount => match unit {
            UNITS => (0.0, BOLUS_AMOUNT_MAXIMUM),
            _ => UNBOUNDED,
        },
        Quantity::InsulinDuration => match unit {
            HOURS => (0.0, INSULIN_DURATION_HOURS_MAXIMUM),
            MINUTES => (0.0, INSULIN_DURATION_HOURS_MAXIMUM * 60.0),
            SECONDS => (0.0, INSULIN_DURATION_HOURS_MAXIMUM * 3600.0),
            _ => UNBOUNDED,
        },
        Quantity::CarbohydrateRatio => match unit {
            GRAMS => (0.0, CARBOHYDRATE_RATIO_GRAMS_MAXIMUM),
            EXCHANGES => (0.0, CARBOHYDRATE_RATIO_GRAMS_MAXIMUM / GRAMS_PER_EXCHANGE),
            _ => UNBOUNDED,
        },
        Quantity::SleepOffset => match unit {
            SECONDS => (0.0, SECONDS_PER_DAY),
            _ => UNBOUNDED,
        },
    }
}
