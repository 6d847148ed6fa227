//! Pump settings datum and its components.
//!
//! A `pumpSettings` record describes the therapy configuration of an insulin
//! pump: schedules, limits, targets and presets. Several fields come in a
//! singular form (one schedule) and a plural form (schedules keyed by name);
//! a record may carry one or the other, never both.
//!
//! Glucose-bearing children are validated against, and normalized from, the
//! record's own `units.bg`.

mod basal;
mod blood_glucose_target;
mod bolus;
mod carbohydrate_ratio;
mod display;
mod insulin_model;
mod insulin_sensitivity;
mod override_preset;
mod sleep_schedule;
mod units;

pub use basal::{Basal, BasalRateMaximum, BasalRateStart, BasalTemporary, BASAL_TEMPORARY_TYPES};
pub use blood_glucose_target::BloodGlucoseTargetStart;
pub use bolus::{
    Bolus, BolusAmountMaximum, BolusCalculator, BolusCalculatorInsulin, BolusExtended, BolusMap,
    INSULIN_DURATION_UNITS,
};
pub use carbohydrate_ratio::CarbohydrateRatioStart;
pub use display::{Display, DisplayBloodGlucose, DISPLAY_BLOOD_GLUCOSE_UNITS};
pub use insulin_model::{InsulinModel, MODEL_TYPES, MODEL_TYPE_OTHER};
pub use insulin_sensitivity::InsulinSensitivityStart;
pub use override_preset::{
    OverridePreset, OverridePresetMap, DURATION_MAXIMUM, DURATION_MINIMUM, SCALE_FACTOR_MAXIMUM,
    SCALE_FACTOR_MINIMUM,
};
pub(crate) use override_preset::validate_scale_factors;
pub use sleep_schedule::{SleepSchedule, SleepScheduleMap, DAYS_OF_WEEK};
pub use units::{Units, UnitsContext, CARBOHYDRATE_UNITS, INSULIN_UNITS};

use crate::blood_glucose::{normalize_in_place, value_range_for_units, Target};
use crate::datum::{Base, Datum};
use crate::error::Result;
use crate::schedule::{NamedValue, StartArray, StartArrayMap, StartEntry};
use crate::structure::{Normalizer, ObjectParser, Validator};
use serde::Serialize;
use serde_json::Value;

pub const PUMP_SETTINGS_TYPE: &str = "pumpSettings";

pub const MANUFACTURERS_LENGTH_MAXIMUM: usize = 10;
pub const MANUFACTURER_LENGTH_MAXIMUM: usize = 100;
pub const TEXT_LENGTH_MAXIMUM: usize = 100;

/// Minutes; one week either side of UTC.
pub const SCHEDULE_TIME_ZONE_OFFSET_MINIMUM: i64 = -10_080;
pub const SCHEDULE_TIME_ZONE_OFFSET_MAXIMUM: i64 = 10_080;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PumpSettings {
    #[serde(flatten)]
    pub base: Base,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_schedule: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automated_delivery: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basal: Option<Basal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basal_rate_schedule: Option<StartArray<BasalRateStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basal_rate_schedules: Option<StartArrayMap<BasalRateStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_safety_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_target: Option<StartArray<BloodGlucoseTargetStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_targets: Option<StartArrayMap<BloodGlucoseTargetStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_target_physical_activity: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_target_preprandial: Option<Target>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bolus: Option<Bolus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boluses: Option<BolusMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carb_ratio: Option<StartArray<CarbohydrateRatioStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carb_ratios: Option<StartArrayMap<CarbohydrateRatioStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<Display>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firmware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin_model: Option<InsulinModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin_sensitivity: Option<StartArray<InsulinSensitivityStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insulin_sensitivities: Option<StartArrayMap<InsulinSensitivityStart>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturers: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_presets: Option<OverridePresetMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_time_zone_offset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_schedules: Option<SleepScheduleMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,
}

fn start_array<T: StartEntry>(
    parser: &mut ObjectParser<'_, '_>,
    reference: &str,
) -> Option<StartArray<T>> {
    let mut array = parser.with_reference_array_parser(reference)?;
    Some(StartArray::parse(&mut array))
}

/// Validate whichever of a singular/plural pair is present. When both are,
/// the singular form wins and the plural one is reported as unexpected.
fn validate_exclusive<S, P>(
    validator: &mut Validator<'_>,
    singular: (&str, Option<&S>),
    plural: (&str, Option<&P>),
    validate_singular: impl FnOnce(&S, &mut Validator<'_>),
    validate_plural: impl FnOnce(&P, &mut Validator<'_>),
) {
    match (singular.1, plural.1) {
        (Some(value), other) => {
            validate_singular(value, &mut validator.with_reference(singular.0));
            validator.value(plural.0, other.is_some()).not_exists();
        }
        (None, Some(value)) => validate_plural(value, &mut validator.with_reference(plural.0)),
        (None, None) => {}
    }
}

impl PumpSettings {
    fn validate_text(validator: &mut Validator<'_>, reference: &str, value: Option<&str>) {
        validator
            .string(reference, value)
            .not_empty()
            .length_less_than_or_equal_to(TEXT_LENGTH_MAXIMUM);
    }
}

impl Datum for PumpSettings {
    fn datum_type(&self) -> &'static str {
        PUMP_SETTINGS_TYPE
    }

    fn base(&self) -> &Base {
        &self.base
    }

    fn init(&mut self) {
        *self = PumpSettings::default();
        self.base.init(PUMP_SETTINGS_TYPE, None);
    }

    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.base.parse(parser);

        self.active_schedule = parser.string("activeSchedule");
        self.automated_delivery = parser.bool("automatedDelivery");
        self.basal = parser.object("basal");
        self.basal_rate_schedule = start_array(parser, "basalRateSchedule");
        self.basal_rate_schedules = parser.object("basalRateSchedules");
        self.bg_safety_limit = parser.float64("bgSafetyLimit");
        self.bg_target = start_array(parser, "bgTarget");
        self.bg_targets = parser.object("bgTargets");
        self.bg_target_physical_activity = parser.object("bgTargetPhysicalActivity");
        self.bg_target_preprandial = parser.object("bgTargetPreprandial");
        self.bolus = parser.object("bolus");
        self.boluses = parser.object("boluses");
        self.carb_ratio = start_array(parser, "carbRatio");
        self.carb_ratios = parser.object("carbRatios");
        self.display = parser.object("display");
        self.firmware_version = parser.string("firmwareVersion");
        self.hardware_version = parser.string("hardwareVersion");
        self.insulin_model = parser.object("insulinModel");
        self.insulin_sensitivity = start_array(parser, "insulinSensitivity");
        self.insulin_sensitivities = parser.object("insulinSensitivities");
        self.manufacturers = parser.string_array("manufacturers");
        self.model = parser.string("model");
        self.name = parser.string("name");
        self.override_presets = parser.object("overridePresets");
        self.schedule_time_zone_offset = parser.int("scheduleTimeZoneOffset");
        self.serial_number = parser.string("serialNumber");
        self.sleep_schedules = parser.object("sleepSchedules");
        self.software_version = parser.string("softwareVersion");
        self.units = parser.object("units");
    }

    fn validate(&self, validator: &mut Validator<'_>) {
        self.base.validate(validator, PUMP_SETTINGS_TYPE, None);

        let units = self.units.as_ref().map(Units::context).unwrap_or_default();

        validator
            .string("activeSchedule", self.active_schedule.as_deref())
            .exists()
            .not_empty();
        if let Some(basal) = &self.basal {
            basal.validate(&mut validator.with_reference("basal"));
        }
        validate_exclusive(
            validator,
            ("basalRateSchedule", self.basal_rate_schedule.as_ref()),
            ("basalRateSchedules", self.basal_rate_schedules.as_ref()),
            |schedule, validator| schedule.validate(validator, units),
            |schedules, validator| schedules.validate(validator, units),
        );

        let (min, max) = value_range_for_units(units.blood_glucose);
        validator
            .float64("bgSafetyLimit", self.bg_safety_limit)
            .in_range(min, max);
        validate_exclusive(
            validator,
            ("bgTarget", self.bg_target.as_ref()),
            ("bgTargets", self.bg_targets.as_ref()),
            |schedule, validator| schedule.validate(validator, units),
            |schedules, validator| schedules.validate(validator, units),
        );
        if let Some(target) = &self.bg_target_physical_activity {
            target.validate(
                &mut validator.with_reference("bgTargetPhysicalActivity"),
                units.blood_glucose,
            );
        }
        if let Some(target) = &self.bg_target_preprandial {
            target.validate(
                &mut validator.with_reference("bgTargetPreprandial"),
                units.blood_glucose,
            );
        }

        validate_exclusive(
            validator,
            ("bolus", self.bolus.as_ref()),
            ("boluses", self.boluses.as_ref()),
            |bolus, validator| NamedValue::validate(bolus, validator, units),
            |boluses, validator| boluses.validate(validator, units),
        );
        validate_exclusive(
            validator,
            ("carbRatio", self.carb_ratio.as_ref()),
            ("carbRatios", self.carb_ratios.as_ref()),
            |schedule, validator| schedule.validate(validator, units),
            |schedules, validator| schedules.validate(validator, units),
        );

        if let Some(display) = &self.display {
            display.validate(&mut validator.with_reference("display"));
        }
        Self::validate_text(validator, "firmwareVersion", self.firmware_version.as_deref());
        Self::validate_text(validator, "hardwareVersion", self.hardware_version.as_deref());
        if let Some(insulin_model) = &self.insulin_model {
            insulin_model.validate(&mut validator.with_reference("insulinModel"));
        }
        validate_exclusive(
            validator,
            ("insulinSensitivity", self.insulin_sensitivity.as_ref()),
            ("insulinSensitivities", self.insulin_sensitivities.as_ref()),
            |schedule, validator| schedule.validate(validator, units),
            |schedules, validator| schedules.validate(validator, units),
        );

        validator
            .string_array("manufacturers", self.manufacturers.as_deref())
            .not_empty()
            .length_less_than_or_equal_to(MANUFACTURERS_LENGTH_MAXIMUM)
            .each_not_empty()
            .each_length_less_than_or_equal_to(MANUFACTURER_LENGTH_MAXIMUM)
            .each_unique();
        Self::validate_text(validator, "model", self.model.as_deref());
        Self::validate_text(validator, "name", self.name.as_deref());
        if let Some(presets) = &self.override_presets {
            presets.validate(&mut validator.with_reference("overridePresets"), units);
        }
        validator
            .int("scheduleTimeZoneOffset", self.schedule_time_zone_offset)
            .in_range(SCHEDULE_TIME_ZONE_OFFSET_MINIMUM, SCHEDULE_TIME_ZONE_OFFSET_MAXIMUM);
        Self::validate_text(validator, "serialNumber", self.serial_number.as_deref());
        if let Some(schedules) = &self.sleep_schedules {
            schedules.validate(&mut validator.with_reference("sleepSchedules"), units);
        }
        Self::validate_text(validator, "softwareVersion", self.software_version.as_deref());

        validator.value("units", self.units.is_some()).exists();
        if let Some(pump_units) = &self.units {
            pump_units.validate(&mut validator.with_reference("units"));
        }
    }

    fn normalize(&mut self, normalizer: &Normalizer) {
        self.base.normalize(normalizer);

        // Children convert from the reported unit, so `units` itself is
        // rewritten last.
        let units = self.units.as_ref().map(Units::context).unwrap_or_default();

        if normalizer.is_external() {
            normalize_in_place(&mut self.bg_safety_limit, units.blood_glucose);
        }
        if let Some(schedule) = &mut self.bg_target {
            schedule.normalize(&normalizer.with_reference("bgTarget"), units);
        }
        if let Some(schedules) = &mut self.bg_targets {
            schedules.normalize(&normalizer.with_reference("bgTargets"), units);
        }
        if let Some(target) = &mut self.bg_target_physical_activity {
            target.normalize(
                &normalizer.with_reference("bgTargetPhysicalActivity"),
                units.blood_glucose,
            );
        }
        if let Some(target) = &mut self.bg_target_preprandial {
            target.normalize(
                &normalizer.with_reference("bgTargetPreprandial"),
                units.blood_glucose,
            );
        }
        if let Some(schedule) = &mut self.insulin_sensitivity {
            schedule.normalize(&normalizer.with_reference("insulinSensitivity"), units);
        }
        if let Some(schedules) = &mut self.insulin_sensitivities {
            schedules.normalize(&normalizer.with_reference("insulinSensitivities"), units);
        }
        if let Some(presets) = &mut self.override_presets {
            presets.normalize(&normalizer.with_reference("overridePresets"), units);
        }

        if let Some(pump_units) = &mut self.units {
            pump_units.normalize(&normalizer.with_reference("units"));
        }
    }

    fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}
