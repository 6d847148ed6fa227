//! Insulin activity model.

use crate::structure::{ObjectParser, Parse, Validator};
use serde::Serialize;

pub const MODEL_TYPE_FIASP: &str = "fiasp";
pub const MODEL_TYPE_LYUMJEV: &str = "lyumjev";
pub const MODEL_TYPE_RAPID_ADULT: &str = "rapidAdult";
pub const MODEL_TYPE_RAPID_CHILD: &str = "rapidChild";
pub const MODEL_TYPE_WALTER: &str = "walter";
pub const MODEL_TYPE_OTHER: &str = "other";

pub const MODEL_TYPES: [&str; 6] = [
    MODEL_TYPE_FIASP,
    MODEL_TYPE_LYUMJEV,
    MODEL_TYPE_RAPID_ADULT,
    MODEL_TYPE_RAPID_CHILD,
    MODEL_TYPE_WALTER,
    MODEL_TYPE_OTHER,
];

pub const MODEL_TYPE_OTHER_LENGTH_MAXIMUM: usize = 100;

/// Durations are in seconds.
pub const ACTION_DURATION_MINIMUM: i64 = 0;
pub const ACTION_DURATION_MAXIMUM: i64 = 86_400;
pub const ACTION_DELAY_MINIMUM: i64 = 0;
pub const ACTION_DELAY_MAXIMUM: i64 = 86_400;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsulinModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_type_other: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_delay: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_duration: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_peak_offset: Option<i64>,
}

impl Parse for InsulinModel {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.model_type = parser.string("modelType");
        self.model_type_other = parser.string("modelTypeOther");
        self.action_delay = parser.int("actionDelay");
        self.action_duration = parser.int("actionDuration");
        self.action_peak_offset = parser.int("actionPeakOffset");
    }
}

impl InsulinModel {
    pub fn validate(&self, validator: &mut Validator<'_>) {
        validator
            .string("modelType", self.model_type.as_deref())
            .one_of(&MODEL_TYPES);

        let model_type_other = validator.string("modelTypeOther", self.model_type_other.as_deref());
        if self.model_type.as_deref() == Some(MODEL_TYPE_OTHER) {
            model_type_other
                .exists()
                .not_empty()
                .length_less_than_or_equal_to(MODEL_TYPE_OTHER_LENGTH_MAXIMUM);
        } else {
            model_type_other.not_exists();
        }

        validator
            .int("actionDelay", self.action_delay)
            .in_range(ACTION_DELAY_MINIMUM, ACTION_DELAY_MAXIMUM);
        validator
            .int("actionDuration", self.action_duration)
            .in_range(ACTION_DURATION_MINIMUM, ACTION_DURATION_MAXIMUM);

        let peak_offset_maximum = self
            .action_duration
            .filter(|duration| (ACTION_DURATION_MINIMUM..=ACTION_DURATION_MAXIMUM).contains(duration))
            .unwrap_or(ACTION_DURATION_MAXIMUM);
        validator
            .int("actionPeakOffset", self.action_peak_offset)
            .in_range(ACTION_DURATION_MINIMUM, peak_offset_maximum);
    }
}
