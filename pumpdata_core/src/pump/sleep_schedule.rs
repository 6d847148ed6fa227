//! Recurring sleep windows.

use super::UnitsContext;
use crate::range::{range_for_unit, Quantity, SECONDS};
use crate::schedule::{NamedMap, NamedValue};
use crate::structure::{ObjectParser, Parse, Validator};
use serde::Serialize;

pub const DAYS_OF_WEEK: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// `start` and `end` are seconds after midnight.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct SleepSchedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<i64>,
}

impl Parse for SleepSchedule {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.enabled = parser.bool("enabled");
        self.days = parser.string_array("days");
        self.start = parser.int("start");
        self.end = parser.int("end");
    }
}

impl NamedValue for SleepSchedule {
    fn parse_named(parser: &mut ObjectParser<'_, '_>, name: &str) -> Option<Self> {
        parser.object(name)
    }

    fn validate(&self, validator: &mut Validator<'_>, _units: UnitsContext<'_>) {
        validator.bool("enabled", self.enabled).exists();

        // The window is required when enabled and forbidden when disabled.
        let days = validator
            .string_array("days", self.days.as_deref())
            .each_one_of(&DAYS_OF_WEEK)
            .each_unique();
        match self.enabled {
            Some(true) => {
                days.exists();
            }
            Some(false) => {
                days.not_exists();
            }
            None => {}
        }

        let (min, max) = range_for_unit(Quantity::SleepOffset, Some(SECONDS));
        let (min, max) = (min as i64, max as i64);
        for (reference, value) in [("start", self.start), ("end", self.end)] {
            let offset = validator.int(reference, value).in_range(min, max);
            match self.enabled {
                Some(true) => {
                    offset.exists();
                }
                Some(false) => {
                    offset.not_exists();
                }
                None => {}
            }
        }
    }
}

pub type SleepScheduleMap = NamedMap<SleepSchedule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::{Issue, ValidationError};

    fn validate(schedule: SleepSchedule) -> Vec<Issue> {
        let mut schedules = SleepScheduleMap::default();
        schedules.0.insert("weeknights".into(), Some(schedule));
        let mut issues = Vec::new();
        schedules.validate(&mut Validator::new(&mut issues), UnitsContext::default());
        issues
    }

    #[test]
    fn test_enabled_schedule_requires_window() {
        let issues = validate(SleepSchedule {
            enabled: Some(true),
            ..Default::default()
        });
        let pointers: Vec<_> = issues.iter().map(|i| i.pointer.as_str()).collect();
        assert_eq!(
            pointers,
            vec!["/weeknights/days", "/weeknights/start", "/weeknights/end"]
        );
        assert!(issues.iter().all(|i| i.error == ValidationError::ValueNotExists));
    }

    #[test]
    fn test_disabled_schedule_needs_nothing_else() {
        let issues = validate(SleepSchedule {
            enabled: Some(false),
            ..Default::default()
        });
        assert!(issues.is_empty());

        let issues = validate(SleepSchedule::default());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/weeknights/enabled");
    }

    #[test]
    fn test_disabled_schedule_rejects_window() {
        let issues = validate(SleepSchedule {
            enabled: Some(false),
            days: Some(vec!["monday".into()]),
            start: Some(100),
            end: Some(200),
        });
        let pointers: Vec<_> = issues.iter().map(|i| i.pointer.as_str()).collect();
        assert_eq!(
            pointers,
            vec!["/weeknights/days", "/weeknights/start", "/weeknights/end"]
        );
        assert!(issues.iter().all(|i| i.error == ValidationError::ValueExists));
    }

    #[test]
    fn test_days_must_be_unique_weekdays() {
        let issues = validate(SleepSchedule {
            enabled: Some(true),
            days: Some(vec!["monday".into(), "funday".into(), "monday".into()]),
            start: Some(79_200),
            end: Some(25_200),
        });
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].pointer, "/weeknights/days/1");
        assert_eq!(issues[0].error, ValidationError::not_one_of("funday", &DAYS_OF_WEEK));
        assert_eq!(issues[1].pointer, "/weeknights/days/2");
        assert_eq!(issues[1].error, ValidationError::ValueDuplicate);
    }

    #[test]
    fn test_offsets_within_a_day() {
        let issues = validate(SleepSchedule {
            enabled: Some(true),
            days: Some(vec!["friday".into()]),
            start: Some(86_401),
            end: Some(-1),
        });
        let pointers: Vec<_> = issues.iter().map(|i| i.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/weeknights/start", "/weeknights/end"]);
    }
}
