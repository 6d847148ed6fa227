//! Time-of-day schedules and named collections of them.
//!
//! A [`StartArray`] is a sequence of entries that each take effect at a
//! `start` offset (milliseconds after midnight). The first entry must start
//! at exactly midnight and every later entry must start strictly after the
//! one before it. A [`NamedMap`] keys values (schedules, presets, ...) by
//! name and always walks them in sorted name order.

use crate::pump::UnitsContext;
use crate::structure::{sorted_names, ArrayParser, Normalizer, ObjectParser, Parse, Validator};
use serde::{Serialize, Serializer};
use std::collections::HashMap;

pub const START_MINIMUM: i64 = 0;
pub const START_MAXIMUM: i64 = 86_400_000;

/// Check `start` against the floor handed down by the enclosing array.
///
/// A floor of [`START_MINIMUM`] means "must be exactly midnight"; any other
/// floor is an inclusive lower bound.
pub fn validate_start(validator: &mut Validator<'_>, start: Option<i64>, start_minimum: i64) {
    let start = validator.int("start", start).exists();
    if start_minimum == START_MINIMUM {
        start.equal_to(START_MINIMUM);
    } else {
        start.in_range(start_minimum, START_MAXIMUM);
    }
}

/// An element of a [`StartArray`].
pub trait StartEntry: Parse + Default {
    fn start(&self) -> Option<i64>;

    /// Validate every field, calling [`validate_start`] for `start`.
    fn validate(&self, validator: &mut Validator<'_>, start_minimum: i64, units: UnitsContext<'_>);

    fn normalize(&mut self, _normalizer: &Normalizer, _units: UnitsContext<'_>) {}
}

/// Entries ordered by strictly increasing start. Elements that were null or
/// not objects in the input are kept as `None` so their index survives.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct StartArray<T>(pub Vec<Option<T>>);

impl<T: StartEntry> StartArray<T> {
    pub fn parse(parser: &mut ArrayParser<'_, '_>) -> Self {
        let entries = (0..parser.len()).map(|index| parser.object(index)).collect();
        Self(entries)
    }

    pub fn validate(&self, validator: &mut Validator<'_>, units: UnitsContext<'_>) {
        let mut start_minimum = START_MINIMUM;
        for (index, entry) in self.0.iter().enumerate() {
            let reference = index.to_string();
            match entry {
                Some(entry) => {
                    entry.validate(&mut validator.with_reference(&reference), start_minimum, units)
                }
                None => {
                    validator.value(&reference, false).exists();
                }
            }

            // A missing or out-of-range start leaves the floor where it was
            // so the next entry is not rejected on its account.
            if index == 0 {
                start_minimum = START_MINIMUM + 1;
            } else if let Some(start) = entry
                .as_ref()
                .and_then(StartEntry::start)
                .filter(|start| (START_MINIMUM..=START_MAXIMUM).contains(start))
            {
                start_minimum = start + 1;
            }
        }
    }

    pub fn normalize(&mut self, normalizer: &Normalizer, units: UnitsContext<'_>) {
        for (index, entry) in self.0.iter_mut().enumerate() {
            if let Some(entry) = entry {
                entry.normalize(&normalizer.with_reference(&index.to_string()), units);
            }
        }
    }

    pub fn first(&self) -> Option<&T> {
        self.0.first().and_then(Option::as_ref)
    }

    pub fn last(&self) -> Option<&T> {
        self.0.last().and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A value that can live under a name in a [`NamedMap`].
pub trait NamedValue: Sized {
    /// Parse the value stored under `name`, or `None` if it is absent or of
    /// the wrong shape.
    fn parse_named(parser: &mut ObjectParser<'_, '_>, name: &str) -> Option<Self>;

    fn validate(&self, validator: &mut Validator<'_>, units: UnitsContext<'_>);

    fn normalize(&mut self, _normalizer: &Normalizer, _units: UnitsContext<'_>) {}
}

impl<T: StartEntry> NamedValue for StartArray<T> {
    fn parse_named(parser: &mut ObjectParser<'_, '_>, name: &str) -> Option<Self> {
        let mut array = parser.with_reference_array_parser(name)?;
        Some(StartArray::parse(&mut array))
    }

    fn validate(&self, validator: &mut Validator<'_>, units: UnitsContext<'_>) {
        StartArray::validate(self, validator, units)
    }

    fn normalize(&mut self, normalizer: &Normalizer, units: UnitsContext<'_>) {
        StartArray::normalize(self, normalizer, units)
    }
}

/// Values keyed by name. Any string is a valid name, including "".
///
/// Names whose value was null or malformed are kept for validation but
/// left out of the serialized output.
#[derive(Clone, Debug, PartialEq)]
pub struct NamedMap<V>(pub HashMap<String, Option<V>>);

impl<V: Serialize> Serialize for NamedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(
            sorted_names(&self.0)
                .into_iter()
                .filter_map(|name| self.0[&name].as_ref().map(|value| (name, value))),
        )
    }
}

impl<V> Default for NamedMap<V> {
    fn default() -> Self {
        Self(HashMap::new())
    }
}

/// Named collection of schedules, e.g. `basalRateSchedules`.
pub type StartArrayMap<T> = NamedMap<StartArray<T>>;

impl<V: NamedValue> Parse for NamedMap<V> {
    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        for name in parser.references() {
            let value = V::parse_named(parser, &name);
            self.0.insert(name, value);
        }
    }
}

impl<V: NamedValue> NamedMap<V> {
    pub fn get(&self, name: &str) -> Option<&V> {
        self.0.get(name).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn validate(&self, validator: &mut Validator<'_>, units: UnitsContext<'_>) {
        for name in sorted_names(&self.0) {
            match &self.0[&name] {
                Some(value) => value.validate(&mut validator.with_reference(&name), units),
                None => {
                    validator.value(&name, false).exists();
                }
            }
        }
    }

    pub fn normalize(&mut self, normalizer: &Normalizer, units: UnitsContext<'_>) {
        for name in sorted_names(&self.0) {
            if let Some(Some(value)) = self.0.get_mut(&name) {
                value.normalize(&normalizer.with_reference(&name), units);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pump::BasalRateStart;
    use crate::structure::{Issue, Origin, ValidationError};
    use serde_json::{json, Value};

    fn parse_array(value: Value) -> (StartArray<BasalRateStart>, Vec<Issue>) {
        let mut issues = Vec::new();
        let array = value.as_array().cloned().unwrap();
        let schedule = StartArray::parse(&mut ArrayParser::new(&array, &mut issues));
        (schedule, issues)
    }

    fn validate_array(schedule: &StartArray<BasalRateStart>) -> Vec<Issue> {
        let mut issues = Vec::new();
        schedule.validate(&mut Validator::new(&mut issues), UnitsContext::default());
        issues
    }

    fn entry(rate: f64, start: Option<i64>) -> Option<BasalRateStart> {
        Some(BasalRateStart {
            rate: Some(rate),
            start,
        })
    }

    #[test]
    fn test_valid_schedule() {
        let (schedule, issues) = parse_array(json!([
            { "rate": 0.5, "start": 0 },
            { "rate": 1.0, "start": 3600000 },
            { "rate": 0.75, "start": 3600001 },
        ]));
        assert!(issues.is_empty());
        assert_eq!(schedule.len(), 3);
        assert!(validate_array(&schedule).is_empty());
        assert_eq!(schedule.first().unwrap().rate, Some(0.5));
        assert_eq!(schedule.last().unwrap().start, Some(3600001));
    }

    #[test]
    fn test_first_entry_must_start_at_midnight() {
        let schedule = StartArray(vec![entry(1.0, Some(1800000))]);
        let issues = validate_array(&schedule);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/0/start");
        assert_eq!(
            issues[0].error,
            ValidationError::ValueNotEqualTo {
                value: 1800000.0,
                expected: 0.0
            }
        );
    }

    #[test]
    fn test_starts_must_strictly_increase() {
        let schedule = StartArray(vec![
            entry(1.0, Some(0)),
            entry(1.0, Some(7200000)),
            entry(1.0, Some(7200000)),
        ]);
        let issues = validate_array(&schedule);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/2/start");
        assert_eq!(
            issues[0].error,
            ValidationError::ValueNotInRange {
                value: 7200000.0,
                min: 7200001.0,
                max: 86400000.0
            }
        );
    }

    #[test]
    fn test_second_entry_floor_is_one() {
        let schedule = StartArray(vec![entry(1.0, Some(0)), entry(1.0, Some(0))]);
        let issues = validate_array(&schedule);
        assert_eq!(
            issues[0].error,
            ValidationError::ValueNotInRange {
                value: 0.0,
                min: 1.0,
                max: 86400000.0
            }
        );
    }

    #[test]
    fn test_out_of_range_start_does_not_move_floor() {
        let schedule = StartArray(vec![
            entry(1.0, Some(0)),
            entry(1.0, Some(i64::MAX)),
            entry(1.0, Some(-5)),
        ]);
        let issues = validate_array(&schedule);
        let pointers: Vec<_> = issues.iter().map(|i| i.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/1/start", "/2/start"]);
        assert_eq!(
            issues[1].error,
            ValidationError::ValueNotInRange {
                value: -5.0,
                min: 1.0,
                max: 86400000.0
            }
        );
    }

    #[test]
    fn test_missing_start_does_not_cascade() {
        let schedule = StartArray(vec![
            entry(1.0, Some(0)),
            entry(1.0, Some(3600000)),
            entry(1.0, None),
            entry(1.0, Some(7200000)),
        ]);
        let issues = validate_array(&schedule);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/2/start");
        assert_eq!(issues[0].error, ValidationError::ValueNotExists);
    }

    #[test]
    fn test_null_entries_reported_at_index() {
        let (schedule, issues) = parse_array(json!([{ "rate": 1.0, "start": 0 }, null]));
        assert!(issues.is_empty());
        assert_eq!(schedule.len(), 2);
        assert!(schedule.last().is_none());

        let issues = validate_array(&schedule);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].pointer, "/1");
        assert_eq!(issues[0].error, ValidationError::ValueNotExists);
    }

    #[test]
    fn test_first_and_last_on_empty() {
        let schedule: StartArray<BasalRateStart> = StartArray::default();
        assert!(schedule.first().is_none());
        assert!(schedule.last().is_none());
        assert!(schedule.is_empty());
    }

    #[test]
    fn test_map_errors_follow_sorted_names() {
        // Build in non-lexicographic order.
        let mut map: StartArrayMap<BasalRateStart> = NamedMap::default();
        for name in ["two", "one", "three"] {
            map.0
                .insert(name.to_string(), Some(StartArray(vec![entry(-1.0, Some(0))])));
        }
        map.0.insert("four".to_string(), None);

        for _ in 0..5 {
            let mut issues = Vec::new();
            map.validate(&mut Validator::new(&mut issues), UnitsContext::default());
            let pointers: Vec<_> = issues.iter().map(|i| i.pointer.as_str()).collect();
            assert_eq!(pointers, vec!["/four", "/one/0/rate", "/three/0/rate", "/two/0/rate"]);
        }
    }

    #[test]
    fn test_map_parse_keeps_bad_values_as_none() {
        let doc = json!({ "standard": [{ "rate": 1.0, "start": 0 }], "": [], "broken": 7 });
        let object = doc.as_object().cloned().unwrap();
        let mut issues = Vec::new();
        let mut map: StartArrayMap<BasalRateStart> = NamedMap::default();
        map.parse(&mut ObjectParser::new(&object, &mut issues));

        assert_eq!(map.len(), 3);
        assert_eq!(map.get("standard").unwrap().len(), 1);
        assert!(map.get("").unwrap().is_empty());
        assert!(map.get("broken").is_none());
        assert_eq!(issues[0].pointer, "/broken");
        assert_eq!(issues[0].error, ValidationError::TypeNotArray);
    }

    #[test]
    fn test_map_output_skips_absent_values() {
        let mut map: StartArrayMap<BasalRateStart> = NamedMap::default();
        map.0
            .insert("standard".into(), Some(StartArray(vec![entry(1.0, Some(0)), None])));
        map.0.insert("broken".into(), None);

        let value = serde_json::to_value(&map).unwrap();
        assert_eq!(value, json!({ "standard": [{ "rate": 1.0, "start": 0 }, null] }));
    }

    #[test]
    fn test_normalize_walks_entries() {
        // Basal rates carry no glucose unit, so this only checks the walk
        // leaves them untouched.
        let mut map: StartArrayMap<BasalRateStart> = NamedMap::default();
        map.0
            .insert("a".into(), Some(StartArray(vec![entry(1.5, Some(0)), None])));
        let before = map.clone();
        map.normalize(&Normalizer::new(Origin::External), UnitsContext::default());
        assert_eq!(map, before);
    }
}
