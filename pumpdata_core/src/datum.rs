//! Datum capability, common base fields and the type registry.
//!
//! Every record runs through the same pipeline: construct from its
//! `type`/`subType`, [`Datum::init`], [`Datum::parse`], [`Datum::validate`]
//! and, when requested, [`Datum::normalize`]. Issues from parse and validate
//! land in one list; none of them stop the pipeline.

use crate::error::{Error, Result};
use crate::pump::{PumpSettings, PUMP_SETTINGS_TYPE};
use crate::pump_settings_override::{
    PumpSettingsOverride, DEVICE_EVENT_TYPE, PUMP_SETTINGS_OVERRIDE_SUB_TYPE,
};
use crate::structure::{Issue, Meta, Normalizer, ObjectParser, Origin, Validator};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;
use uuid::Uuid;

pub const ID_LENGTH_MAXIMUM: usize = 64;

/// Known `(type, subType)` pairs.
pub const DATUM_TYPES: [(&str, Option<&str>); 2] = [
    (PUMP_SETTINGS_TYPE, None),
    (DEVICE_EVENT_TYPE, Some(PUMP_SETTINGS_OVERRIDE_SUB_TYPE)),
];

/// A typed telemetry record.
pub trait Datum: fmt::Debug {
    fn datum_type(&self) -> &'static str;

    fn sub_type(&self) -> Option<&'static str> {
        None
    }

    fn meta(&self) -> Meta {
        Meta::new(self.datum_type(), self.sub_type())
    }

    fn base(&self) -> &Base;

    /// Reset to a freshly identified, empty record.
    fn init(&mut self);

    fn parse(&mut self, parser: &mut ObjectParser<'_, '_>);

    fn validate(&self, validator: &mut Validator<'_>);

    fn normalize(&mut self, normalizer: &Normalizer);

    fn to_value(&self) -> Result<Value>;
}

/// Fields shared by every datum.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Base {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub datum_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_id: Option<String>,
}

impl Base {
    pub fn init(&mut self, datum_type: &str, sub_type: Option<&str>) {
        *self = Base {
            id: Some(new_id()),
            datum_type: Some(datum_type.to_string()),
            sub_type: sub_type.map(str::to_string),
            ..Default::default()
        };
    }

    pub fn parse(&mut self, parser: &mut ObjectParser<'_, '_>) {
        self.id = parser.string("id");
        self.datum_type = parser.string("type");
        self.sub_type = parser.string("subType");
        self.time = parser.time("time");
        self.device_id = parser.string("deviceId");
    }

    pub fn validate(&self, validator: &mut Validator<'_>, datum_type: &str, sub_type: Option<&str>) {
        validator
            .string("id", self.id.as_deref())
            .not_empty()
            .length_less_than_or_equal_to(ID_LENGTH_MAXIMUM);
        validator
            .string("type", self.datum_type.as_deref())
            .exists()
            .equal_to(datum_type);
        let sub_type_validator = validator.string("subType", self.sub_type.as_deref());
        match sub_type {
            Some(sub_type) => {
                sub_type_validator.exists().equal_to(sub_type);
            }
            None => {
                sub_type_validator.not_exists();
            }
        }
        validator.value("time", self.time.is_some()).exists();
        validator
            .string("deviceId", self.device_id.as_deref())
            .not_empty();
    }

    /// External documents without an id are given one.
    pub fn normalize(&mut self, normalizer: &Normalizer) {
        if normalizer.is_external() && self.id.is_none() {
            self.id = Some(new_id());
        }
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Empty datum for a `type`/`subType` pair, if the pair is known.
pub fn new_datum(datum_type: &str, sub_type: Option<&str>) -> Option<Box<dyn Datum>> {
    match (datum_type, sub_type) {
        (PUMP_SETTINGS_TYPE, _) => Some(Box::new(PumpSettings::default())),
        (DEVICE_EVENT_TYPE, Some(PUMP_SETTINGS_OVERRIDE_SUB_TYPE)) => {
            Some(Box::new(PumpSettingsOverride::default()))
        }
        _ => None,
    }
}

/// Outcome of running one document through the pipeline.
#[derive(Debug)]
pub struct Processed {
    pub datum: Box<dyn Datum>,
    pub issues: Vec<Issue>,
}

impl Processed {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Parse, validate and optionally normalize a single JSON document.
///
/// Only documents that are not objects or whose `type`/`subType` are unknown
/// return an error. Everything else comes back with its issues attached.
pub fn parse_datum(value: &Value, origin: Origin, normalize: bool) -> Result<Processed> {
    let object = value
        .as_object()
        .ok_or_else(|| Error::UnsupportedDocument("document is not an object".to_string()))?;

    let datum_type = object.get("type").and_then(Value::as_str).unwrap_or_default();
    let sub_type = object.get("subType").and_then(Value::as_str);
    let mut datum = new_datum(datum_type, sub_type).ok_or_else(|| {
        Error::UnsupportedDocument(Meta::new(datum_type, sub_type).to_string())
    })?;

    datum.init();
    let meta = datum.meta();
    let mut issues = Vec::new();

    let mut parser = ObjectParser::new(object, &mut issues)
        .with_origin(origin)
        .with_meta(meta.clone());
    datum.parse(&mut parser);

    let mut validator = Validator::new(&mut issues).with_origin(origin);
    datum.validate(&mut validator.with_meta(meta.clone()));

    if normalize {
        datum.normalize(&Normalizer::new(origin));
    }

    tracing::debug!(%meta, %origin, issues = issues.len(), normalize, "processed document");
    Ok(Processed { datum, issues })
}

/// Read a JSON file holding either one document or an array of documents.
pub fn read_documents(path: &Path) -> Result<Vec<Value>> {
    let contents = std::fs::read_to_string(path)?;
    let documents = match serde_json::from_str(&contents)? {
        Value::Array(documents) => documents,
        document => vec![document],
    };
    tracing::debug!("Read {} document(s) from {:?}", documents.len(), path);
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::ValidationError;
    use serde_json::json;

    fn base_issues(base: &Base, sub_type: Option<&str>) -> Vec<Issue> {
        let mut issues = Vec::new();
        base.validate(&mut Validator::new(&mut issues), "pumpSettings", sub_type);
        issues
    }

    #[test]
    fn test_init_assigns_identity() {
        let mut base = Base::default();
        base.init("deviceEvent", Some("pumpSettingsOverride"));
        let id = base.id.clone().unwrap();
        assert_eq!(id.len(), 32);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(base.datum_type.as_deref(), Some("deviceEvent"));
        assert_eq!(base.sub_type.as_deref(), Some("pumpSettingsOverride"));

        let mut other = Base::default();
        other.init("deviceEvent", None);
        assert_ne!(other.id, base.id);
    }

    #[test]
    fn test_base_validation() {
        let base = Base {
            id: Some(String::new()),
            datum_type: Some("cbg".into()),
            sub_type: Some("unexpected".into()),
            time: None,
            device_id: Some("pump-1".into()),
        };
        let issues = base_issues(&base, None);
        let pointers: Vec<_> = issues.iter().map(|i| i.pointer.as_str()).collect();
        assert_eq!(pointers, vec!["/id", "/type", "/subType", "/time"]);
        assert_eq!(issues[0].error, ValidationError::ValueEmpty);
        assert_eq!(
            issues[1].error,
            ValidationError::ValueStringNotEqualTo {
                value: "cbg".into(),
                expected: "pumpSettings".into()
            }
        );
        assert_eq!(issues[2].error, ValidationError::ValueExists);
        assert_eq!(issues[3].error, ValidationError::ValueNotExists);
    }

    #[test]
    fn test_normalize_assigns_missing_id_for_external_only() {
        let mut base = Base::default();
        base.normalize(&Normalizer::new(Origin::Store));
        assert!(base.id.is_none());

        base.normalize(&Normalizer::new(Origin::External));
        assert!(base.id.is_some());
    }

    #[test]
    fn test_new_datum_registry() {
        for (datum_type, sub_type) in DATUM_TYPES {
            let datum = new_datum(datum_type, sub_type).unwrap();
            assert_eq!(datum.datum_type(), datum_type);
            assert_eq!(datum.sub_type(), sub_type);
        }
        assert!(new_datum("deviceEvent", Some("alarm")).is_none());
        assert!(new_datum("cbg", None).is_none());
    }

    #[test]
    fn test_parse_datum_rejects_unknown_documents() {
        let err = parse_datum(&json!([1, 2]), Origin::External, true).unwrap_err();
        assert!(matches!(err, Error::UnsupportedDocument(_)));

        let err = parse_datum(&json!({ "type": "cbg" }), Origin::External, true).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported document: cbg");
    }

    #[test]
    fn test_parse_datum_reports_issues_with_meta() {
        crate::logging::init_test();
        let processed = parse_datum(
            &json!({
                "type": "deviceEvent",
                "subType": "pumpSettingsOverride",
                "time": "not a time"
            }),
            Origin::External,
            false,
        )
        .unwrap();

        assert!(!processed.is_valid());
        let time = processed
            .issues
            .iter()
            .find(|issue| issue.pointer == "/time")
            .unwrap();
        assert_eq!(
            time.error,
            ValidationError::ValueStringAsTimeNotValid {
                value: "not a time".into()
            }
        );
        assert_eq!(
            time.meta.as_ref().map(ToString::to_string).as_deref(),
            Some("deviceEvent/pumpSettingsOverride")
        );
        // Without normalization the absent id stays absent.
        assert!(processed.datum.base().id.is_none());
    }

    #[test]
    fn test_read_documents_accepts_object_or_array() {
        let temp_dir = tempfile::tempdir().unwrap();
        let single = temp_dir.path().join("single.json");
        let many = temp_dir.path().join("many.json");
        std::fs::write(&single, r#"{ "type": "pumpSettings" }"#).unwrap();
        std::fs::write(&many, r#"[{ "type": "pumpSettings" }, 7]"#).unwrap();

        assert_eq!(read_documents(&single).unwrap().len(), 1);
        let documents = read_documents(&many).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[1], json!(7));

        let broken = temp_dir.path().join("broken.json");
        std::fs::write(&broken, "{").unwrap();
        assert!(matches!(read_documents(&broken), Err(Error::Json(_))));
    }
}
