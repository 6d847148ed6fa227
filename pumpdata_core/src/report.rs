//! Issue reports for a batch of documents.
//!
//! A report records, per input document, either the issues found while
//! processing it or the reason it could not be processed at all. It renders
//! as plain text, JSON or CSV.

use crate::config::OutputFormat;
use crate::datum::Processed;
use crate::structure::{Issue, Meta};
use crate::Result;
use serde::Serialize;
use std::io::Write;

/// Code used in CSV rows for documents that could not be dispatched.
pub const UNSUPPORTED_DOCUMENT_CODE: &str = "unsupported-document";

/// Outcome for one input document.
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    /// Index of the document in the input.
    pub document: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    pub issues: Vec<Issue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DocumentReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.error.is_none()
    }
}

#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub documents: Vec<DocumentReport>,
}

/// A row in the CSV output
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    document: usize,
    code: &'a str,
    pointer: &'a str,
    #[serde(rename = "type")]
    datum_type: Option<&'a str>,
    #[serde(rename = "subType")]
    sub_type: Option<&'a str>,
    detail: String,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of processing document `document`.
    pub fn add(&mut self, document: usize, outcome: &Result<Processed>) {
        let entry = match outcome {
            Ok(processed) => DocumentReport {
                document,
                meta: Some(processed.datum.meta()),
                issues: processed.issues.clone(),
                error: None,
            },
            Err(error) => DocumentReport {
                document,
                meta: None,
                issues: Vec::new(),
                error: Some(error.to_string()),
            },
        };
        self.documents.push(entry);
    }

    /// Issues plus undispatchable documents.
    pub fn problem_count(&self) -> usize {
        self.documents
            .iter()
            .map(|document| document.issues.len() + usize::from(document.error.is_some()))
            .sum()
    }

    pub fn is_clean(&self) -> bool {
        self.documents.iter().all(DocumentReport::is_clean)
    }

    pub fn write<W: Write>(&self, writer: W, format: OutputFormat, pretty: bool) -> Result<()> {
        match format {
            OutputFormat::Text => self.write_text(writer),
            OutputFormat::Json => self.write_json(writer, pretty),
            OutputFormat::Csv => self.write_csv(writer),
        }
    }

    pub fn write_text<W: Write>(&self, mut writer: W) -> Result<()> {
        for document in &self.documents {
            let label = match &document.meta {
                Some(meta) => format!("document {} ({})", document.document, meta),
                None => format!("document {}", document.document),
            };
            if let Some(error) = &document.error {
                writeln!(writer, "{}: {}", label, error)?;
            } else if document.issues.is_empty() {
                writeln!(writer, "{}: ok", label)?;
            } else {
                writeln!(writer, "{}: {} issue(s)", label, document.issues.len())?;
                for issue in &document.issues {
                    let pointer = if issue.pointer.is_empty() { "/" } else { &issue.pointer };
                    writeln!(writer, "  {}: {}", pointer, issue.error)?;
                }
            }
        }
        writeln!(
            writer,
            "{} document(s), {} problem(s)",
            self.documents.len(),
            self.problem_count()
        )?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, mut writer: W, pretty: bool) -> Result<()> {
        if pretty {
            serde_json::to_writer_pretty(&mut writer, self)?;
        } else {
            serde_json::to_writer(&mut writer, self)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    /// One row per issue; clean documents produce no rows.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(true)
            .from_writer(writer);

        for document in &self.documents {
            let datum_type = document.meta.as_ref().map(|meta| meta.datum_type.as_str());
            let sub_type = document.meta.as_ref().and_then(|meta| meta.sub_type.as_deref());

            if let Some(error) = &document.error {
                writer.serialize(CsvRow {
                    document: document.document,
                    code: UNSUPPORTED_DOCUMENT_CODE,
                    pointer: "",
                    datum_type,
                    sub_type,
                    detail: error.clone(),
                })?;
            }
            for issue in &document.issues {
                writer.serialize(CsvRow {
                    document: document.document,
                    code: issue.error.code(),
                    pointer: &issue.pointer,
                    datum_type,
                    sub_type,
                    detail: issue.error.to_string(),
                })?;
            }
        }

        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::parse_datum;
    use crate::structure::Origin;
    use serde_json::json;

    fn report() -> Report {
        let documents = [
            json!({
                "type": "deviceEvent",
                "subType": "pumpSettingsOverride",
                "time": "2024-03-01T17:30:00Z",
                "overrideType": "custom",
                "basalRateScaleFactor": 0.09
            }),
            json!({ "type": "cbg" }),
        ];
        let mut report = Report::new();
        for (index, document) in documents.iter().enumerate() {
            report.add(index, &parse_datum(document, Origin::External, true));
        }
        report
    }

    fn render(report: &Report, format: OutputFormat) -> String {
        let mut buffer = Vec::new();
        report.write(&mut buffer, format, false).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_counts() {
        let report = report();
        assert_eq!(report.problem_count(), 2);
        assert!(!report.is_clean());
        assert!(Report::new().is_clean());
    }

    #[test]
    fn test_text_output() {
        let text = render(&report(), OutputFormat::Text);
        assert!(text.contains("document 0 (deviceEvent/pumpSettingsOverride): 1 issue(s)"));
        assert!(text.contains("  /basalRateScaleFactor: value 0.09 is not between 0.1 and 10"));
        assert!(text.contains("document 1: Unsupported document: cbg"));
        assert!(text.ends_with("2 document(s), 2 problem(s)\n"));
    }

    #[test]
    fn test_json_output() {
        let value: serde_json::Value =
            serde_json::from_str(&render(&report(), OutputFormat::Json)).unwrap();
        let first = &value["documents"][0];
        assert_eq!(first["meta"]["subType"], json!("pumpSettingsOverride"));
        assert_eq!(first["issues"][0]["code"], json!("value-not-in-range"));
        assert_eq!(
            first["issues"][0]["source"]["pointer"],
            json!("/basalRateScaleFactor")
        );
        assert!(first.get("error").is_none());
        assert_eq!(value["documents"][1]["error"], json!("Unsupported document: cbg"));
    }

    #[test]
    fn test_csv_output() {
        let csv = render(&report(), OutputFormat::Csv);
        let lines: Vec<_> = csv.lines().collect();
        assert_eq!(lines[0], "document,code,pointer,type,subType,detail");
        assert_eq!(
            lines[1],
            "0,value-not-in-range,/basalRateScaleFactor,deviceEvent,pumpSettingsOverride,value 0.09 is not between 0.1 and 10"
        );
        assert_eq!(lines[2], "1,unsupported-document,,,,Unsupported document: cbg");
        assert_eq!(lines.len(), 3);
    }
}
