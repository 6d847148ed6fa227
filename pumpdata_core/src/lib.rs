#![forbid(unsafe_code)]

//! Parsing, validation and normalization of diabetes device settings.
//!
//! This crate provides:
//! - The parse/validate/normalize collaborators (`structure`)
//! - Unit-aware ranges and blood glucose conversion
//! - Start-ordered schedules and named schedule maps
//! - Pump settings and pump settings override datum types
//! - Issue reports (text, JSON, CSV)

pub mod blood_glucose;
pub mod config;
pub mod datum;
pub mod error;
pub mod logging;
pub mod pump;
pub mod pump_settings_override;
pub mod range;
pub mod report;
pub mod schedule;
pub mod structure;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use datum::{new_datum, parse_datum, read_documents, Base, Datum, Processed, DATUM_TYPES};
pub use error::{Error, Result};
pub use pump::PumpSettings;
pub use pump_settings_override::PumpSettingsOverride;
pub use report::Report;
pub use structure::{Issue, Meta, Origin, ValidationError};
