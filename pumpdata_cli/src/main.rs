use clap::{Parser, Subcommand};
use pumpdata_core::*;
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "pumpdata")]
#[command(about = "Validate and normalize diabetes device settings records", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate documents, then print an issue report
    Check {
        /// JSON file holding one document or an array of documents
        file: PathBuf,

        /// Document origin (external, internal, store)
        #[arg(long)]
        origin: Option<Origin>,

        /// Report format (text, json, csv)
        #[arg(long)]
        format: Option<OutputFormat>,

        /// Skip normalization
        #[arg(long)]
        no_normalize: bool,
    },

    /// Print documents after normalization; issues go to stderr
    Normalize {
        /// JSON file holding one document or an array of documents
        file: PathBuf,

        /// Document origin (external, internal, store)
        #[arg(long)]
        origin: Option<Origin>,
    },

    /// List supported datum types
    Types,
}

fn main() -> Result<()> {
    pumpdata_core::logging::init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Check {
            file,
            origin,
            format,
            no_normalize,
        } => cmd_check(
            &file,
            origin.unwrap_or(config.validation.origin),
            format.unwrap_or(config.output.format),
            config.validation.normalize && !no_normalize,
            config.output.pretty,
        ),
        Commands::Normalize { file, origin } => cmd_normalize(
            &file,
            origin.unwrap_or(config.validation.origin),
            config.output.pretty,
        ),
        Commands::Types => cmd_types(),
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

fn process_file(file: &Path, origin: Origin, normalize: bool) -> Result<Vec<Result<Processed>>> {
    let documents = read_documents(file)?;
    tracing::info!(
        "Processing {} document(s) from {:?} as {}",
        documents.len(),
        file,
        origin
    );
    Ok(documents
        .iter()
        .map(|document| parse_datum(document, origin, normalize))
        .collect())
}

fn build_report(outcomes: &[Result<Processed>]) -> Report {
    let mut report = Report::new();
    for (index, outcome) in outcomes.iter().enumerate() {
        report.add(index, outcome);
    }
    report
}

fn cmd_check(
    file: &Path,
    origin: Origin,
    format: OutputFormat,
    normalize: bool,
    pretty: bool,
) -> Result<()> {
    let outcomes = process_file(file, origin, normalize)?;
    let report = build_report(&outcomes);

    report.write(io::stdout().lock(), format, pretty)?;

    if report.is_clean() {
        Ok(())
    } else {
        Err(Error::Invalid(report.problem_count()))
    }
}

fn cmd_normalize(file: &Path, origin: Origin, pretty: bool) -> Result<()> {
    let outcomes = process_file(file, origin, true)?;
    let report = build_report(&outcomes);

    let mut documents = Vec::with_capacity(outcomes.len());
    for processed in outcomes.iter().flatten() {
        documents.push(processed.datum.to_value()?);
    }
    // A single document prints as an object, several as an array.
    let output = match documents.len() {
        1 => documents.remove(0),
        _ => Value::Array(documents),
    };

    let stdout = io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(stdout, &output)?;
    } else {
        serde_json::to_writer(stdout, &output)?;
    }
    println!();

    if report.is_clean() {
        Ok(())
    } else {
        report.write_text(io::stderr().lock())?;
        Err(Error::Invalid(report.problem_count()))
    }
}

fn cmd_types() -> Result<()> {
    for (datum_type, sub_type) in DATUM_TYPES {
        println!("{}", Meta::new(datum_type, sub_type));
    }
    Ok(())
}
