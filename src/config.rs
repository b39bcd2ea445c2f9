//! Input validation and pipeline configuration.
//!
//! The five user-supplied parameters (source, output, start/end time,
//! passphrase, mail address) are normalized and validated here into an
//! immutable [`PipelineConfig`] before any stage runs. Validation is
//! fail-fast: the first failed check aborts the run with its dedicated
//! exit code.
//!
//! Interactive resolution of absent values goes through the
//! [`FieldResolver`] capability so quiet mode and tests can substitute a
//! non-interactive implementation.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use lazy_static::lazy_static;
use log::info;
use regex::Regex;

use crate::cli::Args;
use crate::constants::{DEFAULT_OUTPUT_PREFIX, MAIL_DOMAIN, TIMESTAMP_INPUT_FORMAT};
use crate::errors::PipelineError;
use crate::security::REDACTED;

lazy_static! {
    /// Case-insensitive `*.zip` file name pattern
    static ref ZIP_NAME_PATTERN: Regex = Regex::new(r"(?i)\.zip$").unwrap();

    /// Case-insensitive `*.csv` file name pattern
    static ref CSV_NAME_PATTERN: Regex = Regex::new(r"(?i)\.csv$").unwrap();

    /// Exact `YYYY-MM-DD HH-MM-SS` shape; chrono alone would accept
    /// unpadded fields like `2023-1-15`
    static ref TIMESTAMP_PATTERN: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2} \d{2}-\d{2}-\d{2}$").unwrap();

    /// `local-part@<organizational domain>` with nothing else around it
    static ref MAIL_PATTERN: Regex = Regex::new(&format!(
        r"^[A-Za-z0-9._%+-]+@{}$",
        regex::escape(MAIL_DOMAIN)
    ))
    .unwrap();
}

/// Validated evidence source: either a zip archive or a directory that is
/// used directly as evidence input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourcePath {
    /// An existing `*.zip` archive file
    Archive(PathBuf),
    /// An existing evidence directory
    Directory(PathBuf),
}

impl SourcePath {
    pub fn path(&self) -> &std::path::Path {
        match self {
            SourcePath::Archive(p) | SourcePath::Directory(p) => p,
        }
    }
}

/// Immutable configuration of one pipeline run, produced by validation and
/// never mutated thereafter.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Evidence bundle: archive file or directory
    pub source: SourcePath,
    /// Destination of the exported timeline
    pub output: PathBuf,
    /// Lower time bound, absent means "not requested"
    pub start_time: Option<NaiveDateTime>,
    /// Upper time bound, absent means "not requested"
    pub end_time: Option<NaiveDateTime>,
    /// Archive passphrase, absent means unprotected entries
    pub passphrase: Option<String>,
    /// Notification recipient, absent means no notification
    pub mail_addr: Option<String>,
    /// Non-interactive mode: unset optional fields stay unset
    pub quiet: bool,
}

impl PipelineConfig {
    /// Record every resolved input in the log. The passphrase value is
    /// replaced by a placeholder; only its presence is recorded.
    pub fn log_resolved(&self) {
        info!("Input: {}", self.source.path().display());
        info!("Output: {}", self.output.display());
        info!(
            "Time window: {} .. {}",
            self.start_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "open".to_string()),
            self.end_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "open".to_string()),
        );
        info!(
            "Passphrase: {}",
            if self.passphrase.is_some() { REDACTED } else { "none" }
        );
        info!(
            "Notification: {}",
            self.mail_addr.as_deref().unwrap_or("none")
        );
    }
}

/// Capability for resolving a missing input field.
///
/// `required` marks fields the pipeline cannot run without; for optional
/// fields a blank answer means "skip" and resolves to `None`.
#[cfg_attr(test, mockall::automock)]
pub trait FieldResolver {
    fn resolve(&self, field: &str, required: bool) -> Result<Option<String>>;
}

/// Interactive resolver reading from stdin, used outside quiet mode.
pub struct StdinResolver;

impl FieldResolver for StdinResolver {
    fn resolve(&self, field: &str, required: bool) -> Result<Option<String>> {
        let hint = if required { "" } else { " (leave blank to skip)" };
        print!("Missing {}: please enter a value{}\n> ", field, hint);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        let value = line.trim().to_string();

        if value.is_empty() && !required {
            return Ok(None);
        }
        Ok(Some(value))
    }
}

/// Default output file name: `Supertimeline_<current-date>.csv`.
pub fn default_output_name() -> String {
    format!(
        "{}{}.csv",
        DEFAULT_OUTPUT_PREFIX,
        Local::now().format("%Y-%m-%d")
    )
}

/// Validate the evidence source path.
///
/// A path matching the zip name pattern must reference an existing regular
/// file; anything else must reference an existing directory.
pub fn validate_source(raw: &str) -> Result<SourcePath, PipelineError> {
    let path = PathBuf::from(raw);
    if ZIP_NAME_PATTERN.is_match(raw) {
        if path.is_file() {
            Ok(SourcePath::Archive(path))
        } else {
            Err(PipelineError::InputFileNotFound(path))
        }
    } else if path.is_dir() {
        Ok(SourcePath::Directory(path))
    } else {
        Err(PipelineError::InputDirNotFound(path))
    }
}

/// Validate the output path: must match the csv name pattern and must not
/// already exist.
pub fn validate_output(raw: &str) -> Result<PathBuf, PipelineError> {
    if !CSV_NAME_PATTERN.is_match(raw) {
        return Err(PipelineError::InvalidOutputPath(raw.to_string()));
    }
    let path = PathBuf::from(raw);
    if path.exists() {
        return Err(PipelineError::OutputExists(path));
    }
    Ok(path)
}

/// Parse a timestamp that must match `YYYY-MM-DD HH-MM-SS` exactly.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, PipelineError> {
    if !TIMESTAMP_PATTERN.is_match(raw) {
        return Err(PipelineError::InvalidTimestamp(raw.to_string()));
    }
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_INPUT_FORMAT)
        .map_err(|_| PipelineError::InvalidTimestamp(raw.to_string()))
}

/// Validate a notification address against the organizational domain.
pub fn validate_mail_addr(raw: &str) -> Result<String, PipelineError> {
    if MAIL_PATTERN.is_match(raw) {
        Ok(raw.to_string())
    } else {
        Err(PipelineError::InvalidMailAddress(raw.to_string()))
    }
}

/// Build the immutable run configuration from parsed arguments.
///
/// Explicitly provided values are validated in both modes. Absent values
/// are resolved through `resolver` outside quiet mode; under quiet they
/// stay unset and downstream stages treat them as "not requested". The
/// output falls back to [`default_output_name`] when left unset or blank.
pub fn build_pipeline_config(
    args: &Args,
    resolver: &dyn FieldResolver,
) -> Result<PipelineConfig> {
    let raw_source = match &args.input {
        Some(value) => value.clone(),
        None if args.quiet => String::new(),
        None => resolver
            .resolve("input path (zip archive or evidence directory)", true)?
            .unwrap_or_default(),
    };
    let source = validate_source(&raw_source)?;

    let raw_output = match &args.output {
        Some(value) => Some(value.clone()),
        None if args.quiet => None,
        None => resolver.resolve("output csv path", false)?,
    };
    let output = validate_output(&raw_output.unwrap_or_else(default_output_name))?;

    let start_time = resolve_timestamp(args.start_time.as_deref(), "start", args, resolver)?;
    let end_time = resolve_timestamp(args.end_time.as_deref(), "end", args, resolver)?;

    let passphrase = match &args.password {
        Some(value) => Some(value.clone()),
        None if args.quiet => None,
        None => resolver.resolve("archive passphrase", false)?,
    };

    let raw_mail = match &args.mail_addr {
        Some(value) => Some(value.clone()),
        None if args.quiet => None,
        None => resolver.resolve("notification mail address", false)?,
    };
    let mail_addr = raw_mail.map(|m| validate_mail_addr(&m)).transpose()?;

    Ok(PipelineConfig {
        source,
        output,
        start_time,
        end_time,
        passphrase,
        mail_addr,
        quiet: args.quiet,
    })
}

fn resolve_timestamp(
    provided: Option<&str>,
    label: &str,
    args: &Args,
    resolver: &dyn FieldResolver,
) -> Result<Option<NaiveDateTime>> {
    let raw = match provided {
        Some(value) => Some(value.to_string()),
        None if args.quiet => None,
        None => resolver.resolve(&format!("{} timestamp (YYYY-MM-DD HH-MM-SS)", label), false)?,
    };
    Ok(raw.map(|r| parse_timestamp(&r)).transpose()?)
}
