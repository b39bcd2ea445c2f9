//! Fatal failure taxonomy with one process exit code per failure class.
//!
//! Validation is fail-fast, first-error-wins: the first failed check
//! terminates the run with its dedicated code instead of collecting errors.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::constants::MAIL_DOMAIN;

/// The two external pipeline stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Artifact extraction into the intermediate store
    Extraction,
    /// Time-filtered export of the intermediate store
    Export,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Extraction => write!(f, "extraction"),
            StageKind::Export => write!(f, "export"),
        }
    }
}

/// Fatal pipeline failures. Each variant maps to a distinct exit code so
/// callers of the binary can tell the failure classes apart.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Source looked like a zip archive but no regular file exists there
    #[error("input file not found: {0}")]
    InputFileNotFound(PathBuf),

    /// Source was taken as a directory but none exists there
    #[error("input directory not found: {0}")]
    InputDirNotFound(PathBuf),

    /// Output path does not match the expected csv name pattern
    #[error("invalid output path '{0}': expected a .csv file name")]
    InvalidOutputPath(String),

    /// Output path already references an existing file
    #[error("output file already exists: {0}")]
    OutputExists(PathBuf),

    /// Timestamp string does not match `YYYY-MM-DD HH-MM-SS`
    #[error("malformed timestamp '{0}': expected format YYYY-MM-DD HH-MM-SS")]
    InvalidTimestamp(String),

    /// Notification address is not inside the organizational domain
    #[error("malformed mail address '{0}': expected <local-part>@{MAIL_DOMAIN}")]
    InvalidMailAddress(String),

    /// Any failure while decompressing the evidence bundle. Sub-causes
    /// (corrupt archive, wrong passphrase, I/O) are collapsed; the detail
    /// goes to the log.
    #[error("archive extraction failed: {0}")]
    ArchiveExtraction(String),

    /// An external stage tool exited with a non-zero status.
    #[error("{stage} stage failed with {status}: {stderr}")]
    StageFailed {
        stage: StageKind,
        status: ExitStatus,
        /// Captured error stream of the tool, already scrubbed for logging
        stderr: String,
    },
}

impl PipelineError {
    /// Dedicated process exit code for this failure class.
    ///
    /// Codes 1 and 2 match the original tooling this pipeline replaces;
    /// the remaining classes continue the sequence.
    pub fn exit_code(&self) -> i32 {
        match self {
            PipelineError::InputFileNotFound(_) => 1,
            PipelineError::InputDirNotFound(_) => 2,
            PipelineError::InvalidOutputPath(_) => 3,
            PipelineError::OutputExists(_) => 4,
            PipelineError::InvalidTimestamp(_) => 5,
            PipelineError::InvalidMailAddress(_) => 6,
            PipelineError::ArchiveExtraction(_) => 7,
            PipelineError::StageFailed { stage: StageKind::Extraction, .. } => 8,
            PipelineError::StageFailed { stage: StageKind::Export, .. } => 9,
        }
    }
}
