//! Extraction stage: first external tool pass over the evidence.
//!
//! Scans the evidence directory with the fixed parser profile and fills a
//! freshly acquired store workspace with the intermediate event store.

use std::path::Path;

use anyhow::Result;

use crate::constants::{EXTRACTION_TOOL, PARSER_PROFILE, STORE_WORKSPACE_PREFIX};
use crate::errors::StageKind;
use crate::stages::{StageCommand, StageReport, StageRunner};
use crate::workspace::Workspace;

/// Runs the artifact-extraction tool against a prepared evidence
/// directory.
#[derive(Debug, Clone)]
pub struct ExtractionStage {
    pub tool: String,
    pub runner: StageRunner,
}

impl Default for ExtractionStage {
    fn default() -> Self {
        ExtractionStage {
            tool: EXTRACTION_TOOL.to_string(),
            runner: StageRunner::default(),
        }
    }
}

impl ExtractionStage {
    /// Extract artifacts from `evidence_dir` into a new store workspace.
    ///
    /// The workspace is only returned once the tool has been observed to
    /// exit successfully; on failure it is dropped (and thereby removed)
    /// with the error.
    pub fn run(&self, evidence_dir: &Path) -> Result<(Workspace, StageReport)> {
        let store = Workspace::acquire(STORE_WORKSPACE_PREFIX)?;

        let command = StageCommand {
            program: self.tool.clone(),
            args: vec![
                "--parsers".to_string(),
                PARSER_PROFILE.to_string(),
                evidence_dir.to_string_lossy().to_string(),
                store.path().to_string_lossy().to_string(),
            ],
        };

        let report = self.runner.run(StageKind::Extraction, command)?;
        Ok((store, report))
    }
}
