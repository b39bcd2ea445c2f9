//! Sequential pipeline driver.
//!
//! Drives one run through its states: prepare the evidence (archive
//! decompression or directory passthrough), run the extraction stage,
//! run the export stage. Strictly sequential, no branching except into
//! failure; each stage's workspace is released as the transition out of
//! that stage, on success and on failure alike.

use anyhow::Result;
use log::warn;

use crate::archive::prepare_evidence;
use crate::config::PipelineConfig;
use crate::stages::export::{ExportStage, TimeFilter};
use crate::stages::extraction::ExtractionStage;
use crate::stages::StageReport;

/// Stage reports of one completed run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub extraction: StageReport,
    pub export: StageReport,
}

/// Composes the two stage runners over the shared workspace hand-off.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub extraction: ExtractionStage,
    pub export: ExportStage,
}

impl Pipeline {
    /// Execute one run to completion.
    ///
    /// The evidence workspace is released once the extraction stage has
    /// consumed it; the store workspace once the export stage completes.
    /// Failed runs release the same workspaces before the error
    /// propagates.
    pub fn execute(&self, config: &PipelineConfig) -> Result<PipelineReport> {
        let evidence = prepare_evidence(&config.source, config.passphrase.as_deref())?;

        let extraction_result = self.extraction.run(evidence.path());
        if let Err(err) = evidence.release() {
            warn!("Failed to release evidence workspace: {:#}", err);
        }
        let (store, extraction) = extraction_result?;

        let filter = TimeFilter::from_bounds(config.start_time, config.end_time);
        let export_result = self.export.run(store.path(), &config.output, filter.as_ref());
        if let Err(err) = store.release() {
            warn!("Failed to release store workspace: {:#}", err);
        }
        let export = export_result?;

        Ok(PipelineReport { extraction, export })
    }
}
