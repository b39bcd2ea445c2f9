//! Machine-readable run summary, written next to the exported timeline.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::PipelineReport;
use crate::stages::StageReport;

/// One stage invocation as recorded in the summary.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StageSummary {
    pub stage: String,
    pub command_line: String,
    pub pid: u32,
    pub started_at: String,
    pub finished_at: String,
    pub exit_code: Option<i32>,
}

impl From<&StageReport> for StageSummary {
    fn from(report: &StageReport) -> Self {
        StageSummary {
            stage: report.stage.to_string(),
            command_line: report.command_line.clone(),
            pid: report.pid,
            started_at: report.started_at.to_rfc3339(),
            finished_at: report.finished_at.to_rfc3339(),
            exit_code: report.exit_code,
        }
    }
}

/// Summary of one completed pipeline run.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunSummary {
    pub run_id: String,
    pub hostname: String,
    pub started_at: String,
    pub finished_at: String,
    pub output: String,
    pub stages: Vec<StageSummary>,
}

/// Build the summary record for a successful run.
pub fn build_run_summary(
    run_id: &Uuid,
    started_at: DateTime<Local>,
    output: &Path,
    report: &PipelineReport,
) -> RunSummary {
    let hostname = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    RunSummary {
        run_id: run_id.to_string(),
        hostname,
        started_at: started_at.to_rfc3339(),
        finished_at: Local::now().to_rfc3339(),
        output: output.to_string_lossy().to_string(),
        stages: vec![
            StageSummary::from(&report.extraction),
            StageSummary::from(&report.export),
        ],
    }
}

/// Location of the summary file belonging to an output timeline.
pub fn summary_path_for(output: &Path) -> PathBuf {
    output.with_extension("summary.json")
}

/// Serialize the summary as pretty JSON next to the output file.
pub fn write_run_summary(summary: &RunSummary, output: &Path) -> Result<PathBuf> {
    let path = summary_path_for(output);
    let json = serde_json::to_string_pretty(summary).context("failed to serialize run summary")?;
    fs::write(&path, json)
        .with_context(|| format!("failed to write run summary to {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StageKind;
    use tempfile::TempDir;

    fn report() -> PipelineReport {
        let extraction = StageReport {
            stage: StageKind::Extraction,
            command_line: "log2timeline.py --parsers win7 /evidence /store".to_string(),
            pid: 4242,
            started_at: Local::now(),
            finished_at: Local::now(),
            exit_code: Some(0),
        };
        let export = StageReport {
            stage: StageKind::Export,
            command_line: "psort.py -o l2tcsv -w out.csv /store".to_string(),
            pid: 4243,
            started_at: Local::now(),
            finished_at: Local::now(),
            exit_code: Some(0),
        };
        PipelineReport { extraction, export }
    }

    #[test]
    fn test_summary_path_replaces_extension() {
        assert_eq!(
            summary_path_for(Path::new("/tmp/Supertimeline_2024-01-01.csv")),
            PathBuf::from("/tmp/Supertimeline_2024-01-01.summary.json")
        );
    }

    #[test]
    fn test_write_run_summary_round_trip() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("timeline.csv");

        let run_id = Uuid::new_v4();
        let summary = build_run_summary(&run_id, Local::now(), &output, &report());
        let path = write_run_summary(&summary, &output).unwrap();

        let parsed: RunSummary =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.run_id, run_id.to_string());
        assert_eq!(parsed.stages.len(), 2);
        assert_eq!(parsed.stages[0].stage, "extraction");
        assert_eq!(parsed.stages[1].stage, "export");
        assert_eq!(parsed.stages[0].pid, 4242);
    }
}
