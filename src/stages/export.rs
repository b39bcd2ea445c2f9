//! Export stage: time-filtered export of the intermediate store.
//!
//! Builds the export tool invocation with the destination file, the
//! store directory and, when bounds were requested, a time-range filter
//! expression.

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDateTime;

use crate::constants::{EXPORT_FORMAT, EXPORT_TOOL, TIMESTAMP_FILTER_FORMAT};
use crate::errors::StageKind;
use crate::stages::{StageCommand, StageReport, StageRunner};

/// Optional time window for the export. Both bounds are independently
/// present or absent; lower <= upper is deliberately not enforced here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFilter {
    lower: Option<NaiveDateTime>,
    upper: Option<NaiveDateTime>,
}

impl TimeFilter {
    /// Build a filter from the validated bounds; `None` when neither
    /// bound was requested.
    pub fn from_bounds(
        lower: Option<NaiveDateTime>,
        upper: Option<NaiveDateTime>,
    ) -> Option<TimeFilter> {
        if lower.is_none() && upper.is_none() {
            None
        } else {
            Some(TimeFilter { lower, upper })
        }
    }

    /// Render the filter predicate for the export tool: a `>=` comparison
    /// for the lower bound, a `<=` comparison for the upper bound, and
    /// their conjunction (lower first) when both are present.
    pub fn to_expression(&self) -> String {
        let mut predicates = Vec::new();
        if let Some(lower) = self.lower {
            predicates.push(format!(
                "date >= '{}'",
                lower.format(TIMESTAMP_FILTER_FORMAT)
            ));
        }
        if let Some(upper) = self.upper {
            predicates.push(format!(
                "date <= '{}'",
                upper.format(TIMESTAMP_FILTER_FORMAT)
            ));
        }
        predicates.join(" AND ")
    }
}

/// Runs the export tool against the intermediate store.
#[derive(Debug, Clone)]
pub struct ExportStage {
    pub tool: String,
    pub runner: StageRunner,
}

impl Default for ExportStage {
    fn default() -> Self {
        ExportStage {
            tool: EXPORT_TOOL.to_string(),
            runner: StageRunner::default(),
        }
    }
}

impl ExportStage {
    /// Export `store_dir` to `output`, constrained by `filter` when one
    /// was requested.
    pub fn run(
        &self,
        store_dir: &Path,
        output: &Path,
        filter: Option<&TimeFilter>,
    ) -> Result<StageReport> {
        let mut args = vec![
            "-o".to_string(),
            EXPORT_FORMAT.to_string(),
            "-w".to_string(),
            output.to_string_lossy().to_string(),
            store_dir.to_string_lossy().to_string(),
        ];
        if let Some(filter) = filter {
            args.push(filter.to_expression());
        }

        self.runner.run(
            StageKind::Export,
            StageCommand {
                program: self.tool.clone(),
                args,
            },
        )
    }
}
