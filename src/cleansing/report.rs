//! Flat, human-readable summary of a cleansing job.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::job::{CleansingJobResult, CleansingJobStatus};
use super::transform::StepMetrics;
use crate::error::ReportError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleansingReport {
    pub job_id: String,
    pub status: CleansingJobStatus,
    pub before_rows: usize,
    pub after_rows: usize,
    pub rejected_rows: usize,
    pub metrics: BTreeMap<String, StepMetrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl CleansingReport {
    pub fn from_result(result: &CleansingJobResult) -> Self {
        Self {
            job_id: result.job_id.clone(),
            status: result.status,
            before_rows: result.before_counts.rows,
            after_rows: result.after_counts.rows,
            rejected_rows: result.after_counts.rejected,
            metrics: result.metrics.clone(),
            warnings: result.warnings.clone(),
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, ReportError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
