//! Cleansing job request and result types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::transform::{RejectedRow, StepMetrics};
use crate::types::DataSet;

/// Lifecycle states for cleansing jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleansingJobStatus {
    #[default]
    Planned,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl CleansingJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for CleansingJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request to cleanse one dataset with one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleansingJob {
    pub job_id: String,
    pub tenant_id: String,
    pub dataset_type: String,
    pub rule_id: String,
    /// Exact rule version; `None` resolves to the registry's latest.
    #[serde(default)]
    pub rule_version: Option<String>,
    /// Upload job that produced the raw dataset.
    #[serde(default)]
    pub source_job_id: Option<String>,
    /// Whether the caller intends to validate the cleansed output next.
    #[serde(default)]
    pub chain_validation: bool,
    #[serde(default)]
    pub status: CleansingJobStatus,
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

impl CleansingJob {
    pub fn new(
        job_id: impl Into<String>,
        tenant_id: impl Into<String>,
        dataset_type: impl Into<String>,
        rule_id: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            tenant_id: tenant_id.into(),
            dataset_type: dataset_type.into(),
            rule_id: rule_id.into(),
            rule_version: None,
            source_job_id: None,
            chain_validation: false,
            status: CleansingJobStatus::Planned,
            options: BTreeMap::new(),
        }
    }

    pub fn with_rule_version(mut self, version: impl Into<String>) -> Self {
        self.rule_version = Some(version.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeforeCounts {
    pub rows: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AfterCounts {
    pub rows: usize,
    pub rejected: usize,
}

/// What one step did, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub index: usize,
    pub kind: String,
    pub rows_in: usize,
    pub rows_out: usize,
    pub rejected: usize,
    pub metrics: StepMetrics,
}

/// Summary of a completed cleansing job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleansingJobResult {
    pub job_id: String,
    pub status: CleansingJobStatus,
    pub before_counts: BeforeCounts,
    pub after_counts: AfterCounts,
    /// First rejected row across all steps, if any.
    pub rejected_sample: Option<RejectedRow>,
    /// Key of the stored cleansed rows, set by [`super::CleansingJobManager::submit_job`].
    #[serde(default)]
    pub output_dataset: Option<String>,
    #[serde(default)]
    pub linked_validation_job_id: Option<String>,
    /// Metrics keyed by step kind. A repeated kind overwrites the earlier entry;
    /// `step_metrics` keeps every step.
    pub metrics: BTreeMap<String, StepMetrics>,
    pub step_metrics: Vec<StepReport>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Everything a successful [`super::CleansingEngine::run`] produces.
#[derive(Debug, Clone, PartialEq)]
pub struct CleansingRun {
    pub result: CleansingJobResult,
    /// Cleansed rows: the input minus rejected rows, with all steps applied.
    pub dataset: DataSet,
    /// Pre-execution rule warnings.
    pub warnings: Vec<String>,
}
