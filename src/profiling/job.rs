//! Profiling job request and result types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::{GeneratedFrom, ProfilingSnapshot, Thresholds};

/// Lifecycle states for profiling jobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfilingJobStatus {
    #[default]
    Planned,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ProfilingJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProfilingJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied override for one field.
///
/// Only `thresholds` is interpreted; any other keys are kept verbatim so they show up in
/// `overrides_applied`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOverride {
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl FieldOverride {
    pub fn with_thresholds(thresholds: Thresholds) -> Self {
        Self {
            thresholds,
            extra: BTreeMap::new(),
        }
    }
}

/// Request to profile a dataset before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilingJob {
    pub job_id: String,
    pub tenant_id: String,
    pub dataset_type: String,
    /// Pointer to the raw or cleansed dataset being profiled.
    #[serde(default)]
    pub source_dataset_uri: Option<String>,
    #[serde(default = "Utc::now")]
    pub requested_at: DateTime<Utc>,
    /// Per-field overrides, e.g. tighter thresholds.
    #[serde(default)]
    pub overrides: BTreeMap<String, FieldOverride>,
    #[serde(default)]
    pub priority: u32,
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl ProfilingJob {
    pub fn new(
        job_id: impl Into<String>,
        tenant_id: impl Into<String>,
        dataset_type: impl Into<String>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            tenant_id: tenant_id.into(),
            dataset_type: dataset_type.into(),
            source_dataset_uri: None,
            requested_at: Utc::now(),
            overrides: BTreeMap::new(),
            priority: 0,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_source_dataset_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_dataset_uri = Some(uri.into());
        self
    }

    pub fn with_override(mut self, field: impl Into<String>, field_override: FieldOverride) -> Self {
        self.overrides.insert(field.into(), field_override);
        self
    }

    /// Mark the profiled rows as cleansing output (`metadata.input = "cleansed"`).
    pub fn cleansed_input(mut self) -> Self {
        self.metadata
            .insert("input".to_string(), serde_json::Value::from("cleansed"));
        self
    }

    /// `Cleansed` iff `metadata["input"]` is the string `"cleansed"`.
    pub fn generated_from(&self) -> GeneratedFrom {
        match self.metadata.get("input").and_then(serde_json::Value::as_str) {
            Some("cleansed") => GeneratedFrom::Cleansed,
            _ => GeneratedFrom::Raw,
        }
    }
}

/// Result of a profiling run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilingJobResult {
    pub job_id: String,
    pub status: ProfilingJobStatus,
    pub profiling_context_id: String,
    pub profiled_at: DateTime<Utc>,
    pub snapshot: ProfilingSnapshot,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generated_from_follows_input_metadata() {
        let job = ProfilingJob::new("p1", "t1", "billing");
        assert_eq!(job.generated_from(), GeneratedFrom::Raw);
        assert_eq!(job.cleansed_input().generated_from(), GeneratedFrom::Cleansed);

        let mut job = ProfilingJob::new("p1", "t1", "billing");
        job.metadata.insert("input".to_string(), json!("CLEANSED"));
        assert_eq!(job.generated_from(), GeneratedFrom::Raw);
    }

    #[test]
    fn job_deserializes_with_defaults_and_extra_override_keys() {
        let job: ProfilingJob = serde_json::from_value(json!({
            "job_id": "p1",
            "tenant_id": "t1",
            "dataset_type": "billing",
            "overrides": {
                "Amount": {"thresholds": {"max": 10}, "note": "tightened"}
            }
        }))
        .unwrap();

        assert_eq!(job.priority, 0);
        let amount = &job.overrides["Amount"];
        assert_eq!(amount.thresholds["max"], json!(10));
        assert_eq!(amount.extra["note"], json!("tightened"));
    }
}
