//! Projection of a profiling snapshot into the field → thresholds view consumed by rule
//! evaluation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::job::ProfilingJob;
use super::snapshot::{GeneratedFrom, ProfilingSnapshot, Thresholds};

/// Provenance of a [`ProfilingContext`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMetadata {
    pub generated_from: GeneratedFrom,
    /// Names of overridden fields, sorted.
    #[serde(default)]
    pub overrides_applied: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_dataset_uri: Option<String>,
}

/// Flat per-field threshold map for one profiled dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilingContext {
    pub context_id: String,
    pub tenant_id: String,
    pub dataset_type: String,
    pub record_count: usize,
    pub field_thresholds: BTreeMap<String, Thresholds>,
    pub metadata: ContextMetadata,
}

impl ProfilingContext {
    pub fn thresholds_for(&self, field: &str) -> Option<&Thresholds> {
        self.field_thresholds.get(field)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProfilingContextBuilder;

impl ProfilingContextBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Merge the job's overrides (if any) into `snapshot` and project the result.
    ///
    /// `snapshot` itself is left untouched. `job_id` and `source_dataset_uri` are recorded
    /// only when a job is supplied.
    pub fn build(&self, snapshot: &ProfilingSnapshot, job: Option<&ProfilingJob>) -> ProfilingContext {
        let effective = snapshot.merge_overrides(job.map(|j| &j.overrides));

        let field_thresholds = effective
            .field_stats
            .iter()
            .map(|(name, stats)| (name.clone(), stats.thresholds.clone()))
            .collect();

        let metadata = ContextMetadata {
            generated_from: effective.generated_from,
            overrides_applied: effective.overrides_applied.keys().cloned().collect(),
            job_id: job.map(|j| j.job_id.clone()),
            source_dataset_uri: job.and_then(|j| j.source_dataset_uri.clone()),
        };

        debug!(
            context_id = %effective.snapshot_id,
            fields = effective.field_stats.len(),
            overrides = metadata.overrides_applied.len(),
            "built profiling context"
        );

        ProfilingContext {
            context_id: effective.snapshot_id,
            tenant_id: effective.tenant_id,
            dataset_type: effective.dataset_type,
            record_count: effective.record_count,
            field_thresholds,
            metadata,
        }
    }
}
