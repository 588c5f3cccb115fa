//! Single-pass dataset profiling.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use super::accumulator::FieldAccumulator;
use super::distribution::{summarize, value_frequencies};
use super::job::{ProfilingJob, ProfilingJobResult, ProfilingJobStatus};
use super::snapshot::{ProfilingFieldStats, ProfilingSnapshot};
use crate::types::DataSet;

/// Knobs for [`ProfilingEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilingOptions {
    /// Maximum number of sample values retained per field.
    pub sample_size: usize,
    /// Length of each field's `frequent_values` list.
    pub top_frequencies: usize,
    /// Upper bound on numeric histogram buckets. Zero is treated as one.
    pub histogram_buckets: usize,
}

impl Default for ProfilingOptions {
    fn default() -> Self {
        Self {
            sample_size: 5,
            top_frequencies: 5,
            histogram_buckets: 5,
        }
    }
}

impl ProfilingOptions {
    /// Parse options from JSON; missing keys take their defaults.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

/// Produces profiling snapshots that feed validation contexts.
#[derive(Debug, Clone, Default)]
pub struct ProfilingEngine {
    options: ProfilingOptions,
}

impl ProfilingEngine {
    pub fn new(options: ProfilingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProfilingOptions {
        &self.options
    }

    /// Profile `dataset` in one pass over its rows.
    ///
    /// Only fields present in a row are observed for that row. Degenerate input (no rows,
    /// all-null fields) is reported through `warnings`; the status is always `Succeeded`.
    pub fn profile(&self, job: &ProfilingJob, dataset: &DataSet) -> ProfilingJobResult {
        let span = info_span!("profiling_run", job_id = %job.job_id, dataset_type = %job.dataset_type);
        let _enter = span.enter();

        let mut aggregates: BTreeMap<String, FieldAccumulator> = BTreeMap::new();
        for row in &dataset.rows {
            for (field_name, value) in row {
                aggregates
                    .entry(field_name.clone())
                    .or_default()
                    .observe(value, self.options.sample_size);
            }
        }

        let field_stats = aggregates
            .into_iter()
            .map(|(name, acc)| {
                let stats = self.build_field_stats(&name, &acc);
                (name, stats)
            })
            .collect();

        let snapshot = ProfilingSnapshot {
            snapshot_id: format!("profile-{}", job.job_id),
            tenant_id: job.tenant_id.clone(),
            dataset_type: job.dataset_type.clone(),
            record_count: dataset.row_count(),
            generated_from: job.generated_from(),
            field_stats,
            overrides_applied: BTreeMap::new(),
        };

        let warnings = build_warnings(&snapshot);
        for message in &warnings {
            warn!(job_id = %job.job_id, %message, "profiling warning");
        }
        info!(
            job_id = %job.job_id,
            records = snapshot.record_count,
            fields = snapshot.field_stats.len(),
            generated_from = %snapshot.generated_from,
            "profiling finished"
        );

        ProfilingJobResult {
            job_id: job.job_id.clone(),
            status: ProfilingJobStatus::Succeeded,
            profiling_context_id: snapshot.snapshot_id.clone(),
            profiled_at: Utc::now(),
            snapshot,
            warnings,
        }
    }

    fn build_field_stats(&self, field_name: &str, acc: &FieldAccumulator) -> ProfilingFieldStats {
        let total = acc.total();
        let (mean, stddev) = acc.mean_and_stddev().unzip();

        ProfilingFieldStats {
            field_name: field_name.to_string(),
            non_null: acc.non_null,
            nulls: acc.nulls,
            distinct: acc.value_counts.len(),
            sample_values: acc.sample_values.clone(),
            min_value: acc.numeric_min,
            max_value: acc.numeric_max,
            mean,
            stddev,
            frequent_values: value_frequencies(
                &acc.value_counts,
                total,
                Some(self.options.top_frequencies),
            ),
            distribution: summarize(acc, self.options.histogram_buckets),
            thresholds: BTreeMap::new(),
        }
    }
}

fn build_warnings(snapshot: &ProfilingSnapshot) -> Vec<String> {
    let mut warnings = Vec::new();
    if snapshot.record_count == 0 {
        warnings.push("Dataset contained zero rows; downstream validation will skip.".to_string());
    }
    for (name, stats) in &snapshot.field_stats {
        if stats.nulls > 0 && stats.non_null == 0 {
            warnings.push(format!("Field '{name}' is entirely null values."));
        }
    }
    warnings
}
