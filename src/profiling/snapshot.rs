//! Profiling snapshot types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::job::FieldOverride;
use crate::types::Value;

/// Per-field threshold map handed to rule evaluation.
pub type Thresholds = BTreeMap<String, serde_json::Value>;

/// A value and how often it was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueFrequency {
    pub value: Value,
    pub count: usize,
    /// Share of the field's rows (nulls included), 0-100, rounded to 4 decimals.
    pub percentage: f64,
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionBucket {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistributionKind {
    Numeric,
    Categorical,
}

/// Either a numeric histogram (`buckets`) or a categorical frequency list (`values`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub kind: DistributionKind,
    #[serde(default)]
    pub buckets: Vec<DistributionBucket>,
    #[serde(default)]
    pub values: Vec<ValueFrequency>,
}

impl DistributionSummary {
    pub fn numeric(buckets: Vec<DistributionBucket>) -> Self {
        Self {
            kind: DistributionKind::Numeric,
            buckets,
            values: Vec::new(),
        }
    }

    pub fn categorical(values: Vec<ValueFrequency>) -> Self {
        Self {
            kind: DistributionKind::Categorical,
            buckets: Vec::new(),
            values,
        }
    }
}

/// Statistics for one field.
///
/// `min_value`, `max_value`, `mean` and `stddev` are set only when at least one numeric,
/// non-boolean value was observed. `distinct` counts non-null values only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfilingFieldStats {
    pub field_name: String,
    pub non_null: usize,
    pub nulls: usize,
    pub distinct: usize,
    pub sample_values: Vec<Value>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub mean: Option<f64>,
    pub stddev: Option<f64>,
    pub frequent_values: Vec<ValueFrequency>,
    pub distribution: Option<DistributionSummary>,
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl ProfilingFieldStats {
    /// Empty stats for a field that was never observed.
    pub fn empty(field_name: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            ..Self::default()
        }
    }
}

/// Whether a snapshot was computed over raw or cleansed rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratedFrom {
    #[default]
    Raw,
    Cleansed,
}

impl GeneratedFrom {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratedFrom::Raw => "raw",
            GeneratedFrom::Cleansed => "cleansed",
        }
    }
}

impl fmt::Display for GeneratedFrom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Statistical summary of one profiling pass.
///
/// Snapshots are not modified after creation; [`ProfilingSnapshot::merge_overrides`] returns
/// a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilingSnapshot {
    pub snapshot_id: String,
    pub tenant_id: String,
    pub dataset_type: String,
    pub record_count: usize,
    #[serde(default)]
    pub generated_from: GeneratedFrom,
    #[serde(default)]
    pub field_stats: BTreeMap<String, ProfilingFieldStats>,
    #[serde(default)]
    pub overrides_applied: BTreeMap<String, FieldOverride>,
}

impl ProfilingSnapshot {
    /// Copy of this snapshot with `overrides` folded in.
    ///
    /// Every overridden field is recorded in `overrides_applied`. Its thresholds are merged
    /// into the field's existing thresholds, override winning on key collision; a field the
    /// snapshot never saw gets an empty stats entry first.
    pub fn merge_overrides(&self, overrides: Option<&BTreeMap<String, FieldOverride>>) -> Self {
        let mut merged = self.clone();
        let Some(overrides) = overrides.filter(|o| !o.is_empty()) else {
            return merged;
        };

        for (field_name, field_override) in overrides {
            merged
                .overrides_applied
                .insert(field_name.clone(), field_override.clone());
            let stats = merged
                .field_stats
                .entry(field_name.clone())
                .or_insert_with(|| ProfilingFieldStats::empty(field_name.clone()));
            stats.thresholds.extend(
                field_override
                    .thresholds
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone())),
            );
        }
        merged
    }

    pub fn iter_fields(&self) -> impl Iterator<Item = &ProfilingFieldStats> {
        self.field_stats.values()
    }
}
