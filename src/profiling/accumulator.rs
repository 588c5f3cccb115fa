//! Single-pass per-field accumulation.

use std::collections::HashMap;

use crate::types::Value;

/// Occurrence counts that remember first-seen order.
///
/// Ranking is a stable sort by descending count, so equal counts keep the order in which
/// values were first observed.
#[derive(Debug, Clone, Default)]
pub struct ValueCounter {
    index: HashMap<Value, usize>,
    entries: Vec<(Value, usize)>,
}

impl ValueCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: &Value) {
        match self.index.get(value) {
            Some(&slot) => self.entries[slot].1 += 1,
            None => {
                self.index.insert(value.clone(), self.entries.len());
                self.entries.push((value.clone(), 1));
            }
        }
    }

    pub fn get(&self, value: &Value) -> usize {
        self.index.get(value).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Values by descending count, at most `limit` of them (`None` for all).
    pub fn most_common(&self, limit: Option<usize>) -> Vec<(&Value, usize)> {
        let mut ranked: Vec<(&Value, usize)> =
            self.entries.iter().map(|(v, c)| (v, *c)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        ranked
    }
}

/// Running statistics for one field.
#[derive(Debug, Clone, Default)]
pub struct FieldAccumulator {
    pub non_null: usize,
    pub nulls: usize,
    pub sample_values: Vec<Value>,
    pub value_counts: ValueCounter,
    /// Kept for histogram bucketing.
    pub numeric_values: Vec<f64>,
    pub numeric_sum: f64,
    pub numeric_sum_sq: f64,
    pub numeric_min: Option<f64>,
    pub numeric_max: Option<f64>,
}

impl FieldAccumulator {
    /// Fold one observed value in. `sample_size` caps the retained samples.
    pub fn observe(&mut self, value: &Value, sample_size: usize) {
        if value.is_missing() {
            self.nulls += 1;
            return;
        }

        self.non_null += 1;
        self.value_counts.add(value);
        if self.sample_values.len() < sample_size {
            self.sample_values.push(value.clone());
        }

        if let Some(n) = value.as_f64() {
            self.numeric_values.push(n);
            self.numeric_sum += n;
            self.numeric_sum_sq += n * n;
            self.numeric_min = Some(self.numeric_min.map_or(n, |m| m.min(n)));
            self.numeric_max = Some(self.numeric_max.map_or(n, |m| m.max(n)));
        }
    }

    /// Rows in which the field was present, null or not.
    pub fn total(&self) -> usize {
        self.non_null + self.nulls
    }

    /// `(mean, stddev)` over `non_null`, or `None` when no numeric value was seen.
    ///
    /// The divisor is `non_null`, which also counts non-numeric values of a mixed field.
    /// Variance is floored at zero.
    pub fn mean_and_stddev(&self) -> Option<(f64, f64)> {
        if self.numeric_values.is_empty() || self.non_null == 0 {
            return None;
        }
        let n = self.non_null as f64;
        let mean = self.numeric_sum / n;
        let variance = self.numeric_sum_sq / n - mean * mean;
        Some((mean, variance.max(0.0).sqrt()))
    }
}
