//! Turns accumulated values into frequency lists and equal-width histograms.

use super::accumulator::{FieldAccumulator, ValueCounter};
use super::snapshot::{DistributionBucket, DistributionSummary, ValueFrequency};

/// `100 * count / total` rounded to 4 decimals; `0.0` when `total` is zero.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_to(count as f64 / total as f64 * 100.0, 4)
}

// Ties go to the even neighbour: 0.78125 at 4 decimals is 0.7812.
fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

/// Top `limit` values by count (all values when `None`), annotated with percentages of `total`.
pub fn value_frequencies(
    counts: &ValueCounter,
    total: usize,
    limit: Option<usize>,
) -> Vec<ValueFrequency> {
    counts
        .most_common(limit)
        .into_iter()
        .map(|(value, count)| ValueFrequency {
            value: value.clone(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Equal-width histogram over `values`.
///
/// Uses `min(buckets, values.len())` buckets (at least one). The maximum value always lands
/// in the last bucket. Empty buckets are dropped; bucket bounds are rounded to 6 decimals.
/// When every value is equal a single `[min, min]` bucket is returned.
pub fn numeric_buckets(values: &[f64], buckets: usize, total: usize) -> Vec<DistributionBucket> {
    let Some((min, max)) = min_max(values) else {
        return Vec::new();
    };
    if min == max {
        return vec![DistributionBucket {
            start: min,
            end: max,
            count: values.len(),
            percentage: percentage(values.len(), total),
        }];
    }

    let bucket_count = buckets.min(values.len()).max(1);
    let width = (max - min) / bucket_count as f64;

    let mut counts = vec![0usize; bucket_count];
    for &value in values {
        let index = if value == max {
            bucket_count - 1
        } else {
            (((value - min) / width) as usize).min(bucket_count - 1)
        };
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .filter(|&(_, count)| count > 0)
        .map(|(index, count)| {
            let start = min + index as f64 * width;
            let end = if index == bucket_count - 1 {
                max
            } else {
                min + (index + 1) as f64 * width
            };
            DistributionBucket {
                start: round_to(start, 6),
                end: round_to(end, 6),
                count,
                percentage: percentage(count, total),
            }
        })
        .collect()
}

fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let (&first, rest) = values.split_first()?;
    Some(
        rest.iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Numeric histogram when the field saw numbers, else the full categorical frequency list,
/// else `None`.
pub fn summarize(acc: &FieldAccumulator, histogram_buckets: usize) -> Option<DistributionSummary> {
    let total = acc.total();
    if !acc.numeric_values.is_empty() {
        return Some(DistributionSummary::numeric(numeric_buckets(
            &acc.numeric_values,
            histogram_buckets,
            total,
        )));
    }
    if !acc.value_counts.is_empty() {
        return Some(DistributionSummary::categorical(value_frequencies(
            &acc.value_counts,
            total,
            None,
        )));
    }
    None
}
