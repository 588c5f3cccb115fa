//! Step handlers.
//!
//! Each handler is a pure function from an input [`DataSet`] to a [`TransformationOutcome`]:
//! the output dataset, step-specific metrics and the rows the step rejected. Handlers never
//! mutate their input.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::rule::{
    CaseMapping, DeduplicateParams, FillMissingParams, Severity, StandardizeParams,
    TransformationKind, TransformationStep,
};
use crate::error::{CleansingError, CleansingResult};
use crate::types::{DataSet, Record, Value};

/// An input row excluded from the cleansed output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// The row exactly as the rejecting step received it.
    pub row: Record,
    pub reason: String,
}

/// Metrics reported by one step. Serializes to the flat per-kind shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepMetrics {
    Standardize {
        standardized_fields: Vec<String>,
    },
    FillMissing {
        filled_fields: Vec<String>,
        rejected: usize,
    },
    Deduplicate {
        keys: Vec<String>,
        deduplicated: usize,
        retained: usize,
    },
}

/// Result of applying one step.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformationOutcome {
    pub dataset: DataSet,
    pub metrics: StepMetrics,
    pub rejected: Vec<RejectedRow>,
}

/// Apply a single transformation step to a dataset.
pub fn apply_transformation(
    dataset: &DataSet,
    step: &TransformationStep,
) -> CleansingResult<TransformationOutcome> {
    let outcome = match &step.kind {
        TransformationKind::Standardize(params) => standardize(dataset, step, params),
        TransformationKind::FillMissing(params) => fill_missing(dataset, step, params),
        TransformationKind::Deduplicate(params) => deduplicate(dataset, step, params)?,
    };
    debug!(
        kind = step.kind_name(),
        rows_in = dataset.row_count(),
        rows_out = outcome.dataset.row_count(),
        rejected = outcome.rejected.len(),
        "applied transformation"
    );
    Ok(outcome)
}

fn standardize(
    dataset: &DataSet,
    step: &TransformationStep,
    params: &StandardizeParams,
) -> TransformationOutcome {
    let convert: Option<fn(&str) -> String> = match params.case_mapping() {
        CaseMapping::Upper => Some(str::to_uppercase),
        CaseMapping::Lower => Some(str::to_lowercase),
        CaseMapping::Preserve => None,
    };
    let out = dataset.map_rows(|row| {
        let mut new_row = row.clone();
        if let Some(convert) = convert {
            for field in &step.target_fields {
                // Null and non-string values are left untouched.
                if let Some(Value::Utf8(s)) = new_row.get_mut(field) {
                    *s = convert(s.as_str());
                }
            }
        }
        new_row
    });

    TransformationOutcome {
        dataset: out,
        metrics: StepMetrics::Standardize {
            standardized_fields: step.target_fields.clone(),
        },
        rejected: Vec::new(),
    }
}

fn fill_missing(
    dataset: &DataSet,
    step: &TransformationStep,
    params: &FillMissingParams,
) -> TransformationOutcome {
    let mut rows = Vec::with_capacity(dataset.row_count());
    let mut rejected = Vec::new();

    for row in &dataset.rows {
        let mut new_row = row.clone();
        let mut failed = false;
        for field in &step.target_fields {
            if !new_row.get(field).is_none_or(Value::is_missing) {
                continue;
            }
            match &params.default {
                Some(default) => {
                    new_row.insert(field.clone(), default.clone());
                }
                None => failed = true,
            }
        }

        // Soft failures pass through with the field left unfilled.
        if failed && step.severity == Severity::Hard {
            rejected.push(RejectedRow {
                row: row.clone(),
                reason: format!("{} failed for {:?}", step.kind_name(), step.target_fields),
            });
            continue;
        }
        rows.push(new_row);
    }

    TransformationOutcome {
        dataset: DataSet::new(rows),
        metrics: StepMetrics::FillMissing {
            filled_fields: step.target_fields.clone(),
            rejected: rejected.len(),
        },
        rejected,
    }
}

/// Keys for a deduplicate step: explicit `keys`, else the step's `target_fields`.
pub fn deduplicate_keys<'a>(
    step: &'a TransformationStep,
    params: &'a DeduplicateParams,
) -> Option<&'a [String]> {
    match params.keys.as_deref() {
        Some(keys) if !keys.is_empty() => Some(keys),
        _ if !step.target_fields.is_empty() => Some(step.target_fields.as_slice()),
        _ => None,
    }
}

// Duplicates are dropped whatever the step severity.
fn deduplicate(
    dataset: &DataSet,
    step: &TransformationStep,
    params: &DeduplicateParams,
) -> CleansingResult<TransformationOutcome> {
    let keys = deduplicate_keys(step, params).ok_or(CleansingError::MissingDeduplicateKeys)?;

    let mut seen: HashSet<Vec<Value>> = HashSet::new();
    let mut kept = Vec::new();
    let mut rejected = Vec::new();

    for row in &dataset.rows {
        let key: Vec<Value> = keys
            .iter()
            .map(|k| row.get(k).cloned().unwrap_or(Value::Null))
            .collect();
        if seen.insert(key) {
            kept.push(row.clone());
        } else {
            rejected.push(RejectedRow {
                row: row.clone(),
                reason: format!("duplicate on {keys:?}"),
            });
        }
    }

    let retained = kept.len();
    Ok(TransformationOutcome {
        dataset: DataSet::new(kept),
        metrics: StepMetrics::Deduplicate {
            keys: keys.to_vec(),
            deduplicated: dataset.row_count() - retained,
            retained,
        },
        rejected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cleansing::rule::TransformationStep;
    use crate::types::record;

    fn invoices() -> DataSet {
        DataSet::new(vec![
            record([
                ("Inv", Value::from("A")),
                ("Cur", Value::from("usd")),
                ("Amount", Value::Int64(10)),
            ]),
            record([
                ("Inv", Value::from("B")),
                ("Cur", Value::Null),
                ("Amount", Value::Float64(2.5)),
            ]),
            record([("Inv", Value::from("B")), ("Cur", Value::from("Eur"))]),
        ])
    }

    #[test]
    fn standardize_upper_touches_strings_only() {
        let step = TransformationStep::standardize(["Cur", "Amount"], "upper");
        let out = apply_transformation(&invoices(), &step).unwrap();

        assert_eq!(out.dataset.rows[0]["Cur"], Value::from("USD"));
        assert_eq!(out.dataset.rows[1]["Cur"], Value::Null);
        assert_eq!(out.dataset.rows[2]["Cur"], Value::from("EUR"));
        assert_eq!(out.dataset.rows[0]["Amount"], Value::Int64(10));
        assert!(out.rejected.is_empty());
        assert_eq!(
            out.metrics,
            StepMetrics::Standardize {
                standardized_fields: vec!["Cur".to_string(), "Amount".to_string()]
            }
        );
    }

    #[test]
    fn standardize_format_hint_is_case_insensitive() {
        let step = TransformationStep::standardize(["Cur"], "LOWER");
        let out = apply_transformation(&invoices(), &step).unwrap();
        assert_eq!(out.dataset.rows[2]["Cur"], Value::from("eur"));

        let step = TransformationStep::standardize(["Cur"], "ISO-4217");
        let out = apply_transformation(&invoices(), &step).unwrap();
        assert_eq!(out.dataset.rows[0]["Cur"], Value::from("USD"));
    }

    #[test]
    fn standardize_unknown_format_leaves_values() {
        let step = TransformationStep::standardize(["Cur"], "title");
        let ds = invoices();
        let out = apply_transformation(&ds, &step).unwrap();
        assert_eq!(out.dataset, ds);
    }

    #[test]
    fn fill_missing_treats_absent_null_and_empty_alike() {
        let ds = DataSet::new(vec![
            record([("c", Value::Null)]),
            record([("c", Value::from(""))]),
            record([("other", Value::Int64(1))]),
            record([("c", Value::from("x"))]),
        ]);
        let step = TransformationStep::fill_missing(["c"], Some(Value::from("UNKNOWN")))
            .with_severity(Severity::Hard);
        let out = apply_transformation(&ds, &step).unwrap();

        assert_eq!(out.dataset.row_count(), 4);
        for row in &out.dataset.rows[..3] {
            assert_eq!(row["c"], Value::from("UNKNOWN"));
        }
        assert_eq!(out.dataset.rows[3]["c"], Value::from("x"));
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn fill_missing_hard_without_default_rejects() {
        let ds = DataSet::new(vec![
            record([("c", Value::Null), ("id", Value::Int64(1))]),
            record([("c", Value::from("x")), ("id", Value::Int64(2))]),
        ]);
        let step = TransformationStep::fill_missing(["c"], None).with_severity(Severity::Hard);
        let out = apply_transformation(&ds, &step).unwrap();

        assert_eq!(out.dataset.row_count(), 1);
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].row, ds.rows[0]);
        assert_eq!(out.rejected[0].reason, r#"fill_missing failed for ["c"]"#);
        assert_eq!(
            out.metrics,
            StepMetrics::FillMissing {
                filled_fields: vec!["c".to_string()],
                rejected: 1
            }
        );
    }

    #[test]
    fn fill_missing_soft_without_default_passes_rows_through() {
        let ds = DataSet::new(vec![record([("c", Value::Null)])]);
        let step = TransformationStep::fill_missing(["c"], None);
        let out = apply_transformation(&ds, &step).unwrap();
        assert_eq!(out.dataset, ds);
        assert!(out.rejected.is_empty());
    }

    #[test]
    fn deduplicate_keeps_first_occurrence() {
        let step = TransformationStep::deduplicate(["Inv"]);
        let ds = invoices();
        let out = apply_transformation(&ds, &step).unwrap();

        assert_eq!(out.dataset.rows, ds.rows[..2].to_vec());
        assert_eq!(out.rejected.len(), 1);
        assert_eq!(out.rejected[0].row, ds.rows[2]);
        assert_eq!(out.rejected[0].reason, r#"duplicate on ["Inv"]"#);
        assert_eq!(
            out.metrics,
            StepMetrics::Deduplicate {
                keys: vec!["Inv".to_string()],
                deduplicated: 1,
                retained: 2
            }
        );
    }

    #[test]
    fn deduplicate_absent_and_null_keys_collide() {
        let ds = DataSet::new(vec![
            record([("k", Value::Null)]),
            record([("other", Value::Int64(1))]),
        ]);
        let out = apply_transformation(&ds, &TransformationStep::deduplicate(["k"])).unwrap();
        assert_eq!(out.dataset.row_count(), 1);
    }

    #[test]
    fn deduplicate_falls_back_to_target_fields() {
        let step = TransformationStep::new(
            TransformationKind::Deduplicate(DeduplicateParams::default()),
            vec!["Inv".to_string()],
        );
        let out = apply_transformation(&invoices(), &step).unwrap();
        assert_eq!(out.dataset.row_count(), 2);
    }

    #[test]
    fn deduplicate_without_keys_is_fatal() {
        let step = TransformationStep::new(
            TransformationKind::Deduplicate(DeduplicateParams::default()),
            Vec::new(),
        );
        let err = apply_transformation(&invoices(), &step).unwrap_err();
        assert!(matches!(err, CleansingError::MissingDeduplicateKeys));
    }

    #[test]
    fn metrics_serialize_flat() {
        let metrics = StepMetrics::Deduplicate {
            keys: vec!["Inv".to_string()],
            deduplicated: 1,
            retained: 2,
        };
        assert_eq!(
            serde_json::to_value(&metrics).unwrap(),
            serde_json::json!({"keys": ["Inv"], "deduplicated": 1, "retained": 2})
        );
    }
}
