//! Pre-execution rule checks.

use super::rule::{CleansingRule, TransformationKind, TransformationStep};
use super::transform::deduplicate_keys;

/// Advisory warnings for a rule definition. Warnings never block execution.
pub fn validate_rule(rule: &CleansingRule) -> Vec<String> {
    rule.transformations
        .iter()
        .enumerate()
        .filter_map(|(index, step)| validate_step(index, step))
        .collect()
}

fn validate_step(index: usize, step: &TransformationStep) -> Option<String> {
    match &step.kind {
        TransformationKind::Standardize(_) | TransformationKind::FillMissing(_)
            if step.target_fields.is_empty() =>
        {
            Some(format!(
                "step {index} requires target_fields for {}",
                step.kind_name()
            ))
        }
        TransformationKind::Deduplicate(params) if deduplicate_keys(step, params).is_none() => {
            Some(format!("step {index} must define keys for deduplicate"))
        }
        _ => None,
    }
}
