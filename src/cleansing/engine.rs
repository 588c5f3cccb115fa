//! Ordered execution of a cleansing rule over one dataset.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::info_span;

use super::job::{
    AfterCounts, BeforeCounts, CleansingJob, CleansingJobResult, CleansingJobStatus, CleansingRun,
    StepReport,
};
use super::observer::{CleansingEvent, CleansingObserver};
use super::rule::CleansingRule;
use super::transform::apply_transformation;
use super::validate::validate_rule;
use crate::error::CleansingResult;
use crate::types::DataSet;

/// Applies a rule's steps to a dataset, in declared order.
#[derive(Default)]
pub struct CleansingEngine {
    observer: Option<Arc<dyn CleansingObserver>>,
}

impl fmt::Debug for CleansingEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleansingEngine")
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

impl CleansingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer for cleansing events.
    pub fn with_observer(mut self, observer: Arc<dyn CleansingObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Run `rule` over `dataset` for `job`.
    ///
    /// Each step receives the previous step's output. Rows a step rejects are collected and
    /// never reach later steps. Any step error aborts the whole run: no result is produced and
    /// earlier steps' output is discarded.
    pub fn run(
        &self,
        job: &CleansingJob,
        rule: &CleansingRule,
        dataset: &DataSet,
    ) -> CleansingResult<CleansingRun> {
        let span = info_span!("cleansing_run", job_id = %job.job_id, rule_id = %rule.rule_id);
        let _enter = span.enter();
        let start = Instant::now();

        let warnings = validate_rule(rule);
        self.emit(CleansingEvent::RunStarted {
            job_id: job.job_id.clone(),
            rule_id: rule.rule_id.clone(),
            rule_version: rule.version.clone(),
            rows: dataset.row_count(),
        });
        for message in &warnings {
            self.emit(CleansingEvent::Warning {
                job_id: job.job_id.clone(),
                message: message.clone(),
            });
        }

        let mut current = dataset.clone();
        let mut metrics = BTreeMap::new();
        let mut step_metrics = Vec::with_capacity(rule.transformations.len());
        let mut rejected = Vec::new();

        for (index, step) in rule.transformations.iter().enumerate() {
            let rows_in = current.row_count();
            let outcome = match apply_transformation(&current, step) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.emit(CleansingEvent::RunFailed {
                        job_id: job.job_id.clone(),
                        step_index: index,
                        error: err.to_string(),
                    });
                    return Err(err);
                }
            };

            let rows_out = outcome.dataset.row_count();
            self.emit(CleansingEvent::StepFinished {
                job_id: job.job_id.clone(),
                index,
                kind: step.kind_name(),
                rows_in,
                rows_out,
                rejected: outcome.rejected.len(),
            });

            step_metrics.push(StepReport {
                index,
                kind: step.kind_name().to_string(),
                rows_in,
                rows_out,
                rejected: outcome.rejected.len(),
                metrics: outcome.metrics.clone(),
            });
            metrics.insert(step.kind_name().to_string(), outcome.metrics);
            rejected.extend(outcome.rejected);
            current = outcome.dataset;
        }

        let result = CleansingJobResult {
            job_id: job.job_id.clone(),
            status: CleansingJobStatus::Succeeded,
            before_counts: BeforeCounts {
                rows: dataset.row_count(),
            },
            after_counts: AfterCounts {
                rows: current.row_count(),
                rejected: rejected.len(),
            },
            rejected_sample: rejected.into_iter().next(),
            output_dataset: None,
            linked_validation_job_id: None,
            metrics,
            step_metrics,
            warnings: warnings.clone(),
        };

        self.emit(CleansingEvent::RunFinished {
            job_id: job.job_id.clone(),
            elapsed: start.elapsed(),
            rows_out: result.after_counts.rows,
            rejected: result.after_counts.rejected,
        });

        Ok(CleansingRun {
            result,
            dataset: current,
            warnings,
        })
    }

    fn emit(&self, event: CleansingEvent) {
        if let Some(observer) = &self.observer {
            observer.on_event(&event);
        }
    }
}
