//! In-memory orchestration of cleansing jobs.
//!
//! [`CleansingJobManager`] owns a [`RuleRegistry`] and a [`CleansingEngine`] and keeps every
//! submitted job, its result and its cleansed output keyed by `job_id`. Nothing is persisted.
//! All methods take `&mut self` for writes; wrap the manager in a `Mutex` to share it.

use std::collections::HashMap;

use tracing::info;

use super::engine::CleansingEngine;
use super::job::{CleansingJob, CleansingJobResult, CleansingJobStatus, CleansingRun};
use super::registry::RuleRegistry;
use super::rule::CleansingRule;
use crate::error::{CleansingError, CleansingResult};
use crate::types::DataSet;

#[derive(Debug, Default)]
pub struct CleansingJobManager {
    registry: RuleRegistry,
    engine: CleansingEngine,
    jobs: HashMap<String, CleansingJob>,
    results: HashMap<String, CleansingJobResult>,
    outputs: HashMap<String, DataSet>,
}

impl CleansingJobManager {
    pub fn new(registry: RuleRegistry, engine: CleansingEngine) -> Self {
        Self {
            registry,
            engine,
            jobs: HashMap::new(),
            results: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn upsert_rule(&mut self, rule: CleansingRule) {
        self.registry.upsert(rule);
    }

    pub fn list_rules<'a>(
        &'a self,
        dataset_type: Option<&'a str>,
    ) -> impl Iterator<Item = &'a CleansingRule> + 'a {
        self.registry.list(dataset_type)
    }

    /// Resolve the job's rule and run it synchronously.
    ///
    /// The stored job carries the final status, and the result's `output_dataset` names the key
    /// for [`Self::get_output_dataset`]. A failed run stores nothing.
    pub fn submit_job(
        &mut self,
        job: CleansingJob,
        dataset: &DataSet,
    ) -> CleansingResult<CleansingRun> {
        let rule = self
            .registry
            .get(&job.rule_id, job.rule_version.as_deref())
            .ok_or_else(|| CleansingError::RuleNotFound {
                rule_id: job.rule_id.clone(),
                version: job.rule_version.clone(),
            })?;

        let mut running = job;
        running.status = CleansingJobStatus::Running;
        let mut run = self.engine.run(&running, rule, dataset)?;

        info!(
            job_id = %running.job_id,
            rule_id = %rule.rule_id,
            rule_version = %rule.version,
            status = %run.result.status,
            "cleansing job completed"
        );

        running.status = run.result.status;
        let job_id = running.job_id.clone();
        run.result.output_dataset = Some(job_id.clone());
        self.jobs.insert(job_id.clone(), running);
        self.results.insert(job_id.clone(), run.result.clone());
        self.outputs.insert(job_id, run.dataset.clone());
        Ok(run)
    }

    pub fn get_job(&self, job_id: &str) -> Option<&CleansingJob> {
        self.jobs.get(job_id)
    }

    pub fn get_result(&self, job_id: &str) -> Option<&CleansingJobResult> {
        self.results.get(job_id)
    }

    pub fn get_output_dataset(&self, job_id: &str) -> Option<&DataSet> {
        self.outputs.get(job_id)
    }

    pub fn list_results(&self) -> impl Iterator<Item = &CleansingJobResult> {
        self.results.values()
    }

    /// Record the validation job that consumed a cleansing output.
    ///
    /// Returns the updated result, or `None` when `job_id` is unknown.
    pub fn link_validation_job(
        &mut self,
        job_id: &str,
        validation_job_id: impl Into<String>,
    ) -> Option<&CleansingJobResult> {
        let result = self.results.get_mut(job_id)?;
        result.linked_validation_job_id = Some(validation_job_id.into());
        Some(result)
    }

    /// Clear rules, jobs, results and outputs.
    pub fn reset(&mut self) {
        self.registry.clear();
        self.jobs.clear();
        self.results.clear();
        self.outputs.clear();
    }
}
