//! Cleansing run events and the observers that receive them.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, warn};

/// Events emitted by the cleansing engine while a job runs.
#[derive(Debug, Clone)]
pub enum CleansingEvent {
    RunStarted {
        job_id: String,
        rule_id: String,
        rule_version: String,
        rows: usize,
    },
    Warning {
        job_id: String,
        message: String,
    },
    StepFinished {
        job_id: String,
        index: usize,
        kind: &'static str,
        rows_in: usize,
        rows_out: usize,
        rejected: usize,
    },
    RunFinished {
        job_id: String,
        elapsed: Duration,
        rows_out: usize,
        rejected: usize,
    },
    RunFailed {
        job_id: String,
        step_index: usize,
        error: String,
    },
}

/// Observer hook for cleansing events.
pub trait CleansingObserver: Send + Sync {
    fn on_event(&self, event: &CleansingEvent);
}

/// Forwards cleansing events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingCleansingObserver;

impl CleansingObserver for TracingCleansingObserver {
    fn on_event(&self, event: &CleansingEvent) {
        match event {
            CleansingEvent::RunStarted {
                job_id,
                rule_id,
                rule_version,
                rows,
            } => info!(%job_id, %rule_id, %rule_version, rows, "cleansing started"),
            CleansingEvent::Warning { job_id, message } => {
                warn!(%job_id, %message, "cleansing rule warning")
            }
            CleansingEvent::StepFinished {
                job_id,
                index,
                kind,
                rows_in,
                rows_out,
                rejected,
            } => info!(%job_id, index, kind, rows_in, rows_out, rejected, "cleansing step finished"),
            CleansingEvent::RunFinished {
                job_id,
                elapsed,
                rows_out,
                rejected,
            } => info!(%job_id, ?elapsed, rows_out, rejected, "cleansing finished"),
            CleansingEvent::RunFailed {
                job_id,
                step_index,
                error,
            } => error!(%job_id, step_index, %error, "cleansing failed"),
        }
    }
}

/// Fans events out to a list of observers.
#[derive(Default)]
pub struct CompositeCleansingObserver {
    observers: Vec<Arc<dyn CleansingObserver>>,
}

impl CompositeCleansingObserver {
    pub fn new(observers: Vec<Arc<dyn CleansingObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeCleansingObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeCleansingObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl CleansingObserver for CompositeCleansingObserver {
    fn on_event(&self, event: &CleansingEvent) {
        for o in &self.observers {
            o.on_event(event);
        }
    }
}
