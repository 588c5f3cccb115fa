//! Dataset profiling.
//!
//! [`ProfilingEngine::profile`] makes one pass over a [`crate::types::DataSet`] and produces a
//! [`ProfilingSnapshot`]: per-field counts, samples, numeric moments, top values and a
//! distribution (equal-width histogram for numeric fields, full frequency list otherwise).
//! [`ProfilingContextBuilder::build`] folds a job's threshold overrides into a snapshot and
//! projects it into the flat [`ProfilingContext`] that rule evaluation consumes.
//!
//! ```rust
//! use dq_transform::profiling::{ProfilingContextBuilder, ProfilingEngine, ProfilingJob};
//! use dq_transform::types::{record, DataSet, Value};
//!
//! let ds = DataSet::new(vec![
//!     record([("Amount", Value::Int64(10))]),
//!     record([("Amount", Value::Int64(30))]),
//! ]);
//! let job = ProfilingJob::new("prof-1", "tenant-1", "billing");
//! let result = ProfilingEngine::default().profile(&job, &ds);
//! assert_eq!(result.snapshot.field_stats["Amount"].mean, Some(20.0));
//!
//! let ctx = ProfilingContextBuilder::new().build(&result.snapshot, Some(&job));
//! assert_eq!(ctx.record_count, 2);
//! ```

pub mod accumulator;
pub mod context;
pub mod distribution;
pub mod engine;
pub mod job;
pub mod report;
pub mod snapshot;

pub use accumulator::{FieldAccumulator, ValueCounter};
pub use context::{ContextMetadata, ProfilingContext, ProfilingContextBuilder};
pub use distribution::{numeric_buckets, percentage, value_frequencies};
pub use engine::{ProfilingEngine, ProfilingOptions};
pub use job::{FieldOverride, ProfilingJob, ProfilingJobResult, ProfilingJobStatus};
pub use report::{export_report_to_csv, FieldSummary, ProfilingReport, REPORT_HEADER};
pub use snapshot::{
    DistributionBucket, DistributionKind, DistributionSummary, GeneratedFrom,
    ProfilingFieldStats, ProfilingSnapshot, Thresholds, ValueFrequency,
};
