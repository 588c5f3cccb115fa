//! `dq-transform` is the dataset-transformation stage of a data-quality platform: it cleanses
//! raw tabular records according to a versioned, declarative rule, then computes single-pass
//! statistical profiles that downstream rule evaluation consumes as thresholds.
//!
//! Everything operates on an in-memory [`types::DataSet`]: an ordered list of
//! [`types::Record`]s, each mapping field names to scalar [`types::Value`]s. `Null` and the
//! empty string are both treated as missing everywhere.
//!
//! ## Flow
//!
//! 1. Load rules into a [`cleansing::RuleRegistry`] (directly, or from `.json`/`.yaml` files via
//!    [`cleansing::loader`]).
//! 2. Run a [`cleansing::CleansingJob`] through the [`cleansing::CleansingEngine`] (or let
//!    [`cleansing::CleansingJobManager`] resolve the rule and keep the results).
//! 3. Profile the cleansed rows with [`profiling::ProfilingEngine`].
//! 4. Build a [`profiling::ProfilingContext`] with [`profiling::ProfilingContextBuilder`],
//!    folding in any caller-supplied threshold overrides.
//!
//! ```rust
//! use dq_transform::cleansing::{
//!     CleansingJob, CleansingJobManager, CleansingRule, Severity, TransformationStep,
//! };
//! use dq_transform::profiling::{ProfilingContextBuilder, ProfilingEngine, ProfilingJob};
//! use dq_transform::types::{record, DataSet, Value};
//!
//! # fn main() -> Result<(), dq_transform::CleansingError> {
//! let mut manager = CleansingJobManager::default();
//! manager.upsert_rule(CleansingRule::new(
//!     "billing-standardise",
//!     "Billing standardisation",
//!     "billing",
//!     "1",
//!     vec![
//!         TransformationStep::standardize(["Currency"], "upper"),
//!         TransformationStep::fill_missing(["CustomerId"], Some(Value::from("UNKNOWN"))),
//!         TransformationStep::deduplicate(["InvoiceId"]).with_severity(Severity::Hard),
//!     ],
//! ));
//!
//! let raw = DataSet::new(vec![
//!     record([("InvoiceId", "A"), ("Currency", "usd"), ("CustomerId", "C1")]),
//!     record([("InvoiceId", "B"), ("Currency", "eur"), ("CustomerId", "")]),
//!     record([("InvoiceId", "B"), ("Currency", "eur"), ("CustomerId", "")]),
//! ]);
//! let run = manager.submit_job(
//!     CleansingJob::new("cln-1", "tenant-1", "billing", "billing-standardise"),
//!     &raw,
//! )?;
//! assert_eq!(run.dataset.row_count(), 2);
//!
//! let job = ProfilingJob::new("prof-1", "tenant-1", "billing").cleansed_input();
//! let profile = ProfilingEngine::default().profile(&job, &run.dataset);
//! let ctx = ProfilingContextBuilder::new().build(&profile.snapshot, Some(&job));
//! assert_eq!(ctx.record_count, 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`cleansing`]: rules, registry, rule file loading, step handlers, engine, job manager
//! - [`profiling`]: accumulation, distributions, snapshots, contexts, reports
//! - [`ingestion`]: CSV/JSON/Parquet files into records, typed by a [`types::Schema`] or not
//! - [`types`]: values, records, datasets and schemas
//! - [`error`]: error types
//!
//! ## Logging
//!
//! The crate logs through `tracing` and never installs a subscriber; binaries and tests choose
//! their own.

pub mod cleansing;
pub mod error;
pub mod ingestion;
pub mod profiling;
pub mod types;

pub use error::{
    CleansingError, CleansingResult, IngestionError, IngestionResult, ReportError, RuleError,
    RuleResult,
};
