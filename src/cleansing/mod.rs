//! Rule-driven dataset cleansing.
//!
//! A [`CleansingRule`] is an ordered list of [`TransformationStep`]s. The
//! [`CleansingEngine`] applies the steps in declared order, each step seeing the previous
//! step's output, and collects per-step metrics and rejected rows into a
//! [`CleansingJobResult`].
//!
//! - [`rule`]: rule and step types, validated from the JSON/YAML wire shape
//! - [`registry`]: versioned in-memory rule store
//! - [`loader`]: rule files (`.json`, `.yaml`) from paths, directories and globs
//! - [`transform`]: the step handlers
//! - [`validate`]: advisory pre-execution warnings
//! - [`engine`]: ordered execution and result assembly
//! - [`manager`]: job bookkeeping around the registry and engine
//! - [`report`]: flat job summaries
//!
//! ## Example
//!
//! ```rust
//! use dq_transform::cleansing::{
//!     CleansingEngine, CleansingJob, CleansingRule, Severity, TransformationStep,
//! };
//! use dq_transform::types::{record, DataSet, Value};
//!
//! # fn main() -> Result<(), dq_transform::CleansingError> {
//! let rule = CleansingRule::new(
//!     "billing-standardise",
//!     "Billing standardisation",
//!     "billing",
//!     "1",
//!     vec![
//!         TransformationStep::standardize(["Currency"], "upper"),
//!         TransformationStep::deduplicate(["InvoiceId"]).with_severity(Severity::Hard),
//!     ],
//! );
//! let ds = DataSet::new(vec![
//!     record([("InvoiceId", Value::from("A")), ("Currency", Value::from("usd"))]),
//!     record([("InvoiceId", Value::from("A")), ("Currency", Value::from("usd"))]),
//! ]);
//!
//! let job = CleansingJob::new("cln-1", "tenant-1", "billing", "billing-standardise");
//! let run = CleansingEngine::new().run(&job, &rule, &ds)?;
//! assert_eq!(run.dataset.row_count(), 1);
//! assert_eq!(run.result.after_counts.rejected, 1);
//! # Ok(())
//! # }
//! ```

pub mod engine;
pub mod job;
pub mod loader;
pub mod manager;
pub mod observer;
pub mod registry;
pub mod report;
pub mod rule;
pub mod transform;
pub mod validate;

pub use engine::CleansingEngine;
pub use job::{
    AfterCounts, BeforeCounts, CleansingJob, CleansingJobResult, CleansingJobStatus, CleansingRun,
    StepReport,
};
pub use loader::{load_rules_from_dir, load_rules_from_glob, load_rules_from_path, RuleFileFormat};
pub use manager::CleansingJobManager;
pub use observer::{
    CleansingEvent, CleansingObserver, CompositeCleansingObserver, TracingCleansingObserver,
};
pub use registry::RuleRegistry;
pub use report::CleansingReport;
pub use rule::{
    CaseMapping, CleansingRule, DeduplicateParams, FillMissingParams, RuleSummary, Severity,
    StandardizeParams, TransformationKind, TransformationStep,
};
pub use transform::{apply_transformation, RejectedRow, StepMetrics, TransformationOutcome};
pub use validate::validate_rule;
