//! ListForge Filter List Generator
//!
//! This crate turns one canonical rule source into per-target filter lists
//! and a domain list.

pub mod error;
pub mod header;
pub mod loader;
pub mod pipeline;
pub mod presets;
pub mod profile;
pub mod report;
pub mod runlog;
pub mod steps;

pub use error::GeneratorError;
pub use header::{domain_header, list_header, HeaderConfig};
pub use loader::{load, load_bytes, load_text, validate_rules, ValidationResult};
pub use pipeline::{GenerationResult, Pipeline, Processed};
pub use profile::{PriorityTable, TargetProfile};
pub use report::{FailureScope, RunSummary, TargetFailure};
pub use runlog::{LogFacade, MemoryLog, NullLog, RunLog};
pub use steps::{FilterStep, RewriteStep, StageError};
