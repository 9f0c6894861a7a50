//! ListForge Core Library
//!
//! This crate holds the pure rule model shared by the generator and the CLI.
//! Nothing in here performs I/O or logging; every function maps text to text
//! (or to a category) and is safe to call from any thread.
//!
//! # Modules
//!
//! - `normalize`: whitespace normalization applied to every rule
//! - `classify`: rule categories and priority classes
//! - `modifiers`: `$option` parsing for network filters
//! - `comments`: policy for which comment lines are worth keeping
//! - `domains`: hostname extraction for the domain list
//! - `types`: shared type definitions

pub mod classify;
pub mod comments;
pub mod domains;
pub mod modifiers;
pub mod normalize;
pub mod types;

// Re-export commonly used types
pub use classify::{classify, priority_class};
pub use domains::{extract_domains, DomainOptions};
pub use normalize::normalize_rule;
pub use types::{Features, PriorityClass, RuleCategory, RuleStatistics};
