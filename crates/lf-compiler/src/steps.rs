//! Rewrite and filter steps.
//!
//! Steps are plain data tagged by `kind` so a profile can be stored as JSON
//! and every step can be exercised on its own. The interpreters here are
//! pure; a step that cannot handle a rule returns a [`StageError`] and the
//! pipeline decides what that means.

use serde::{Deserialize, Serialize};

use lf_core::classify::classify;
use lf_core::comments::should_keep_comment;
use lf_core::modifiers::{ModifierError, Modifiers};
use lf_core::{normalize_rule, RuleCategory};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    #[error("malformed options: {0}")]
    MalformedOptions(#[from] ModifierError),
    #[error("rewrite produced an empty rule")]
    EmptyResult,
}

// =============================================================================
// Rewrite steps
// =============================================================================

/// `Rule -> Rule | dropped`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewriteStep {
    Identity,
    /// Trim and collapse whitespace.
    Normalize,
    /// Remove every `$name[=...]` option from network filters.
    StripModifier { name: String },
    /// Drop network filters carrying option `name`.
    DropWithModifier { name: String },
    /// Drop any rule containing `pattern` literally.
    DropContaining { pattern: String },
    /// Literal replacement of every occurrence of `from`.
    Replace { from: String, to: String },
}

impl RewriteStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Normalize => "normalize",
            Self::StripModifier { .. } => "strip_modifier",
            Self::DropWithModifier { .. } => "drop_with_modifier",
            Self::DropContaining { .. } => "drop_containing",
            Self::Replace { .. } => "replace",
        }
    }

    /// `Ok(None)` drops the rule.
    pub fn apply(&self, rule: &str) -> Result<Option<String>, StageError> {
        match self {
            Self::Identity => Ok(Some(rule.to_string())),
            Self::Normalize => Ok(Some(normalize_rule(rule))),
            Self::StripModifier { name } => match Modifiers::parse(rule)? {
                Some(mut parsed) if parsed.contains(name) => {
                    parsed.remove(name);
                    let rendered = parsed.render();
                    if rendered.trim().is_empty() {
                        return Err(StageError::EmptyResult);
                    }
                    Ok(Some(rendered))
                }
                _ => Ok(Some(rule.to_string())),
            },
            Self::DropWithModifier { name } => match Modifiers::parse(rule)? {
                Some(parsed) if parsed.contains(name) => Ok(None),
                _ => Ok(Some(rule.to_string())),
            },
            Self::DropContaining { pattern } => {
                if !pattern.is_empty() && rule.contains(pattern.as_str()) {
                    Ok(None)
                } else {
                    Ok(Some(rule.to_string()))
                }
            }
            Self::Replace { from, to } => {
                if from.is_empty() || !rule.contains(from.as_str()) {
                    return Ok(Some(rule.to_string()));
                }
                let replaced = rule.replace(from.as_str(), to);
                if replaced.trim().is_empty() {
                    return Err(StageError::EmptyResult);
                }
                Ok(Some(replaced))
            }
        }
    }
}

// =============================================================================
// Filter steps
// =============================================================================

/// `Rule -> keep?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterStep {
    PassAll,
    NonEmpty,
    /// Comment policy from `lf_core::comments`.
    UsefulComments,
    /// Reject rules containing any of the literals.
    RejectContaining { patterns: Vec<String> },
    /// Reject network filters carrying any of the named options.
    RejectModifiers { names: Vec<String> },
    RejectCategory { category: RuleCategory },
    MaxLength { limit: usize },
}

impl FilterStep {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PassAll => "pass_all",
            Self::NonEmpty => "non_empty",
            Self::UsefulComments => "useful_comments",
            Self::RejectContaining { .. } => "reject_containing",
            Self::RejectModifiers { .. } => "reject_modifiers",
            Self::RejectCategory { .. } => "reject_category",
            Self::MaxLength { .. } => "max_length",
        }
    }

    pub fn test(&self, rule: &str) -> Result<bool, StageError> {
        match self {
            Self::PassAll => Ok(true),
            Self::NonEmpty => Ok(!rule.trim().is_empty()),
            Self::UsefulComments => Ok(should_keep_comment(rule)),
            Self::RejectContaining { patterns } => Ok(!patterns
                .iter()
                .any(|p| !p.is_empty() && rule.contains(p.as_str()))),
            Self::RejectModifiers { names } => match Modifiers::parse(rule)? {
                Some(parsed) => Ok(!names.iter().any(|name| parsed.contains(name))),
                None => Ok(true),
            },
            Self::RejectCategory { category } => Ok(classify(rule) != *category),
            Self::MaxLength { limit } => Ok(rule.chars().count() <= *limit),
        }
    }
}
