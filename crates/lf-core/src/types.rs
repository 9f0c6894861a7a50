//! Core type definitions for ListForge
//!
//! Rules themselves are plain strings; the types here describe what is
//! derived from them (category, priority class) and what is reported about
//! them (statistics, advisory features).

use serde::{Deserialize, Serialize};

use crate::classify::priority_class;

// =============================================================================
// Rule Categories
// =============================================================================

/// Syntactic category of a single rule line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// `! ...`
    Comment,
    /// Cosmetic rule (`##` or `#@#`)
    ElementHiding,
    /// Request rule (`||...`, `@@...`, or anything carrying `$` options)
    NetworkFilter,
    /// Anything else (plain substring patterns, hosts-style lines, ...)
    Other,
}

impl RuleCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::ElementHiding => "element-hiding",
            Self::NetworkFilter => "network-filter",
            Self::Other => "other",
        }
    }
}

/// Category refined for ordering: network filters starting with `@@` are
/// split out as exceptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityClass {
    Comment,
    Exception,
    NetworkFilter,
    ElementHiding,
    Other,
}

impl From<RuleCategory> for PriorityClass {
    fn from(category: RuleCategory) -> Self {
        match category {
            RuleCategory::Comment => Self::Comment,
            RuleCategory::ElementHiding => Self::ElementHiding,
            RuleCategory::NetworkFilter => Self::NetworkFilter,
            RuleCategory::Other => Self::Other,
        }
    }
}

// =============================================================================
// Advisory Features
// =============================================================================

bitflags::bitflags! {
    /// Capabilities a consuming ad blocker advertises.
    ///
    /// Informational only: the generation pipeline never branches on these.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Features: u16 {
        /// `$badfilter`
        const BADFILTER = 1 << 0;
        const NETWORK_FILTERS = 1 << 1;
        const ELEMENT_HIDING = 1 << 2;
        const COSMETIC_FILTERING = 1 << 3;
        /// `##+js(...)` and friends
        const SCRIPTLET_INJECTION = 1 << 4;
        /// `$redirect=` / `$redirect-rule=`
        const REDIRECT_DIRECTIVES = 1 << 5;
        const REMOVE_PARAM = 1 << 6;
        const CSP = 1 << 7;
        const EXTENDED_CSS = 1 << 8;
        /// AdGuard `$app=`
        const APP_MODIFIER = 1 << 9;
        const ADVANCED_MODIFIERS = 1 << 10;

        /// Features every mainstream blocker supports
        const BASELINE = Self::BADFILTER.bits()
            | Self::NETWORK_FILTERS.bits()
            | Self::ELEMENT_HIDING.bits()
            | Self::COSMETIC_FILTERING.bits();
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::BASELINE
    }
}

// =============================================================================
// Statistics
// =============================================================================

/// Per-category counts over a rule sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleStatistics {
    pub total: usize,
    pub comments: usize,
    pub network_filters: usize,
    pub exceptions: usize,
    pub element_hiding: usize,
    pub other: usize,
}

impl RuleStatistics {
    pub fn from_rules<S: AsRef<str>>(rules: &[S]) -> Self {
        let mut stats = Self::default();
        for rule in rules {
            stats.record(rule.as_ref());
        }
        stats
    }

    pub fn record(&mut self, rule: &str) {
        self.total += 1;
        match priority_class(rule) {
            PriorityClass::Comment => self.comments += 1,
            PriorityClass::Exception => self.exceptions += 1,
            PriorityClass::NetworkFilter => self.network_filters += 1,
            PriorityClass::ElementHiding => self.element_hiding += 1,
            PriorityClass::Other => self.other += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistics_split_exceptions_from_network_filters() {
        let rules = [
            "! comment",
            "||ads.example.com^",
            "@@||ok.example.com^",
            "example.com##.ad",
            "/banner/",
        ];
        let stats = RuleStatistics::from_rules(&rules);
        assert_eq!(
            stats,
            RuleStatistics {
                total: 5,
                comments: 1,
                network_filters: 1,
                exceptions: 1,
                element_hiding: 1,
                other: 1,
            }
        );
    }

    #[test]
    fn features_default_to_baseline() {
        let features = Features::default();
        assert!(features.contains(Features::ELEMENT_HIDING));
        assert!(!features.contains(Features::SCRIPTLET_INJECTION));
    }

    #[test]
    fn features_serialize_as_flag_names() {
        let features = Features::CSP | Features::BADFILTER;
        let json = serde_json::to_string(&features).expect("serialize features");
        let back: Features = serde_json::from_str(&json).expect("deserialize features");
        assert_eq!(back, features);
        assert!(json.contains("CSP"));
    }

    #[test]
    fn categories_use_snake_case_names() {
        let json = serde_json::to_string(&RuleCategory::ElementHiding).expect("serialize category");
        assert_eq!(json, "\"element_hiding\"");
        assert_eq!(RuleCategory::NetworkFilter.as_str(), "network-filter");
    }
}
