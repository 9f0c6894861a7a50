//! Rule classification.
//!
//! Checks run in a fixed order: comment, element hiding, network filter,
//! other. A rule carrying both `##` and `$` is therefore element hiding.

use crate::types::{PriorityClass, RuleCategory};

/// Classify a single rule line. Total: every string gets exactly one category.
pub fn classify(rule: &str) -> RuleCategory {
    if is_comment(rule) {
        RuleCategory::Comment
    } else if is_element_hiding(rule) {
        RuleCategory::ElementHiding
    } else if is_network_filter(rule) {
        RuleCategory::NetworkFilter
    } else {
        RuleCategory::Other
    }
}

/// Category used for ordering and statistics.
pub fn priority_class(rule: &str) -> PriorityClass {
    match classify(rule) {
        RuleCategory::NetworkFilter if is_exception(rule) => PriorityClass::Exception,
        category => category.into(),
    }
}

#[inline]
pub fn is_comment(rule: &str) -> bool {
    rule.trim_start().starts_with('!')
}

#[inline]
pub fn is_element_hiding(rule: &str) -> bool {
    rule.contains("##") || rule.contains("#@#")
}

pub fn is_network_filter(rule: &str) -> bool {
    rule.starts_with("||")
        || rule.starts_with("@@")
        || (rule.contains('$') && !is_element_hiding(rule))
}

#[inline]
pub fn is_exception(rule: &str) -> bool {
    rule.starts_with("@@")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_category() {
        assert_eq!(classify("! Title: list"), RuleCategory::Comment);
        assert_eq!(classify("example.com##.ad"), RuleCategory::ElementHiding);
        assert_eq!(classify("example.com#@#.ad"), RuleCategory::ElementHiding);
        assert_eq!(classify("||ads.example.com^"), RuleCategory::NetworkFilter);
        assert_eq!(classify("/banner/*$image"), RuleCategory::NetworkFilter);
        assert_eq!(classify("/banner/"), RuleCategory::Other);
        assert_eq!(classify(""), RuleCategory::Other);
    }

    #[test]
    fn exception_is_network_filter_with_exception_class() {
        assert_eq!(classify("@@||a.com^"), RuleCategory::NetworkFilter);
        assert_eq!(priority_class("@@||a.com^"), PriorityClass::Exception);
        assert_eq!(priority_class("||a.com^"), PriorityClass::NetworkFilter);
    }

    #[test]
    fn element_hiding_wins_over_modifiers() {
        assert_eq!(classify("example.com##div[data-price$=\"0\"]"), RuleCategory::ElementHiding);
        assert_eq!(priority_class("example.com##a[href$=\".exe\"]"), PriorityClass::ElementHiding);
    }

    #[test]
    fn comment_check_precedes_everything() {
        assert_eq!(classify("! ||ads.example.com^$script"), RuleCategory::Comment);
        assert_eq!(classify("!##.ad"), RuleCategory::Comment);
        assert_eq!(classify("  ! indented"), RuleCategory::Comment);
    }

    #[test]
    fn exactly_one_predicate_path_matches() {
        let samples = ["!", "##", "#@#", "||", "@@", "$", "a", "@@x##y", "||x$y##z"];
        for sample in samples {
            let category = classify(sample);
            let matches = [
                is_comment(sample),
                !is_comment(sample) && is_element_hiding(sample),
                !is_comment(sample) && !is_element_hiding(sample) && is_network_filter(sample),
            ];
            let expected = match matches.iter().position(|m| *m) {
                Some(0) => RuleCategory::Comment,
                Some(1) => RuleCategory::ElementHiding,
                Some(2) => RuleCategory::NetworkFilter,
                _ => RuleCategory::Other,
            };
            assert_eq!(category, expected, "sample {sample:?}");
        }
    }
}
