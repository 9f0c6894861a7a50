//! Hostname extraction for the domain list.
//!
//! Two syntaxes contribute hostnames: host-anchored network filters
//! (`||host^...`) and domain-scoped element hiding rules
//! (`a.com,b.com##selector`). Each final candidate is checked on its own, so
//! `a.com,~b.com##.x` still contributes `a.com`.

use std::collections::BTreeSet;

use crate::classify::{is_comment, is_exception};

/// Options for [`extract_domains`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainOptions {
    /// Drop candidates containing `*`.
    pub exclude_wildcards: bool,
    /// Skip `@@` rules entirely.
    pub exclude_exceptions: bool,
}

impl Default for DomainOptions {
    fn default() -> Self {
        Self {
            exclude_wildcards: true,
            exclude_exceptions: false,
        }
    }
}

/// Collect the unique hostnames referenced by `rules`, in ascending order.
pub fn extract_domains<S: AsRef<str>>(rules: &[S], options: &DomainOptions) -> BTreeSet<String> {
    let mut domains = BTreeSet::new();

    for rule in rules {
        let rule = rule.as_ref();
        if rule.trim().is_empty() || is_comment(rule) {
            continue;
        }
        if options.exclude_exceptions && is_exception(rule) {
            continue;
        }

        if let Some(host) = host_anchor_domain(rule) {
            if should_include(host, options) {
                domains.insert(host.to_string());
            }
        } else if let Some((scope, _)) = rule.split_once("##") {
            if scope.starts_with('!') {
                continue;
            }
            for candidate in scope.split(',') {
                let candidate = candidate.trim();
                if should_include(candidate, options) {
                    domains.insert(candidate.to_string());
                }
            }
        }
    }

    domains
}

/// Host part of a `||host...` rule: everything up to the first `/`, `$` or `^`.
fn host_anchor_domain(rule: &str) -> Option<&str> {
    let rest = rule.strip_prefix("||")?;
    let mut end = rest.len();
    for (idx, ch) in rest.char_indices() {
        if ch == '/' || ch == '$' || ch == '^' {
            end = idx;
            break;
        }
    }
    Some(&rest[..end])
}

fn should_include(candidate: &str, options: &DomainOptions) -> bool {
    if candidate.is_empty() {
        return false;
    }
    if options.exclude_wildcards && candidate.contains('*') {
        return false;
    }
    // negated scope entries never name a blocked host
    !candidate.contains('~')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(domains: BTreeSet<String>) -> Vec<String> {
        domains.into_iter().collect()
    }

    #[test]
    fn extracts_from_both_syntaxes() {
        let rules = [
            "||ads.example.com^",
            "example.com##.ad",
            "@@||ok.example.com^",
            "! comment",
        ];
        let domains = extract_domains(&rules, &DomainOptions::default());
        assert_eq!(sorted(domains), vec!["ads.example.com", "example.com"]);
    }

    #[test]
    fn host_stops_at_first_separator() {
        let rules = [
            "||test.com/path$script,third-party",
            "||domain.test^$badfilter",
            "||tracker.net$image",
            "||cdn.example.org",
        ];
        let domains = extract_domains(&rules, &DomainOptions::default());
        assert_eq!(
            sorted(domains),
            vec!["cdn.example.org", "domain.test", "test.com", "tracker.net"]
        );
    }

    #[test]
    fn wildcards_follow_option_but_negation_is_always_dropped() {
        let rules = ["||*.ads.com^", "domain.com,~other.com##.x", "*.cdn.com##.y"];

        let strict = extract_domains(&rules, &DomainOptions::default());
        assert_eq!(sorted(strict), vec!["domain.com"]);

        let loose = extract_domains(
            &rules,
            &DomainOptions {
                exclude_wildcards: false,
                ..DomainOptions::default()
            },
        );
        assert_eq!(sorted(loose), vec!["*.ads.com", "*.cdn.com", "domain.com"]);
    }

    #[test]
    fn exceptions_can_be_excluded() {
        let rules = ["@@||ok.example.com^", "@@ok.example.com##.banner", "||ads.example.com^"];

        // `@@||` is not host-anchored, only the scoped hiding rule contributes
        let with = extract_domains(&rules, &DomainOptions::default());
        assert_eq!(with.len(), 2);
        assert!(with.contains("ads.example.com"));
        assert!(!with.contains("ok.example.com"));

        let without = extract_domains(
            &rules,
            &DomainOptions {
                exclude_exceptions: true,
                ..DomainOptions::default()
            },
        );
        assert_eq!(sorted(without), vec!["ads.example.com"]);
    }

    #[test]
    fn generic_hiding_rules_and_blanks_contribute_nothing() {
        let rules = ["##.ad", "", "   ", "example.com#@#.ad", "/banner/"];
        assert!(extract_domains(&rules, &DomainOptions::default()).is_empty());
    }

    #[test]
    fn splits_on_first_separator_and_trims_scope_entries() {
        let rules = ["a.com, b.com##div##span"];
        let domains = extract_domains(&rules, &DomainOptions::default());
        assert_eq!(sorted(domains), vec!["a.com", "b.com"]);
    }

    #[test]
    fn extraction_is_idempotent() {
        let rules = ["||b.com^", "a.com##.x", "||b.com/path"];
        let first = extract_domains(&rules, &DomainOptions::default());
        let second = extract_domains(&rules, &DomainOptions::default());
        assert_eq!(first, second);
    }
}
