//! Per-target generation: rewrite, filter, dedupe, rank, serialize.
//!
//! A misbehaving step never aborts a target. A rewrite that fails leaves the
//! rule as it was for that step; a filter that fails keeps the rule.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use lf_core::{extract_domains, priority_class, DomainOptions, RuleStatistics};

use crate::error::GeneratorError;
use crate::header::{domain_header, list_header, HeaderConfig};
use crate::profile::{PriorityTable, TargetProfile};
use crate::runlog::RunLog;
use crate::steps::{FilterStep, RewriteStep};

/// Outcome of one generated artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Output path, or the target name when nothing was written.
    pub output: String,
    pub rules_processed: usize,
    pub original_rules_count: usize,
    pub statistics: RuleStatistics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub rules: Vec<String>,
    pub result: GenerationResult,
}

pub struct Pipeline<'a> {
    header: &'a HeaderConfig,
    log: &'a dyn RunLog,
}

impl<'a> Pipeline<'a> {
    pub fn new(header: &'a HeaderConfig, log: &'a dyn RunLog) -> Self {
        Self { header, log }
    }

    pub fn process(&self, rules: &[String], profile: &TargetProfile) -> Processed {
        self.log.info(&format!(
            "Processing {} rules for {}",
            rules.len(),
            profile.extension_name
        ));

        let rewritten = self.rewrite(rules, &profile.rewrite_chain);
        let mut filtered = self.filter(rewritten, &profile.filter_chain);

        let deduped = dedupe(&mut filtered);
        self.log.info(&format!("Removed {deduped} duplicate rules"));

        let sorted = sort_by_priority(filtered, &profile.priority);
        self.log.info(&format!("Processed {} rules successfully", sorted.len()));

        let result = GenerationResult {
            output: profile.extension_name.clone(),
            rules_processed: sorted.len(),
            original_rules_count: rules.len(),
            statistics: RuleStatistics::from_rules(&sorted),
        };
        Processed {
            rules: sorted,
            result,
        }
    }

    fn rewrite(&self, rules: &[String], chain: &[RewriteStep]) -> Vec<String> {
        let mut out = Vec::with_capacity(rules.len());
        let mut dropped = 0usize;

        'rules: for rule in rules {
            let mut current = rule.clone();
            for step in chain {
                match step.apply(&current) {
                    Ok(Some(next)) => current = next,
                    Ok(None) => {
                        dropped += 1;
                        continue 'rules;
                    }
                    Err(e) => self.log.warn(&format!(
                        "Rewrite '{}' failed for rule: {current} ({e})",
                        step.name()
                    )),
                }
            }
            out.push(current);
        }

        if dropped > 0 {
            self.log.info(&format!("Rewrites dropped {dropped} rules"));
        }
        out
    }

    fn filter(&self, mut rules: Vec<String>, chain: &[FilterStep]) -> Vec<String> {
        let mut removed = vec![0usize; chain.len()];

        rules.retain(|rule| {
            for (idx, filter) in chain.iter().enumerate() {
                match filter.test(rule) {
                    Ok(true) => {}
                    Ok(false) => {
                        removed[idx] += 1;
                        return false;
                    }
                    Err(e) => self.log.warn(&format!(
                        "Filter '{}' failed for rule: {rule} ({e})",
                        filter.name()
                    )),
                }
            }
            true
        });

        for (filter, count) in chain.iter().zip(&removed) {
            self.log
                .info(&format!("Filter '{}' removed {count} rules", filter.name()));
        }
        rules
    }

    /// Header followed by one rule per line.
    pub fn render_list(&self, rules: &[String], profile: &TargetProfile, date: NaiveDate) -> String {
        let mut content = list_header(profile, self.header, date);
        for rule in rules {
            content.push_str(rule);
            content.push('\n');
        }
        content
    }

    pub fn generate_list(
        &self,
        rules: &[String],
        profile: &TargetProfile,
        output: &Path,
        date: NaiveDate,
    ) -> Result<GenerationResult, GeneratorError> {
        let processed = self.process(rules, profile);
        let content = self.render_list(&processed.rules, profile, date);
        write_artifact(output, &content)?;

        self.log.info(&format!("Generated: {}", output.display()));
        Ok(GenerationResult {
            output: output.display().to_string(),
            ..processed.result
        })
    }

    /// Domain list content; statistics describe the input rules.
    pub fn domain_list(&self, rules: &[String], date: NaiveDate) -> (String, GenerationResult) {
        let domains = extract_domains(rules, &DomainOptions::default());

        let mut content = domain_header(self.header, domains.len(), date);
        for domain in &domains {
            content.push_str(domain);
            content.push('\n');
        }

        let result = GenerationResult {
            output: "domains".to_string(),
            rules_processed: domains.len(),
            original_rules_count: rules.len(),
            statistics: RuleStatistics::from_rules(rules),
        };
        (content, result)
    }

    pub fn generate_domain_list(
        &self,
        rules: &[String],
        output: &Path,
        date: NaiveDate,
    ) -> Result<GenerationResult, GeneratorError> {
        let (content, result) = self.domain_list(rules, date);
        write_artifact(output, &content)?;

        self.log.info(&format!(
            "Generated domain list with {} domains",
            result.rules_processed
        ));
        Ok(GenerationResult {
            output: output.display().to_string(),
            ..result
        })
    }
}

/// Remove exact duplicates, keeping the first occurrence. Returns how many
/// were removed.
pub fn dedupe(rules: &mut Vec<String>) -> usize {
    let before = rules.len();
    let mut seen: HashSet<String> = HashSet::with_capacity(rules.len());
    rules.retain(|rule| seen.insert(rule.clone()));
    before - rules.len()
}

/// Descending rank, then ascending rule text.
pub fn sort_by_priority(rules: Vec<String>, table: &PriorityTable) -> Vec<String> {
    let mut keyed: Vec<(i32, String)> = rules
        .into_iter()
        .map(|rule| (table.rank(priority_class(&rule)), rule))
        .collect();
    keyed.sort_by(|(rank_a, a), (rank_b, b)| match rank_b.cmp(rank_a) {
        Ordering::Equal => a.cmp(b),
        other => other,
    });
    keyed.into_iter().map(|(_, rule)| rule).collect()
}

/// Write one artifact, creating its directory when needed.
pub fn write_artifact(path: &Path, content: &str) -> Result<(), GeneratorError> {
    let write_error = |source| GeneratorError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
    }
    fs::write(path, content).map_err(write_error)
}
