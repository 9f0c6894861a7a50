//! Run summary: what was generated, what failed.

use std::fmt::Write;

use serde::Serialize;

use crate::error::GeneratorError;
use crate::pipeline::GenerationResult;

/// How far a failure reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureScope {
    /// Nothing was generated.
    Run,
    /// Only this output is missing.
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetFailure {
    pub target: String,
    pub code: String,
    pub message: String,
    pub scope: FailureScope,
}

impl TargetFailure {
    pub fn new(target: impl Into<String>, error: &GeneratorError) -> Self {
        let scope = if error.aborts_run() {
            FailureScope::Run
        } else {
            FailureScope::Target
        };
        Self {
            target: target.into(),
            code: error.code().to_string(),
            message: error.to_string(),
            scope,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub results: Vec<GenerationResult>,
    pub failures: Vec<TargetFailure>,
}

impl RunSummary {
    pub fn record(&mut self, target: &str, outcome: Result<GenerationResult, GeneratorError>) {
        match outcome {
            Ok(result) => self.results.push(result),
            Err(e) => self.failures.push(TargetFailure::new(target, &e)),
        }
    }

    /// Every failure is fatal for the exit status, whatever its scope.
    pub fn has_fatal(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn run_aborted(&self) -> bool {
        self.failures.iter().any(|f| f.scope == FailureScope::Run)
    }

    pub fn total_processed(&self) -> usize {
        self.results.iter().map(|r| r.rules_processed).sum()
    }

    pub fn render(&self) -> String {
        let rule = "=".repeat(50);
        let mut out = String::new();

        if self.run_aborted() {
            out.push_str("Run aborted, no files were generated\n");
        } else if self.results.is_empty() {
            out.push_str("No files were generated\n");
        } else {
            let _ = writeln!(out, "Generation Summary:");
            let _ = writeln!(out, "{rule}");
            for result in &self.results {
                let stats = &result.statistics;
                let _ = writeln!(out, "{}", result.output);
                let _ = writeln!(out, "   Original rules: {}", result.original_rules_count);
                let _ = writeln!(out, "   Processed rules: {}", result.rules_processed);
                let _ = writeln!(
                    out,
                    "   Efficiency: {}",
                    efficiency(result.rules_processed, result.original_rules_count)
                );
                let _ = writeln!(out, "   Comments: {}", stats.comments);
                let _ = writeln!(out, "   Network filters: {}", stats.network_filters);
                let _ = writeln!(out, "   Element hiding: {}", stats.element_hiding);
                let _ = writeln!(out, "   Exceptions: {}", stats.exceptions);
                let _ = writeln!(out, "   Other: {}", stats.other);
                out.push('\n');
            }
            let _ = writeln!(out, "Total files generated: {}", self.results.len());
            let _ = writeln!(out, "Total rules processed: {}", self.total_processed());
            let _ = writeln!(out, "{rule}");
        }

        if !self.failures.is_empty() {
            let _ = writeln!(out, "Failures: {}", self.failures.len());
            for failure in &self.failures {
                let _ = writeln!(
                    out,
                    "   {} [{}]: {}",
                    failure.target, failure.code, failure.message
                );
            }
        }

        out
    }
}

fn efficiency(processed: usize, original: usize) -> String {
    if original == 0 {
        return "n/a".to_string();
    }
    format!("{:.1}%", processed as f64 / original as f64 * 100.0)
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::path::PathBuf;

    use lf_core::RuleStatistics;

    use super::*;

    fn result(output: &str, processed: usize, original: usize) -> GenerationResult {
        GenerationResult {
            output: output.to_string(),
            rules_processed: processed,
            original_rules_count: original,
            statistics: RuleStatistics {
                total: processed,
                comments: 1,
                network_filters: processed.saturating_sub(1),
                ..RuleStatistics::default()
            },
        }
    }

    #[test]
    fn renders_results_and_failures() {
        let mut summary = RunSummary::default();
        summary.record("ublock_origin", Ok(result("out/list-ublock_origin.txt", 3, 4)));
        summary.record(
            "adguard",
            Err(GeneratorError::Write {
                path: PathBuf::from("out/list-adguard.txt"),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            }),
        );

        assert!(summary.has_fatal());
        assert_eq!(summary.total_processed(), 3);

        let text = summary.render();
        assert!(text.contains("out/list-ublock_origin.txt\n"));
        assert!(text.contains("   Efficiency: 75.0%\n"));
        assert!(text.contains("   Network filters: 2\n"));
        assert!(text.contains("   Other: 0\n"));
        assert!(text.contains("Total files generated: 1\n"));
        assert!(text.contains(
            "   adguard [WRITE_FAILED]: failed to write 'out/list-adguard.txt': disk full\n"
        ));
    }

    #[test]
    fn scope_follows_error_kind() {
        let write = TargetFailure::new(
            "adguard",
            &GeneratorError::Write {
                path: PathBuf::from("out/list-adguard.txt"),
                source: io::Error::new(io::ErrorKind::Other, "disk full"),
            },
        );
        assert_eq!(write.scope, FailureScope::Target);

        let mut summary = RunSummary::default();
        summary.failures.push(write);
        assert!(summary.has_fatal());
        assert!(!summary.run_aborted());

        summary.record(
            "run",
            Err(GeneratorError::ValidationFailed {
                errors: vec!["Line 2: contains a NUL byte".to_string()],
            }),
        );
        assert_eq!(summary.failures[1].scope, FailureScope::Run);
        assert!(summary.run_aborted());
        assert!(summary
            .render()
            .starts_with("Run aborted, no files were generated\n"));
    }

    #[test]
    fn empty_summary_is_not_fatal() {
        let summary = RunSummary::default();
        assert!(!summary.has_fatal());
        assert_eq!(summary.render(), "No files were generated\n");
    }

    #[test]
    fn efficiency_handles_empty_input() {
        assert_eq!(efficiency(0, 0), "n/a");
        assert_eq!(efficiency(1, 3), "33.3%");
    }
}
