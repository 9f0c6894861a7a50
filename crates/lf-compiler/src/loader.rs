//! Source loading and validation.
//!
//! Individual odd rules only ever produce warnings. Errors are reserved for
//! structural problems with the source itself (bytes that are not text), and
//! any error fails the whole load.

use std::fs;
use std::path::Path;

use lf_core::normalize::{is_normalized, normalize_rule};

use crate::error::GeneratorError;
use crate::runlog::RunLog;

/// Rules longer than this are flagged.
pub const MAX_RULE_LENGTH: usize = 8000;

const WARNING_REPORT_LIMIT: usize = 5;
const ERROR_REPORT_LIMIT: usize = 3;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    pub valid_rules: Vec<String>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    fn check_line(&mut self, line_no: usize, raw: &str) {
        if raw.trim().is_empty() {
            return;
        }

        let rule = if is_normalized(raw) {
            raw.to_string()
        } else {
            normalize_rule(raw)
        };

        let length = rule.chars().count();
        if length > MAX_RULE_LENGTH {
            self.warnings
                .push(format!("Line {line_no}: Rule is very long ({length} characters)"));
        }
        if rule.contains("##") && rule.contains("#@#") {
            self.warnings
                .push(format!("Line {line_no}: Rule contains both hiding and exception syntax"));
        }

        self.valid_rules.push(rule);
    }
}

/// Validate already-split lines. Line numbers in messages are 1-based
/// positions in `lines`.
pub fn validate_rules<S: AsRef<str>>(lines: &[S]) -> ValidationResult {
    let mut result = ValidationResult::default();
    for (idx, line) in lines.iter().enumerate() {
        result.check_line(idx + 1, line.as_ref());
    }
    result
}

/// Validate a whole source text.
pub fn load_text(raw: &str) -> ValidationResult {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let lines: Vec<&str> = raw.lines().collect();
    validate_rules(&lines)
}

/// Validate raw bytes. Lines that are not UTF-8 text are errors.
pub fn load_bytes(raw: &[u8]) -> ValidationResult {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let mut result = ValidationResult::default();

    for (idx, line) in raw.split(|b| *b == b'\n').enumerate() {
        let line_no = idx + 1;
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        match std::str::from_utf8(line) {
            Ok(text) if text.contains('\0') => {
                result.errors.push(format!("Line {line_no}: contains a NUL byte"));
            }
            Ok(text) => result.check_line(line_no, text),
            Err(e) => result.errors.push(format!(
                "Line {line_no}: not valid UTF-8 (after byte {})",
                e.valid_up_to()
            )),
        }
    }

    result
}

/// Read, validate and report on a rule source.
pub fn load(path: &Path, log: &dyn RunLog) -> Result<Vec<String>, GeneratorError> {
    log.info(&format!("Loading rules from: {}", path.display()));

    let bytes = fs::read(path).map_err(|source| GeneratorError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;

    let result = load_bytes(&bytes);
    report(&result, log);

    if !result.is_ok() {
        return Err(GeneratorError::ValidationFailed {
            errors: result.errors,
        });
    }

    log.info(&format!("Successfully loaded {} rules", result.valid_rules.len()));
    Ok(result.valid_rules)
}

/// Surface warnings and errors, capped so huge sources don't flood the log.
pub fn report(result: &ValidationResult, log: &dyn RunLog) {
    if !result.warnings.is_empty() {
        log.warn(&format!(
            "Found {} warnings during validation",
            result.warnings.len()
        ));
        for warning in result.warnings.iter().take(WARNING_REPORT_LIMIT) {
            log.warn(warning);
        }
        if result.warnings.len() > WARNING_REPORT_LIMIT {
            log.warn(&format!(
                "... and {} more warnings",
                result.warnings.len() - WARNING_REPORT_LIMIT
            ));
        }
    }

    if !result.errors.is_empty() {
        log.error(&format!(
            "Found {} errors during validation",
            result.errors.len()
        ));
        for error in result.errors.iter().take(ERROR_REPORT_LIMIT) {
            log.error(error);
        }
        if result.errors.len() > ERROR_REPORT_LIMIT {
            log.error(&format!(
                "... and {} more errors",
                result.errors.len() - ERROR_REPORT_LIMIT
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use log::Level;

    use super::*;
    use crate::runlog::MemoryLog;

    #[test]
    fn drops_blank_lines_and_normalizes() {
        let result = load_text("! Title: x\n\n   \n  ||ads.example.com^  \r\nexample.com##div   .ad\n");
        assert!(result.is_ok());
        assert!(result.warnings.is_empty());
        assert_eq!(
            result.valid_rules,
            vec!["! Title: x", "||ads.example.com^", "example.com##div .ad"]
        );
    }

    #[test]
    fn warns_without_rejecting() {
        let long = format!("||{}.com^", "a".repeat(MAX_RULE_LENGTH));
        let lines = vec![long.clone(), "example.com##.ad #@# .b".to_string()];
        let result = validate_rules(&lines);

        assert!(result.is_ok());
        assert_eq!(result.valid_rules.len(), 2);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].starts_with("Line 1: Rule is very long"));
        assert_eq!(
            result.warnings[1],
            "Line 2: Rule contains both hiding and exception syntax"
        );
    }

    #[test]
    fn text_warnings_use_source_line_numbers() {
        let result = load_text("! x\n\nx.com##.a #@# .b\n");
        assert_eq!(
            result.warnings,
            vec!["Line 3: Rule contains both hiding and exception syntax"]
        );
    }

    #[test]
    fn rule_at_threshold_is_not_flagged() {
        let exact = "a".repeat(MAX_RULE_LENGTH);
        let result = validate_rules(&[exact]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn binary_lines_are_errors() {
        let mut raw = b"||ok.example.com^\n".to_vec();
        raw.extend_from_slice(b"\xff\xfe broken\n");
        raw.extend_from_slice(b"a\0b\n");
        let result = load_bytes(&raw);

        assert!(!result.is_ok());
        assert_eq!(result.valid_rules, vec!["||ok.example.com^"]);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].starts_with("Line 2: not valid UTF-8"));
        assert_eq!(result.errors[1], "Line 3: contains a NUL byte");
    }

    #[test]
    fn byte_order_mark_is_stripped() {
        let result = load_bytes(b"\xEF\xBB\xBF! Title: bom\n");
        assert_eq!(result.valid_rules, vec!["! Title: bom"]);
        assert_eq!(load_text("\u{feff}||a.com^").valid_rules, vec!["||a.com^"]);
    }

    #[test]
    fn load_reads_file_and_caps_warning_output() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        for _ in 0..7 {
            writeln!(file, "x.com##.a #@# .b").expect("write rule");
        }
        writeln!(file, "||ads.example.com^").expect("write rule");

        let log = MemoryLog::new();
        let rules = load(file.path(), &log).expect("load succeeds");
        assert_eq!(rules.len(), 8);

        let warnings = log.messages_at(Level::Warn);
        // summary line + 5 shown + suppressed note
        assert_eq!(warnings.len(), 7);
        assert_eq!(warnings[0], "Found 7 warnings during validation");
        assert_eq!(warnings[6], "... and 2 more warnings");
    }

    #[test]
    fn missing_source_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load(&dir.path().join("missing.txt"), &MemoryLog::new())
            .expect_err("missing file fails");
        assert_eq!(err.code(), "SOURCE_UNAVAILABLE");
    }

    #[test]
    fn structural_errors_fail_the_load() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"||a.com^\n\xc3\x28\n").expect("write bytes");

        let log = MemoryLog::new();
        let err = load(file.path(), &log).expect_err("invalid UTF-8 fails");
        match err {
            GeneratorError::ValidationFailed { errors } => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(log.messages_at(Level::Error).len(), 2);
    }
}
