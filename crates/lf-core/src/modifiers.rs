//! `$option` parsing for network filters.
//!
//! Two flavours: [`parse_rule_modifiers`] is lenient and never fails, which
//! is what reporting and quick checks want; [`Modifiers::parse`] is strict
//! and rejects malformed option lists so rewriting code can refuse to touch
//! them.

use std::collections::BTreeMap;

use crate::classify::classify;
use crate::types::RuleCategory;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModifierError {
    #[error("option list after '$' is empty")]
    DanglingSeparator,
    #[error("empty option at position {index}")]
    EmptyOption { index: usize },
}

/// Options after the first `$`, trimmed, with empty entries dropped.
pub fn parse_rule_modifiers(rule: &str) -> Vec<&str> {
    let Some((_, options)) = split_options(rule) else {
        return Vec::new();
    };
    options
        .split(',')
        .map(str::trim)
        .filter(|option| !option.is_empty())
        .collect()
}

/// Exact match against the lenient option list.
pub fn has_rule_modifier(rule: &str, modifier: &str) -> bool {
    parse_rule_modifiers(rule).contains(&modifier)
}

fn split_options(rule: &str) -> Option<(&str, &str)> {
    rule.find('$').map(|pos| (&rule[..pos], &rule[pos + 1..]))
}

/// A single `name[=value]` option, possibly negated with `~`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifierOption<'a>(&'a str);

impl<'a> ModifierOption<'a> {
    pub fn as_str(&self) -> &'a str {
        self.0
    }

    pub fn is_negated(&self) -> bool {
        self.0.starts_with('~')
    }

    /// Option name without the `~` prefix or `=value` suffix.
    pub fn name(&self) -> &'a str {
        let raw = self.0.strip_prefix('~').unwrap_or(self.0);
        match raw.find('=') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
    }

    pub fn value(&self) -> Option<&'a str> {
        self.0.find('=').map(|pos| &self.0[pos + 1..])
    }
}

/// Strictly parsed network filter: pattern plus its option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifiers<'a> {
    pattern: &'a str,
    options: Vec<ModifierOption<'a>>,
}

impl<'a> Modifiers<'a> {
    /// Parse the option list of a network filter.
    ///
    /// Returns `Ok(None)` when the rule is not a network filter or carries no
    /// `$` at all.
    pub fn parse(rule: &'a str) -> Result<Option<Self>, ModifierError> {
        if classify(rule) != RuleCategory::NetworkFilter {
            return Ok(None);
        }
        let Some((pattern, text)) = split_options(rule) else {
            return Ok(None);
        };
        if text.trim().is_empty() {
            return Err(ModifierError::DanglingSeparator);
        }

        let mut options = Vec::new();
        for (index, raw) in text.split(',').enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(ModifierError::EmptyOption { index });
            }
            options.push(ModifierOption(raw));
        }

        Ok(Some(Self { pattern, options }))
    }

    pub fn options(&self) -> &[ModifierOption<'a>] {
        &self.options
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.iter().any(|opt| opt.name().eq_ignore_ascii_case(name))
    }

    /// Remove every option called `name`. Returns how many were removed.
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.options.len();
        self.options.retain(|opt| !opt.name().eq_ignore_ascii_case(name));
        before - self.options.len()
    }

    /// Rebuild the rule text. The `$` is omitted when no option is left.
    pub fn render(&self) -> String {
        if self.options.is_empty() {
            return self.pattern.to_string();
        }
        let mut out = String::with_capacity(self.pattern.len() + 16);
        out.push_str(self.pattern);
        out.push('$');
        for (i, opt) in self.options.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(opt.as_str());
        }
        out
    }
}

/// How one option name is used across a rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionUsage {
    pub count: usize,
    pub negated: usize,
    pub with_value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModifierUsage {
    /// Keyed by lower-cased option name.
    pub options: BTreeMap<String, OptionUsage>,
    /// Network filters whose option list failed strict parsing.
    pub malformed: usize,
}

pub fn modifier_usage<S: AsRef<str>>(rules: &[S]) -> ModifierUsage {
    let mut usage = ModifierUsage::default();
    for rule in rules {
        let parsed = match Modifiers::parse(rule.as_ref()) {
            Ok(Some(parsed)) => parsed,
            Ok(None) => continue,
            Err(_) => {
                usage.malformed += 1;
                continue;
            }
        };
        for opt in parsed.options() {
            let entry = usage
                .options
                .entry(opt.name().to_ascii_lowercase())
                .or_default();
            entry.count += 1;
            if opt.is_negated() {
                entry.negated += 1;
            }
            if opt.value().is_some() {
                entry.with_value += 1;
            }
        }
    }
    usage
}
