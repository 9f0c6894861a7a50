//! Whitespace normalization for rule lines.

/// Trim a rule and collapse every internal whitespace run to a single space.
///
/// ```
/// use lf_core::normalize::normalize_rule;
///
/// assert_eq!(normalize_rule("  ||ads.example.com^ \t$script  "), "||ads.example.com^ $script");
/// ```
pub fn normalize_rule(rule: &str) -> String {
    let mut out = String::with_capacity(rule.len());
    for part in rule.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}

/// True when `rule` is already in normalized form.
pub fn is_normalized(rule: &str) -> bool {
    let mut prev_space = true;
    for ch in rule.chars() {
        if ch.is_whitespace() {
            if ch != ' ' || prev_space {
                return false;
            }
            prev_space = true;
        } else {
            prev_space = false;
        }
    }
    !prev_space || rule.is_empty()
}
