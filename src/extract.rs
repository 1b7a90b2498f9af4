//! Series-name and issue-number extraction from catalog titles.
//!
//! Both extractors are ordered rule tables. Rules run top to bottom; adding a
//! title convention means adding a row, not another branch.
use regex::Regex;
use std::sync::OnceLock;

/// A suffix or fragment removed from a title when deriving the series name.
struct StripRule {
    name: &'static str,
    pattern: &'static str,
}

/// A pattern whose first capture group is an issue number.
struct IssueRule {
    name: &'static str,
    pattern: &'static str,
}

// The year parenthetical must go before the `#number` strip so that
// "Spider-Man (2016) #6" reduces to "Spider-Man".
const SERIES_STRIP_RULES: &[StripRule] = &[
    StripRule {
        name: "year_range",
        pattern: r"\s*\(\d{4}\s*-?\s*\d*\)",
    },
    StripRule {
        name: "hash_number",
        pattern: r"\s*#\d+.*$",
    },
    StripRule {
        name: "volume",
        pattern: r"(?i)\s*vol(?:\.|ume)?\s*\d+.*$",
    },
    StripRule {
        name: "issue",
        pattern: r"(?i)\s*issue\s*\d+.*$",
    },
    StripRule {
        name: "variant",
        pattern: r"(?i)\s*\([^)]*variant[^)]*\)",
    },
];

const VOLUME_ISSUE_PATTERN: &str = r"#?(\d+)";

const TITLE_ISSUE_RULES: &[IssueRule] = &[
    IssueRule {
        name: "hash_number",
        pattern: r"#(\d+)",
    },
    IssueRule {
        name: "volume",
        pattern: r"(?i)vol\.?\s*(\d+)",
    },
    IssueRule {
        name: "issue",
        pattern: r"(?i)issue\s*(\d+)",
    },
    IssueRule {
        name: "year_then_number",
        pattern: r"\(\d{4}\)\s*#?(\d+)",
    },
];

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|err| panic!("invalid built-in pattern {pattern:?}: {err}"))
}

fn series_rules() -> &'static [(&'static str, Regex)] {
    static RULES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        SERIES_STRIP_RULES
            .iter()
            .map(|rule| (rule.name, compile(rule.pattern)))
            .collect()
    })
}

fn issue_rules() -> &'static [(&'static str, Regex)] {
    static RULES: OnceLock<Vec<(&'static str, Regex)>> = OnceLock::new();
    RULES.get_or_init(|| {
        TITLE_ISSUE_RULES
            .iter()
            .map(|rule| (rule.name, compile(rule.pattern)))
            .collect()
    })
}

fn volume_rule() -> &'static Regex {
    static RULE: OnceLock<Regex> = OnceLock::new();
    RULE.get_or_init(|| compile(VOLUME_ISSUE_PATTERN))
}

/// Reduce a full comic title to its series name.
///
/// `"Amazing Spider-Man (2016) #6"` becomes `"Amazing Spider-Man"`.
pub fn extract_series_name(title: &str) -> String {
    let mut cleaned = title.to_string();
    for (_, rule) in series_rules() {
        cleaned = rule.replace_all(&cleaned, "").into_owned();
    }
    cleaned.trim().to_string()
}

/// Find the issue number, preferring the `volume` field over the title.
///
/// The first rule that finds digits decides. A digit run too large for an
/// issue number yields `None` instead of falling through to later rules.
pub fn extract_issue_number(title: &str, volume: &str) -> Option<u32> {
    if let Some(digits) = captured_digits(volume_rule(), volume) {
        return parse_issue(digits, "volume_field");
    }
    issue_rules().iter().find_map(|(name, rule)| {
        let digits = captured_digits(rule, title)?;
        tracing::trace!(rule = *name, digits, "issue number from title");
        Some(parse_issue(digits, name))
    })?
}

fn captured_digits<'t>(rule: &Regex, text: &'t str) -> Option<&'t str> {
    if text.is_empty() {
        return None;
    }
    Some(rule.captures(text)?.get(1)?.as_str())
}

fn parse_issue(digits: &str, rule: &str) -> Option<u32> {
    match digits.parse() {
        Ok(number) => Some(number),
        Err(err) => {
            tracing::debug!(rule, digits, error = %err, "issue number out of range");
            None
        }
    }
}
