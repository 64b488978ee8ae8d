//! Cell normalization: sentinels, email extraction, time shapes, categories.
//!
//! Every rule table is evaluated first-match-wins and every function falls
//! back to the original value, so normalization never fails. Rejecting a
//! value is the validator's job.

use crate::models::TrainingPath;
use crate::models::field::{Field, is_blank_or_sentinel};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Sub-domain whose addresses get the stricter `xx.name@` pattern.
pub const DEFAULT_INSTITUTIONAL_DOMAIN: &str = "stud.uniroma3.it";

/// Characters allowed in the local part of an address.
const LOCAL_CHARS: &str = r"a-zA-ZàèéìòóùÀÈÉÌÒÓÙ0-9._%+\-";

const GENERAL_EMAIL: &str =
    r"[a-zA-ZàèéìòóùÀÈÉÌÒÓÙ0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}";

struct TimeRule {
    pattern: Regex,
    transform: fn(&Captures) -> String,
}

static TIME_RULES: LazyLock<Vec<TimeRule>> = LazyLock::new(|| {
    vec![
        // HH:MM
        TimeRule {
            pattern: Regex::new(r"^(\d{1,2}):(\d{2})$").expect("valid regex"),
            transform: |c| format!("{:0>2}:{}", &c[1], &c[2]),
        },
        // HH:MM:SS -> seconds dropped
        TimeRule {
            pattern: Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})$").expect("valid regex"),
            transform: |c| {
                let out = format!("{:0>2}:{}", &c[1], &c[2]);
                log::info!("Time '{}' converted to '{}' (seconds dropped)", &c[0], out);
                out
            },
        },
        // HH.MM
        TimeRule {
            pattern: Regex::new(r"^(\d{1,2})\.(\d{2})$").expect("valid regex"),
            transform: |c| format!("{:0>2}:{}", &c[1], &c[2]),
        },
        // HMM / HHMM
        TimeRule {
            pattern: Regex::new(r"^(\d{1,2})(\d{2})$").expect("valid regex"),
            transform: |c| format!("{:0>2}:{}", &c[1], &c[2]),
        },
    ]
});

/// Canonicalize a time-of-day string to `HH:MM` when its shape is known.
///
/// Shapes are recognized regardless of range: `25:99` stays `25:99` and is
/// rejected later by the validator.
pub fn normalize_time(raw: &str) -> String {
    let trimmed = raw.trim();
    TIME_RULES
        .iter()
        .find_map(|rule| {
            rule.pattern
                .captures(trimmed)
                .map(|caps| (rule.transform)(&caps))
        })
        .unwrap_or_else(|| raw.to_string())
}

/// One email pattern: a search form and an anchored form.
///
/// The search form only matches a whole address: the match must not be
/// preceded by a local-part character.
#[derive(Debug, Clone)]
struct EmailRule {
    search: Regex,
    exact: Regex,
}

impl EmailRule {
    fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            search: Regex::new(&format!("(?:^|[^{LOCAL_CHARS}])({pattern})"))?,
            exact: Regex::new(&format!("^(?:{pattern})$"))?,
        })
    }

    fn find<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.search
            .captures(raw)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Ordered email patterns: institutional sub-domains first, then the
/// general pattern.
#[derive(Debug, Clone)]
pub struct EmailRules {
    rules: Vec<EmailRule>,
}

impl Default for EmailRules {
    fn default() -> Self {
        Self::new(&[DEFAULT_INSTITUTIONAL_DOMAIN.to_string()])
    }
}

impl EmailRules {
    /// Domains that fail to build a pattern are skipped with a warning.
    pub fn new(institutional_domains: &[String]) -> Self {
        let mut rules: Vec<EmailRule> = institutional_domains
            .iter()
            .filter(|d| !d.trim().is_empty())
            .filter_map(|domain| {
                let pattern = format!(
                    r"[a-zA-Z]{{2,3}}\.[a-zA-Z0-9_\-]+@{}\b",
                    regex::escape(domain.trim())
                );
                EmailRule::new(&pattern)
                    .inspect_err(|e| log::warn!("Skipping institutional domain '{domain}': {e}"))
                    .ok()
            })
            .collect();

        if let Ok(general) = EmailRule::new(GENERAL_EMAIL) {
            rules.push(general);
        }

        Self { rules }
    }

    /// First address found in `raw`, preferring institutional matches.
    pub fn extract<'a>(&self, raw: &'a str) -> Option<&'a str> {
        self.rules.iter().find_map(|rule| rule.find(raw))
    }

    /// True when `value` is exactly one address matching any rule.
    pub fn is_valid(&self, value: &str) -> bool {
        let v = value.trim();
        self.rules.iter().any(|rule| rule.exact.is_match(v))
    }
}

/// Maps a raw cell plus its column to a canonical value.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    email_rules: EmailRules,
}

impl Normalizer {
    pub fn new(email_rules: EmailRules) -> Self {
        Self { email_rules }
    }

    pub fn email_rules(&self) -> &EmailRules {
        &self.email_rules
    }

    /// `None` means the cell was absent.
    ///
    /// Optional fields always come back as `Some`, with blank and `--`
    /// turned into an empty string. Essential fields keep blanks and
    /// sentinels untouched so the validator can report them.
    pub fn normalize(&self, value: Option<&str>, field: Field) -> Option<String> {
        if field.is_optional() {
            return Some(match value {
                Some(v) if !is_blank_or_sentinel(v) => v.to_string(),
                _ => String::new(),
            });
        }

        let v = value?;
        if is_blank_or_sentinel(v) {
            return Some(v.to_string());
        }

        Some(match field {
            Field::Email => self.normalize_email(v),
            Field::StartTime | Field::EndTime => normalize_time(v),
            Field::Category => normalize_category(v),
            _ => v.to_string(),
        })
    }

    pub fn normalize_email(&self, raw: &str) -> String {
        self.email_rules
            .extract(raw)
            .map(str::to_string)
            .unwrap_or_else(|| raw.to_string())
    }
}

/// Replace a recognized alias with its label; unknown labels pass through.
pub fn normalize_category(raw: &str) -> String {
    TrainingPath::parse(raw)
        .map(|p| p.label().to_string())
        .unwrap_or_else(|| raw.to_string())
}
