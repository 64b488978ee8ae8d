//! `{name}` placeholder substitution for email and certificate texts.

use crate::config::{Config, InstitutionConfig};
use crate::models::Record;
use regex::{Captures, Regex};
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid regex"));

/// Replace every known `{key}`; unknown placeholders are kept verbatim.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(k, _)| *k == &caps[1])
                .map(|(_, v)| v.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Office, director and (when set) the lecturer, one per line.
pub fn signer_block(institution: &InstitutionConfig) -> String {
    let mut lines = vec![institution.office.clone(), institution.director.clone()];
    if !institution.lecturer.trim().is_empty() {
        lines.push(format!("Prof. {}", institution.lecturer.trim()));
    }
    lines.retain(|l| !l.trim().is_empty());
    lines.join("\n")
}

/// Subject and body personalised per record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailTemplate {
    pub subject: String,
    pub body: String,
    pub signer: String,
    pub university: String,
}

impl MailTemplate {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            subject: cfg.email.subject.clone(),
            body: cfg.email.body.clone(),
            signer: signer_block(&cfg.institution),
            university: cfg.institution.university.clone(),
        }
    }

    /// (subject, body) for one recipient.
    pub fn personalise(&self, record: &Record) -> (String, String) {
        let values = [
            ("nome_cognome", record.full_name.trim()),
            ("data", record.date.as_str()),
            ("firmatario", self.signer.as_str()),
            ("universita", self.university.as_str()),
        ];
        (fill(&self.subject, &values), fill(&self.body, &values))
    }
}
