use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Certificate wording to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateVariant {
    /// Lesson held in a room of a department
    #[default]
    #[serde(alias = "presenza")]
    #[value(alias = "presenza")]
    InPerson,
    /// Synchronous online lesson
    #[serde(alias = "telematico")]
    #[value(alias = "telematico")]
    Remote,
    /// Text taken from the configuration file
    #[serde(alias = "personalizzato")]
    #[value(alias = "personalizzato")]
    Custom,
}

impl TemplateVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateVariant::InPerson => "in-person",
            TemplateVariant::Remote => "remote",
            TemplateVariant::Custom => "custom",
        }
    }
}

impl fmt::Display for TemplateVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
