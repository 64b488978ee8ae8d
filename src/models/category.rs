//! Training-path categories and their alias spellings.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

static ABBR_ALLEGATO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"all\.\s*").expect("valid regex"));
static ABBR_ARTICOLO: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"art\.\s*").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TrainingPath {
    PeF60,
    PeF30Allegato2,
    PeF36,
    PeF30Articolo13,
}

/// Normalized keys accepted for each path. Historical spellings included.
const ALIASES: &[(&str, TrainingPath)] = &[
    ("pef60", TrainingPath::PeF60),
    ("pef60allegato1", TrainingPath::PeF60),
    ("pef30", TrainingPath::PeF30Allegato2),
    ("pef30allegato2", TrainingPath::PeF30Allegato2),
    ("pef36", TrainingPath::PeF36),
    ("pef36allegato5", TrainingPath::PeF36),
    ("pef30articolo13", TrainingPath::PeF30Articolo13),
    ("pef30allegato2articolo13", TrainingPath::PeF30Articolo13),
];

impl TrainingPath {
    pub const ALL: [TrainingPath; 4] = [
        TrainingPath::PeF60,
        TrainingPath::PeF30Allegato2,
        TrainingPath::PeF36,
        TrainingPath::PeF30Articolo13,
    ];

    /// Canonical key, e.g. `PeF30-allegato2`.
    pub fn canonical(&self) -> &'static str {
        match self {
            TrainingPath::PeF60 => "PeF60",
            TrainingPath::PeF30Allegato2 => "PeF30-allegato2",
            TrainingPath::PeF36 => "PeF36",
            TrainingPath::PeF30Articolo13 => "PeF30-articolo13",
        }
    }

    /// Label written into normalized records and offered in templates.
    pub fn label(&self) -> &'static str {
        match self {
            TrainingPath::PeF60 => "PeF60 CFU",
            TrainingPath::PeF30Allegato2 => "PeF30 CFU all.2",
            TrainingPath::PeF36 => "PeF36 CFU",
            TrainingPath::PeF30Articolo13 => "PeF30 CFU (art. 13)",
        }
    }

    /// Long form printed on certificates.
    pub fn full_label(&self) -> &'static str {
        match self {
            TrainingPath::PeF60 => "PeF60 CFU (allegato 1 al DPCM 4 agosto 2023)",
            TrainingPath::PeF30Allegato2 => "PeF30 CFU (allegato 2 al DPCM 4 agosto 2023)",
            TrainingPath::PeF36 => "PeF36 CFU (allegato 5 al DPCM 4 agosto 2023)",
            TrainingPath::PeF30Articolo13 => "PeF30 CFU (art. 13 del DPCM 4 agosto 2023)",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let key = category_key(raw);
        ALIASES
            .iter()
            .find(|(alias, _)| *alias == key)
            .map(|(_, path)| *path)
    }
}

impl fmt::Display for TrainingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reduce a category label to its comparison key.
///
/// Parentheses are dropped, `all.` becomes `allegato`, `art.` becomes
/// `articolo` (even when glued to the previous word), the `CFU` unit and
/// every separator are removed: `"PeF30 CFU (art. 13)"` -> `"pef30articolo13"`.
pub fn category_key(raw: &str) -> String {
    let lower = raw.trim().to_lowercase().replace(['(', ')'], " ");
    let expanded = ABBR_ALLEGATO.replace_all(&lower, "allegato");
    let expanded = ABBR_ARTICOLO.replace_all(&expanded, "articolo");

    expanded
        .replace("cfu", "")
        .chars()
        .filter(|c| c.is_alphanumeric())
        .collect()
}
