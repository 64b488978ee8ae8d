use crate::dispatch::RetryPolicy;
use crate::errors::{AppError, AppResult};
use crate::ingest::EmailRules;
use crate::ingest::normalizer::DEFAULT_INSTITUTIONAL_DOMAIN;
use crate::models::TemplateVariant;
use crate::utils::path::expand_tilde;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_EMAIL_SUBJECT: &str = "Attestato di Presenza - Percorso di formazione DPCM";

pub const DEFAULT_EMAIL_BODY: &str = "Gentile {nome_cognome},

In allegato trova l'attestato di presenza relativo alla lezione del {data}.

Cordiali saluti,
{firmatario}
{universita}
";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InstitutionConfig {
    pub university: String,
    pub office: String,
    pub director: String,
    /// Optional lecturer added to the signer block.
    pub lecturer: String,
    pub city: String,
}

impl Default for InstitutionConfig {
    fn default() -> Self {
        Self {
            university: "Università degli Studi Roma Tre".to_string(),
            office: "Centro CAFIS".to_string(),
            director: "Prof. Mario Rossi".to_string(),
            lecturer: String::new(),
            city: "Roma".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub use_tls: bool,
    pub reply_to: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            server: "smtp-mail.outlook.com".to_string(),
            port: 587,
            username: String::new(),
            password: String::new(),
            use_tls: true,
            reply_to: String::new(),
        }
    }
}

impl SmtpConfig {
    pub fn has_credentials(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmailConfig {
    pub subject: String,
    pub body: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            subject: DEFAULT_EMAIL_SUBJECT.to_string(),
            body: DEFAULT_EMAIL_BODY.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Emails sent before each pause.
    pub block_size: usize,
    pub pause_seconds: u64,
    pub retries: u32,
    pub retry_delay_seconds: u64,
    pub retry_delay_step_seconds: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            block_size: 10,
            pause_seconds: 5,
            retries: 2,
            retry_delay_seconds: 3,
            retry_delay_step_seconds: 2,
        }
    }
}

impl DispatchConfig {
    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_seconds)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            initial_delay: Duration::from_secs(self.retry_delay_seconds),
            step: Duration::from_secs(self.retry_delay_step_seconds),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificateConfig {
    pub template: TemplateVariant,
    /// Body used by the `custom` template.
    pub custom_text: String,
    pub logo: String,
    pub signature: String,
    pub output_dir: String,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            template: TemplateVariant::InPerson,
            custom_text: String::new(),
            logo: String::new(),
            signature: String::new(),
            output_dir: env::temp_dir()
                .join("attestati_temp")
                .to_string_lossy()
                .to_string(),
        }
    }
}

impl CertificateConfig {
    pub fn logo_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.logo)
    }

    pub fn signature_path(&self) -> Option<PathBuf> {
        non_empty_path(&self.signature)
    }

    pub fn output_path(&self) -> PathBuf {
        expand_tilde(&self.output_dir)
    }
}

fn non_empty_path(s: &str) -> Option<PathBuf> {
    let t = s.trim();
    (!t.is_empty()).then(|| expand_tilde(t))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Sub-domains whose addresses are preferred when extracting emails.
    pub institutional_domains: Vec<String>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            institutional_domains: vec![DEFAULT_INSTITUTIONAL_DOMAIN.to_string()],
        }
    }
}

impl ValidationConfig {
    pub fn email_rules(&self) -> EmailRules {
        EmailRules::new(&self.institutional_domains)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding the activity log.
    pub database: String,
    pub institution: InstitutionConfig,
    pub smtp: SmtpConfig,
    pub email: EmailConfig,
    pub dispatch: DispatchConfig,
    pub certificate: CertificateConfig,
    pub validation: ValidationConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: Self::database_file().to_string_lossy().to_string(),
            institution: InstitutionConfig::default(),
            smtp: SmtpConfig::default(),
            email: EmailConfig::default(),
            dispatch: DispatchConfig::default(),
            certificate: CertificateConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

/// Environment variables that override the file, as (variable, setter).
const ENV_OVERRIDES: &[(&str, fn(&mut Config, String))] = &[
    ("SMTP_SERVER", |c, v| c.smtp.server = v),
    ("SMTP_PORT", |c, v| {
        if let Ok(port) = v.trim().parse() {
            c.smtp.port = port;
        }
    }),
    ("SMTP_USERNAME", |c, v| c.smtp.username = v),
    ("SMTP_PASSWORD", |c, v| c.smtp.password = v),
    ("SMTP_REPLY_TO", |c, v| c.smtp.reply_to = v),
    ("EMAIL_SUBJECT", |c, v| c.email.subject = v),
    ("EMAIL_BODY", |c, v| c.email.body = v),
    ("DIRETTORE_CAFIS", |c, v| c.institution.director = v),
    ("DOCENTE_CORSO", |c, v| c.institution.lecturer = v),
];

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("rattestati")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".rattestati")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rattestati.conf")
    }

    /// Return the full path of the activity log database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rattestati.sqlite")
    }

    /// Load the default configuration file (defaults if missing) and apply
    /// environment overrides.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        let mut cfg = if path.exists() {
            let content = fs::read_to_string(path)?;
            serde_yaml::from_str(&content).map_err(|e| {
                AppError::Config(format!("cannot parse {}: {e}", path.display()))
            })?
        } else {
            Config::default()
        };

        cfg.apply_overrides(|key| env::var(key).ok());
        Ok(cfg)
    }

    /// Apply overrides from any key/value source (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, set) in ENV_OVERRIDES {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                set(self, value);
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_yaml::to_string(self)?)?;
        Ok(())
    }

    pub fn apply_provider(&mut self, provider: SmtpProvider) {
        if let Some((server, port, use_tls)) = provider.settings() {
            self.smtp.server = server.to_string();
            self.smtp.port = port;
            self.smtp.use_tls = use_tls;
        }
    }
}

/// Presets for common mail providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SmtpProvider {
    Gmail,
    Outlook,
    Libero,
    Custom,
}

impl SmtpProvider {
    /// (server, port, STARTTLS); `None` for custom.
    pub fn settings(&self) -> Option<(&'static str, u16, bool)> {
        match self {
            SmtpProvider::Gmail => Some(("smtp.gmail.com", 587, true)),
            SmtpProvider::Outlook => Some(("smtp-mail.outlook.com", 587, true)),
            SmtpProvider::Libero => Some(("smtp.libero.it", 465, true)),
            SmtpProvider::Custom => None,
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            SmtpProvider::Gmail => "Gmail requires an app password when 2-step verification is on",
            SmtpProvider::Outlook => "Outlook may require an app password",
            SmtpProvider::Libero => "Libero requires SMTP access to be enabled in the mailbox settings",
            SmtpProvider::Custom => "Set server, port and TLS manually in the configuration file",
        }
    }
}
