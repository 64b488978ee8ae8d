//! SMTP delivery with a bounded retry on connection failures.

use crate::config::SmtpConfig;
use crate::dispatch::{MailTransport, Pause, ThreadSleep};
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::Error as SmtpError;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// One outgoing message.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingMail<'a> {
    pub to: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
    pub attachment: Option<&'a Path>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("SMTP credentials are not configured")]
    NotConfigured,

    #[error("Connection error with SMTP server {server}: {reason}")]
    Connection { server: String, reason: String },

    #[error(
        "Authentication error: {0}. Check the credentials (Outlook and Gmail may require an app password)"
    )]
    Authentication(String),

    #[error("SMTP error: {0}")]
    Protocol(String),

    #[error("Invalid message: {0}")]
    Message(String),
}

impl TransportError {
    /// Only connection-class failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, TransportError::Connection { .. })
    }
}

/// Bounded retry with a growing delay: `initial_delay`, then
/// `initial_delay + step`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub initial_delay: Duration,
    pub step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 2,
            initial_delay: Duration::from_secs(3),
            step: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.initial_delay + self.step * attempt
    }

    pub fn run<F>(&self, pauser: &mut dyn Pause, mut op: F) -> Result<(), TransportError>
    where
        F: FnMut() -> Result<(), TransportError>,
    {
        let mut attempt = 0;
        loop {
            match op() {
                Ok(()) => return Ok(()),
                Err(e) if e.is_retryable() && attempt < self.retries => {
                    let delay = self.delay_for(attempt);
                    log::warn!("{e}; retrying in {}s", delay.as_secs());
                    pauser.pause(delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Map a lettre error onto the retry classes.
pub fn classify(server: &str, err: &SmtpError) -> TransportError {
    if err.is_timeout() || err.is_transient() {
        return TransportError::Connection {
            server: server.to_string(),
            reason: err.to_string(),
        };
    }

    if let Some(code) = err.status()
        && code.to_string().starts_with("53")
    {
        return TransportError::Authentication(err.to_string());
    }

    if err.is_permanent() || err.is_response() || err.is_client() {
        return TransportError::Protocol(err.to_string());
    }

    TransportError::Connection {
        server: server.to_string(),
        reason: err.to_string(),
    }
}

pub struct SmtpMailer {
    settings: SmtpConfig,
    policy: RetryPolicy,
}

impl SmtpMailer {
    pub fn new(settings: SmtpConfig, policy: RetryPolicy) -> Self {
        Self { settings, policy }
    }

    fn transport(&self) -> Result<SmtpTransport, TransportError> {
        let s = &self.settings;
        let builder = match (s.port, s.use_tls) {
            (465, _) => SmtpTransport::relay(&s.server),
            (_, true) => SmtpTransport::starttls_relay(&s.server),
            (_, false) => Ok(SmtpTransport::builder_dangerous(&s.server)),
        };
        let builder = builder.map_err(|e| classify(&s.server, &e))?;

        Ok(builder
            .port(s.port)
            .credentials(Credentials::new(s.username.clone(), s.password.clone()))
            .timeout(Some(SMTP_TIMEOUT))
            .build())
    }

    pub fn build_message(&self, mail: &OutgoingMail<'_>) -> Result<Message, TransportError> {
        let from: Mailbox = self
            .settings
            .username
            .parse()
            .map_err(|e| TransportError::Message(format!("sender address: {e}")))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|e| TransportError::Message(format!("recipient '{}': {e}", mail.to)))?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject)
            .date_now();

        if !self.settings.reply_to.trim().is_empty() {
            let reply_to: Mailbox = self
                .settings
                .reply_to
                .trim()
                .parse()
                .map_err(|e| TransportError::Message(format!("reply-to address: {e}")))?;
            builder = builder.reply_to(reply_to);
        }

        let text = SinglePart::plain(mail.body.to_string());

        let message = match mail.attachment.filter(|p| p.exists()) {
            Some(path) => {
                let bytes = fs::read(path)
                    .map_err(|e| TransportError::Message(format!("{}: {e}", path.display())))?;
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "attestato.pdf".to_string());
                let content_type = ContentType::parse("application/pdf")
                    .map_err(|e| TransportError::Message(e.to_string()))?;
                let attachment = Attachment::new(filename).body(bytes, content_type);

                builder.multipart(MultiPart::mixed().singlepart(text).singlepart(attachment))
            }
            None => builder.singlepart(text),
        };

        message.map_err(|e| TransportError::Message(e.to_string()))
    }

    /// Probe the server and the credentials without sending anything.
    pub fn check_connection(&self) -> Result<(), TransportError> {
        let transport = self.transport()?;
        match transport.test_connection() {
            Ok(true) => Ok(()),
            Ok(false) => Err(TransportError::Connection {
                server: self.settings.server.clone(),
                reason: "server did not answer".to_string(),
            }),
            Err(e) => Err(classify(&self.settings.server, &e)),
        }
    }
}

impl MailTransport for SmtpMailer {
    fn is_configured(&self) -> bool {
        self.settings.has_credentials()
    }

    fn send(&self, mail: &OutgoingMail<'_>) -> Result<(), TransportError> {
        if !self.is_configured() {
            return Err(TransportError::NotConfigured);
        }

        let message = self.build_message(mail)?;
        let transport = self.transport()?;
        let server = self.settings.server.as_str();

        self.policy.run(&mut ThreadSleep, || {
            transport
                .send(&message)
                .map(|_| ())
                .map_err(|e| classify(server, &e))
        })?;

        log::info!("Email sent to {}", mail.to);
        Ok(())
    }
}
