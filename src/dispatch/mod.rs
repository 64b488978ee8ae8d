//! Batched certificate generation and delivery.

pub mod dispatcher;
pub mod mail;
pub mod placeholders;

pub use dispatcher::{DispatchEvent, DispatchSettings, Dispatcher, RowSelection};
pub use mail::{OutgoingMail, RetryPolicy, SmtpMailer, TransportError};
pub use placeholders::MailTemplate;

use std::time::Duration;
use thiserror::Error;

/// Failures that stop a run before its first block.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("SMTP credentials are not configured: set smtp.username and smtp.password")]
    TransportNotConfigured,

    #[error("Block size must be at least 1")]
    InvalidBlockSize,

    #[error("Row selection {from}..{to} is outside the dataset (1..{len})")]
    SelectionOutOfRange { from: usize, to: usize, len: usize },
}

/// Sends one email; retries of transient failures happen inside `send`.
pub trait MailTransport {
    fn is_configured(&self) -> bool;
    fn send(&self, mail: &OutgoingMail<'_>) -> Result<(), TransportError>;
}

/// Blocking wait between blocks and between retries.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Real pause: blocks the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
