//! Sequential generate-then-send loop, grouped in blocks with pauses.
//!
//! Per record: `Pending -> RowInvalid | RenderFailed | Rendered`, and a
//! rendered record ends as `Generated` (sending disabled), `Sent` or
//! `SendFailed`. A single record never aborts the run.

use crate::dispatch::mail::OutgoingMail;
use crate::dispatch::placeholders::MailTemplate;
use crate::dispatch::{DispatchError, MailTransport, Pause};
use crate::ingest::EmailRules;
use crate::ingest::validator::validate_row;
use crate::models::{
    Dataset, DatasetRow, DispatchOutcome, DispatchReport, OutcomeStatus, TemplateVariant,
};
use crate::render::{CertificateAssets, CertificateRenderer, RenderRequest};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub const DEFAULT_BLOCK_SIZE: usize = 10;
pub const DEFAULT_PAUSE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    pub block_size: usize,
    pub pause: Duration,
    pub send_email: bool,
    pub variant: TemplateVariant,
    pub output_dir: PathBuf,
    pub assets: CertificateAssets,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            pause: DEFAULT_PAUSE,
            send_email: false,
            variant: TemplateVariant::InPerson,
            output_dir: std::env::temp_dir().join("attestati_temp"),
            assets: CertificateAssets::default(),
        }
    }
}

/// Which dataset rows to process. Positions are 1-based and inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSelection {
    All,
    First(usize),
    Range { from: usize, to: usize },
}

impl RowSelection {
    pub fn apply<'d>(&self, dataset: &'d Dataset) -> Result<&'d [DatasetRow], DispatchError> {
        let rows = dataset.rows();
        match *self {
            RowSelection::All => Ok(rows),
            RowSelection::First(n) => Ok(&rows[..n.min(rows.len())]),
            RowSelection::Range { from, to } => {
                if from == 0 || from > to || to > rows.len() {
                    return Err(DispatchError::SelectionOutOfRange {
                        from,
                        to,
                        len: rows.len(),
                    });
                }
                Ok(&rows[from - 1..to])
            }
        }
    }
}

/// Progress notifications for the caller.
#[derive(Debug)]
pub enum DispatchEvent<'a> {
    BlockStarted {
        block: usize,
        first: usize,
        last: usize,
        total: usize,
    },
    Outcome(&'a DispatchOutcome),
    Pausing(Duration),
}

type Observer<'a> = Box<dyn FnMut(&DispatchEvent<'_>) + 'a>;

pub struct Dispatcher<'a> {
    renderer: &'a dyn CertificateRenderer,
    transport: &'a dyn MailTransport,
    pauser: &'a mut dyn Pause,
    email_rules: &'a EmailRules,
    mail: MailTemplate,
    settings: DispatchSettings,
    cancel: Option<Arc<AtomicBool>>,
    observer: Option<Observer<'a>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        renderer: &'a dyn CertificateRenderer,
        transport: &'a dyn MailTransport,
        pauser: &'a mut dyn Pause,
        email_rules: &'a EmailRules,
        mail: MailTemplate,
        settings: DispatchSettings,
    ) -> Self {
        Self {
            renderer,
            transport,
            pauser,
            email_rules,
            mail,
            settings,
            cancel: None,
            observer: None,
        }
    }

    /// Flag checked before every row and after every pause.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn with_observer(mut self, observer: impl FnMut(&DispatchEvent<'_>) + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn notify(&mut self, event: DispatchEvent<'_>) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&event);
        }
    }

    fn cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }

    pub fn run(&mut self, rows: &[DatasetRow]) -> Result<DispatchReport, DispatchError> {
        if self.settings.block_size == 0 {
            return Err(DispatchError::InvalidBlockSize);
        }
        if self.settings.send_email && !self.transport.is_configured() {
            return Err(DispatchError::TransportNotConfigured);
        }

        let mut report = DispatchReport::default();
        let total = rows.len();
        let block_count = total.div_ceil(self.settings.block_size);

        for (block_idx, block) in rows.chunks(self.settings.block_size).enumerate() {
            let first = block_idx * self.settings.block_size + 1;
            self.notify(DispatchEvent::BlockStarted {
                block: block_idx + 1,
                first,
                last: first + block.len() - 1,
                total,
            });

            for row in block {
                if self.cancelled() {
                    log::warn!("Dispatch cancelled after {} records", report.total());
                    report.cancelled = true;
                    return Ok(report);
                }

                let outcome = self.process(row);
                self.notify(DispatchEvent::Outcome(&outcome));
                report.push(outcome);
            }

            if self.settings.send_email && block_idx + 1 < block_count {
                let pause = self.settings.pause;
                self.notify(DispatchEvent::Pausing(pause));
                self.pauser.pause(pause);
                report.pauses += 1;
            }
        }

        Ok(report)
    }

    fn process(&self, row: &DatasetRow) -> DispatchOutcome {
        let record = &row.record;
        let name = record.display_name().to_string();
        let outcome = |status: OutcomeStatus, message: String, artifact: Option<PathBuf>| {
            DispatchOutcome {
                row: row.row,
                name: name.clone(),
                email: record.email.clone(),
                status,
                message,
                artifact,
            }
        };

        if let Err(issue) = validate_row(record, self.email_rules) {
            return outcome(
                OutcomeStatus::RowInvalid,
                format!("Error in row {} ({name}): {issue}", row.row),
                None,
            );
        }

        let request = RenderRequest {
            record,
            variant: self.settings.variant,
            assets: &self.settings.assets,
            output_dir: &self.settings.output_dir,
        };

        let pdf = match self.renderer.render(&request) {
            Ok(path) => path,
            Err(e) => {
                return outcome(
                    OutcomeStatus::RenderFailed,
                    format!("Error for {name}: {e}"),
                    None,
                );
            }
        };

        if !self.settings.send_email {
            return outcome(
                OutcomeStatus::Generated,
                format!("Certificate for {name} generated successfully"),
                Some(pdf),
            );
        }

        let (subject, body) = self.mail.personalise(record);
        let mail = OutgoingMail {
            to: record.email.trim(),
            subject: &subject,
            body: &body,
            attachment: Some(&pdf),
        };

        match self.transport.send(&mail) {
            Ok(()) => outcome(
                OutcomeStatus::Sent,
                format!(
                    "Certificate for {name} generated successfully and sent to {}",
                    record.email.trim()
                ),
                Some(pdf),
            ),
            Err(e) => outcome(
                OutcomeStatus::SendFailed,
                format!("Error for {name}: {e}"),
                Some(pdf),
            ),
        }
    }
}
