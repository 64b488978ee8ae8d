//! Per-record dispatch results and the aggregated run report.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Certificate generated, email sending disabled.
    Generated,
    /// Certificate generated and delivered.
    Sent,
    /// Row failed the dispatch-time validation.
    RowInvalid,
    RenderFailed,
    /// Certificate exists but delivery failed.
    SendFailed,
}

impl OutcomeStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, OutcomeStatus::Generated | OutcomeStatus::Sent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Generated => "generated",
            OutcomeStatus::Sent => "sent",
            OutcomeStatus::RowInvalid => "row_invalid",
            OutcomeStatus::RenderFailed => "render_failed",
            OutcomeStatus::SendFailed => "send_failed",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchOutcome {
    pub row: usize,
    pub name: String,
    pub email: String,
    pub status: OutcomeStatus,
    pub message: String,
    pub artifact: Option<PathBuf>,
}

impl DispatchOutcome {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<DispatchOutcome>,
    pub success_count: usize,
    pub error_count: usize,
    /// Pauses taken between blocks.
    pub pauses: usize,
    /// True when the run stopped on a cancel request.
    pub cancelled: bool,
}

impl DispatchReport {
    pub fn push(&mut self, outcome: DispatchOutcome) {
        if outcome.is_success() {
            self.success_count += 1;
        } else {
            self.error_count += 1;
        }
        self.outcomes.push(outcome);
    }

    pub fn success_messages(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_success())
            .map(|o| o.message.as_str())
            .collect()
    }

    pub fn error_messages(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| o.message.as_str())
            .collect()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}
