use std::io::{self, Write};

use camino::Utf8Path;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::app::{RunOutcome, RunStatus};
use crate::catalog::PropertySelection;
use crate::stats::StatsReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

impl OutputMode {
    /// Whether Ctrl-C asks before quitting. Never when stdout carries the JSON summary.
    pub fn confirms_abort(self, json: bool) -> bool {
        self == OutputMode::Interactive && !json
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub status: RunStatus,
    pub processed: u64,
    pub errors: u64,
    pub success_rate: Option<f64>,
    pub error_rate: Option<f64>,
    pub properties: Vec<&'static str>,
    pub report_path: String,
    pub started_at: String,
    pub finished_at: String,
}

impl RunSummary {
    pub fn new(
        outcome: &RunOutcome,
        selection: &PropertySelection,
        report_path: &Utf8Path,
        started_at: DateTime<Utc>,
    ) -> Self {
        let stats = StatsReport::new(outcome.counters);
        Self {
            status: outcome.status,
            processed: outcome.counters.processed,
            errors: outcome.counters.errors,
            success_rate: stats.success_rate(),
            error_rate: stats.error_rate(),
            properties: selection.names(),
            report_path: report_path.to_string(),
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
        }
    }
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_summary(summary: &RunSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_confirmation_only_on_plain_interactive_output() {
        assert!(OutputMode::Interactive.confirms_abort(false));
        assert!(!OutputMode::Interactive.confirms_abort(true));
        assert!(!OutputMode::NonInteractive.confirms_abort(false));
        assert!(!OutputMode::NonInteractive.confirms_abort(true));
    }
}
