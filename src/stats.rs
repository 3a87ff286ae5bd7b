use serde::Serialize;

use crate::style::{BLUE, GREEN, RED, paint};

/// Per-run progress counters. `errors <= processed` once an item has completed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunCounters {
    pub processed: u64,
    pub errors: u64,
}

impl RunCounters {
    /// Counts a new item and returns its 1-based index.
    pub fn start_item(&mut self) -> u64 {
        self.processed += 1;
        self.processed
    }

    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Counters with the current, not yet completed, item taken back out.
    pub fn without_in_flight(&self) -> Self {
        Self {
            processed: self.processed.saturating_sub(1),
            errors: self.errors,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatsReport {
    counters: RunCounters,
}

impl StatsReport {
    pub fn new(counters: RunCounters) -> Self {
        Self { counters }
    }

    pub fn success_rate(&self) -> Option<f64> {
        let RunCounters { processed, errors } = self.counters;
        (processed > 0).then(|| (processed - errors) as f64 * 100.0 / processed as f64)
    }

    pub fn error_rate(&self) -> Option<f64> {
        let RunCounters { processed, errors } = self.counters;
        (processed > 0).then(|| errors as f64 * 100.0 / processed as f64)
    }

    pub fn render(&self, color: bool) -> String {
        let (Some(success), Some(error)) = (self.success_rate(), self.error_rate()) else {
            return "No molecules were processed.\n".to_string();
        };
        let border = |text: &str| paint(color, BLUE, text);
        let spacer = border(&format!("+{}+", " ".repeat(48)));
        let left = border("+  ");
        let right = border("  +");

        let lines = [
            format!(
                "{}BRIEF STATISTICS{}",
                border("+ ==============="),
                border("=============== +")
            ),
            spacer.clone(),
            format!(
                "{left}{:-<40}{:->4}{right}",
                "Total molecules processed", self.counters.processed
            ),
            format!(
                "{left}{:-<40}{:->4}{right}",
                "Total number of errors", self.counters.errors
            ),
            spacer.clone(),
            format!(
                "{left}{}{right}",
                paint(color, GREEN, &format!("{:-<30}{:->13.2}%", "Success rate", success))
            ),
            format!(
                "{left}{}{right}",
                paint(color, RED, &format!("{:-<30}{:->13.2}%", "Error rate", error))
            ),
            spacer,
            border(&format!("+ {} +", "=".repeat(46))),
        ];
        format!("\n{}\n\n", lines.join("\n"))
    }
}
