use std::fmt::Write as _;

use crate::state::DownloadOutcome;
use crate::util::format_size;

/// Counts and byte totals for one prefill run.
///
/// Created fresh per run, mutated only through [`RunSummary::record`], and
/// rendered once at the end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Apps skipped because they were already current.
    pub up_to_date_count: usize,
    /// Apps downloaded successfully in this run.
    pub updated_count: usize,
    /// Apps whose attempt failed.
    pub failed_count: usize,
    /// Bytes pulled through the cache by successful apps.
    pub total_bytes_transferred: u64,
    /// Every classified app in processing order.
    pub apps: Vec<(String, DownloadOutcome)>,
}

impl RunSummary {
    /// What: Fold one app's classification into the summary.
    ///
    /// Inputs:
    /// - `app_id`: App that was classified
    /// - `outcome`: Its classification
    /// - `bytes_transferred`: Bytes to add to the total (ignored unless `Updated`)
    pub fn record(&mut self, app_id: &str, outcome: DownloadOutcome, bytes_transferred: u64) {
        match outcome {
            DownloadOutcome::UpToDate => self.up_to_date_count += 1,
            DownloadOutcome::Updated => {
                self.updated_count += 1;
                self.total_bytes_transferred =
                    self.total_bytes_transferred.saturating_add(bytes_transferred);
            }
            DownloadOutcome::Failed => self.failed_count += 1,
        }
        self.apps.push((app_id.to_string(), outcome));
    }

    /// Number of apps classified so far.
    #[must_use]
    pub const fn processed(&self) -> usize {
        self.up_to_date_count + self.updated_count + self.failed_count
    }

    /// Classification recorded for `app_id`, if it was processed.
    #[must_use]
    pub fn outcome_of(&self, app_id: &str) -> Option<DownloadOutcome> {
        self.apps
            .iter()
            .find(|(id, _)| id == app_id)
            .map(|(_, outcome)| *outcome)
    }

    /// What: Render the summary as a small text table.
    ///
    /// Output:
    /// - Multi-line string with one row per counter and the byte total.
    ///
    /// Details:
    /// - Pure; printing is left to the caller.
    #[must_use]
    pub fn render(&self) -> String {
        let rows = [
            ("Updated", self.updated_count.to_string()),
            ("Already up to date", self.up_to_date_count.to_string()),
            ("Failed", self.failed_count.to_string()),
            ("Total downloaded", format_size(self.total_bytes_transferred)),
        ];
        let label_w = rows.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
        let value_w = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
        let rule = format!("+-{}-+-{}-+", "-".repeat(label_w), "-".repeat(value_w));
        let mut out = String::new();
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(out, "| {:<label_w$} | {:>value_w$} |", "Prefill summary", "");
        let _ = writeln!(out, "{rule}");
        for (label, value) in &rows {
            let _ = writeln!(out, "| {label:<label_w$} | {value:>value_w$} |");
        }
        out.push_str(&rule);
        out
    }
}
