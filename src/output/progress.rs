use std::collections::HashMap;
use std::time::Duration;

use console::style;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::models::ReportKind;
use crate::pipeline::SubmissionEvent;
use crate::utils::truncation::truncate_chars;

/// One spinner per report kind while the requests are in flight.
pub struct AnalysisProgress {
    multi: MultiProgress,
    bars: HashMap<ReportKind, ProgressBar>,
}

impl AnalysisProgress {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let header = multi.add(ProgressBar::new_spinner());
        if let Ok(spinner) = ProgressStyle::default_spinner().template("  {spinner:.cyan} {msg}") {
            header.set_style(spinner);
        }
        header.finish_with_message(format!("{}", style("Analyzing your startup idea...").bold()));

        Self { multi, bars: HashMap::new() }
    }

    pub fn handle_event(&mut self, event: &SubmissionEvent) {
        match event {
            SubmissionEvent::Started { kind } => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                if let Ok(spinner) = ProgressStyle::default_spinner().template("    {spinner:.yellow} {msg}") {
                    bar.set_style(spinner);
                }
                bar.set_message(kind.display_name().to_string());
                bar.enable_steady_tick(Duration::from_millis(120));
                self.bars.insert(*kind, bar);
            }
            SubmissionEvent::Completed { kind, total_tokens } => {
                if let Some(bar) = self.bars.get(kind) {
                    let tokens = total_tokens
                        .map(|t| format!(" ({} tokens)", t))
                        .unwrap_or_default();
                    bar.set_style(ProgressStyle::with_template("    {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
                    bar.finish_with_message(format!(
                        "{} {}{}",
                        style("✓").green(),
                        kind.display_name(),
                        style(tokens).dim()
                    ));
                }
            }
            SubmissionEvent::Failed { kind, error } => {
                if let Some(bar) = self.bars.get(kind) {
                    bar.set_style(ProgressStyle::with_template("    {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()));
                    bar.finish_with_message(format!(
                        "{} {} {}",
                        style("✗").red(),
                        kind.display_name(),
                        style(truncate_chars(error, 80)).dim()
                    ));
                }
            }
        }
    }

    /// Stop any spinner still ticking. Finished lines stay on screen.
    pub fn finish(self) {
        for bar in self.bars.values().filter(|b| !b.is_finished()) {
            bar.abandon();
        }
    }
}

impl Default for AnalysisProgress {
    fn default() -> Self {
        Self::new()
    }
}
