// UI layer: terminal implementations of the `Confirm` and `Reporter` hooks.
// A spinner runs while a request is in flight and every item ends with a
// ✅ or 🚨 line on stdout.

use crate::sync::{Confirm, Item, Outcome, Reporter, SyncReport};
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::Confirm as ConfirmPrompt;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Asks on the terminal before publishing strings.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        let answer = ConfirmPrompt::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;
        Ok(answer)
    }
}

/// Prints one line per item and shows a spinner in between.
#[derive(Default)]
pub struct TerminalReporter {
    spinner: Option<ProgressBar>,
}

impl Reporter for TerminalReporter {
    fn begin(&mut self, item: &Item) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(in_flight_message(item));
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn finish(&mut self, outcome: &Outcome) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
        println!("{}", outcome_line(outcome));
        if let Err(e) = &outcome.result {
            println!("{}", e.to_string().red());
        }
    }
}

fn in_flight_message(item: &Item) -> String {
    match item {
        Item::Upload { project, file } => format!("Uploading {file} to {project}..."),
        Item::Download { project, locale, .. } => format!("Downloading {locale} from {project}..."),
    }
}

/// The ✅/🚨 line for an outcome, without the error detail.
pub fn outcome_line(outcome: &Outcome) -> String {
    let marker = if outcome.is_success() { "✅" } else { "🚨" };
    match (&outcome.item, outcome.is_success()) {
        (Item::Upload { project, file }, _) => format!("{marker}  {project}: {file}"),
        (Item::Download { locale, destination: Some(path), .. }, true) => {
            format!("{marker}  {locale} -> {}", path.display())
        }
        (Item::Download { locale, .. }, _) => format!("{marker}  {locale}"),
    }
}

/// Final summary printed after a flow.
pub fn print_summary(report: &SyncReport) {
    if report.declined {
        println!("{}", "Upload cancelled, nothing was sent.".yellow());
        return;
    }
    let summary = format!(
        "{} succeeded, {} failed",
        report.succeeded(),
        report.failures()
    );
    if report.failures() == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.red());
    }
}
