//! Progress reporting while a race runs
//!
//! Everything here writes to stderr so stdout carries only the result.

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use responder_application::{NoProgress, RaceProgressNotifier};
use responder_domain::{Attempt, AttemptOutcome, QueryKey, SourceName};
use std::sync::Mutex;

/// Reports race progress with an indicatif bar
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn race_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RaceProgressNotifier for ProgressReporter {
    fn on_race_start(&self, key: &QueryKey, total_sources: usize) {
        let pb = ProgressBar::new(total_sources as u64);
        pb.set_style(Self::race_style());
        pb.set_prefix(format!("Racing {}", key));
        pb.set_message("waiting...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_attempt_complete(&self, attempt: &Attempt) {
        if let Ok(bar) = self.bar.lock() {
            if let Some(pb) = bar.as_ref() {
                pb.set_message(attempt_mark(attempt));
                pb.inc(1);
            }
        }
    }

    fn on_race_complete(&self, winner: Option<&SourceName>) {
        if let Ok(mut bar) = self.bar.lock() {
            if let Some(pb) = bar.take() {
                pb.finish_and_clear();
                if winner.is_none() {
                    eprintln!("{}", "no source answered".red());
                }
            }
        }
    }
}

/// Simple text-based progress (no fancy UI), for non-terminal stderr
pub struct SimpleProgress;

impl RaceProgressNotifier for SimpleProgress {
    fn on_race_start(&self, key: &QueryKey, total_sources: usize) {
        eprintln!("{}", start_line(key, total_sources));
    }

    fn on_attempt_complete(&self, attempt: &Attempt) {
        eprintln!("  {}", attempt_mark(attempt));
    }

    fn on_race_complete(&self, winner: Option<&SourceName>) {
        match winner {
            Some(name) => eprintln!("{} {}", "winner:".green(), name),
            None => eprintln!("{}", "no source answered".red()),
        }
    }
}

/// How progress is shown for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    /// Nothing (`--quiet`)
    Hidden,
    /// indicatif bar on an interactive stderr
    Bar,
    /// One plain line per event when stderr is redirected
    Lines,
}

impl ProgressMode {
    pub fn select(quiet: bool, interactive: bool) -> Self {
        match (quiet, interactive) {
            (true, _) => ProgressMode::Hidden,
            (false, true) => ProgressMode::Bar,
            (false, false) => ProgressMode::Lines,
        }
    }

    pub fn notifier(self) -> Box<dyn RaceProgressNotifier> {
        match self {
            ProgressMode::Hidden => Box::new(NoProgress),
            ProgressMode::Bar => Box::new(ProgressReporter::new()),
            ProgressMode::Lines => Box::new(SimpleProgress),
        }
    }
}

fn start_line(key: &QueryKey, total_sources: usize) -> String {
    format!(
        "{} {} ({} sources)",
        "->".cyan(),
        format!("Racing {}", key).bold(),
        total_sources
    )
}

fn attempt_mark(attempt: &Attempt) -> String {
    let elapsed = attempt
        .elapsed()
        .map(|d| format!(" ({}ms)", d.as_millis()))
        .unwrap_or_default();
    match attempt.outcome() {
        AttemptOutcome::Success(_) => format!("{} {}{}", "v".green(), attempt.source(), elapsed),
        AttemptOutcome::Failure(reason) => {
            format!("{} {}{}: {}", "x".red(), attempt.source(), elapsed, reason)
        }
        AttemptOutcome::Pending => format!("{} {}", "?".yellow(), attempt.source()),
    }
}
