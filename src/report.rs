// Output layer: turns driver events into terminal output as they happen.
// The driver only knows the `Reporter` trait, so tests can record events
// instead of printing them.

use crate::driver::{RunPlan, RunSummary};
use crate::scan::PhotoFile;
use crate::select::SelectionMode;
use crate::upload::UploadOutcome;
use anyhow::Result;
use crossterm::style::{style, Color, Stylize};
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;
use std::time::Duration;

const RULE_WIDTH: usize = 60;

/// Sink for run progress. Every call is made in real time, in order.
pub trait Reporter {
    fn run_started(&mut self, plan: &RunPlan);
    fn iteration_started(&mut self, iteration: u64, total: u64, batch_len: usize);
    fn upload_started(&mut self, position: usize, batch_len: usize, photo: &PhotoFile);
    fn upload_finished(&mut self, photo: &PhotoFile, outcome: &UploadOutcome);
    fn waiting(&mut self, pause: Duration);
    fn interrupted(&mut self);
    fn run_finished(&mut self, summary: &RunSummary);
}

/// Prints to stdout, with a spinner while a request is in flight.
pub struct ConsoleReporter {
    color: bool,
    show_iterations: bool,
    spinner: Option<ProgressBar>,
    prefix: String,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        ConsoleReporter {
            color: std::io::stdout().is_terminal(),
            show_iterations: false,
            spinner: None,
            prefix: String::new(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, plan: &RunPlan) {
        self.show_iterations = plan.total_iterations > 1;
        println!(
            "📁 Found {} photos in: {}",
            plan.photo_count,
            plan.dir.display()
        );
        if self.show_iterations {
            let mode = match plan.mode {
                SelectionMode::Sequential => "sequential",
                SelectionMode::Random => "random",
            };
            println!(
                "🔁 {} iterations, {} photos each ({}), every {}s",
                plan.total_iterations,
                plan.batch_size,
                mode,
                plan.interval.as_secs()
            );
        }
        println!("   (To cancel, press Ctrl+C)");
        println!();
        println!("Starting upload...");
        println!("{}", "-".repeat(RULE_WIDTH));
    }

    fn iteration_started(&mut self, iteration: u64, total: u64, batch_len: usize) {
        if self.show_iterations {
            println!();
            println!(
                "{}",
                self.paint(
                    &format!("🔄 Iteration {iteration}/{total} ({batch_len} photos)"),
                    Color::Cyan
                )
            );
        }
    }

    fn upload_started(&mut self, position: usize, batch_len: usize, photo: &PhotoFile) {
        self.prefix = format!("[{position}/{batch_len}] Uploading: {}...", photo.name);
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(self.prefix.clone());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn upload_finished(&mut self, _photo: &PhotoFile, outcome: &UploadOutcome) {
        self.clear_spinner();
        let status = match outcome {
            UploadOutcome::Success(_) => self.paint("✅ SUCCESS!", Color::Green),
            UploadOutcome::Failure(e) => self.paint(&format!("❌ {e}"), Color::Red),
        };
        println!("{} {}", self.prefix, status);
    }

    fn waiting(&mut self, pause: Duration) {
        println!("⏳ Next iteration in {:.1}s", pause.as_secs_f64());
    }

    fn interrupted(&mut self) {
        self.clear_spinner();
        println!();
        println!("{}", self.paint("❌ Upload cancelled by user", Color::Yellow));
    }

    fn run_finished(&mut self, summary: &RunSummary) {
        let attempts = summary.attempts();
        println!();
        println!("{}", "-".repeat(RULE_WIDTH));
        println!("📊 UPLOAD SUMMARY");
        println!("{}", "-".repeat(RULE_WIDTH));
        println!("✅ Successful: {}/{}", summary.successes, attempts);
        println!("❌ Failed: {}/{}", summary.failures, attempts);
        if self.show_iterations || summary.interrupted {
            println!(
                "🔁 Iterations: {}/{}",
                summary.iterations_completed, summary.total_iterations
            );
        }

        if !summary.failed.is_empty() {
            println!();
            println!("Failed uploads:");
            for f in &summary.failed {
                println!("  - {}: {}", f.name, f.error);
            }
        }

        println!();
        println!("{}", "=".repeat(RULE_WIDTH));
        if summary.interrupted {
            println!("⚠️  Run stopped early");
        } else {
            println!("✅ Upload complete!");
        }
        println!("{}", "=".repeat(RULE_WIDTH));
    }
}

/// Print the banner shown before anything else.
pub fn print_banner(title: &str, event_id: &str, masked_key: &str) {
    println!("{}", "=".repeat(RULE_WIDTH));
    println!("🚀 {title}");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!();
    println!("🎯 Target event: {event_id}");
    println!("🔑 API Key: {masked_key}");
}

/// Ask before uploading. Skipped (treated as yes) when stdin is not a
/// terminal, so scripted runs never block.
pub fn confirm_start(photo_count: usize) -> Result<bool> {
    if !std::io::stdin().is_terminal() {
        println!("✅ Auto-confirming upload of {photo_count} photos...");
        return Ok(true);
    }
    let answer = Confirm::new()
        .with_prompt(format!("Upload {photo_count} photos?"))
        .default(true)
        .interact()?;
    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_is_plain_without_color() {
        let reporter = ConsoleReporter {
            color: false,
            show_iterations: false,
            spinner: None,
            prefix: String::new(),
        };
        assert_eq!(reporter.paint("✅ SUCCESS!", Color::Green), "✅ SUCCESS!");
    }

    #[test]
    fn paint_wraps_text_in_ansi_codes_with_color() {
        let reporter = ConsoleReporter {
            color: true,
            show_iterations: false,
            spinner: None,
            prefix: String::new(),
        };
        let painted = reporter.paint("done", Color::Green);
        assert!(painted.contains("done"));
        assert!(painted.starts_with('\u{1b}'));
    }
}
