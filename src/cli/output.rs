//! Output formatting and progress display

use crate::cli::args::VerbosityLevel;
use crate::core::reply::{CollectingReply, Department};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Output formatter for vimeo-scope
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    spinner: Option<ProgressBar>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            spinner: None,
        }
    }

    /// Show a spinner until [`OutputFormatter::finish_spinner`]
    pub fn start_spinner(&mut self, message: &str) -> Option<ProgressBar> {
        if self.verbosity == VerbosityLevel::Quiet {
            return None;
        }

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed}] {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));

        self.spinner = Some(spinner.clone());
        Some(spinner)
    }

    /// Remove the spinner from the terminal
    pub fn finish_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    /// Print info message
    pub fn info(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("ℹ️  {}", message);
        }
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            println!("✅ {}", message);
        }
    }

    /// Print warning message
    pub fn warning(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("⚠️  {}", message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("❌ {}", message);
    }

    /// Print the departments and results of a finished query to stdout.
    ///
    /// Results are printed at every verbosity; the department tree only
    /// outside quiet mode.
    pub fn print_reply(&self, reply: &CollectingReply) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        render_reply(reply, self.verbosity != VerbosityLevel::Quiet, &mut out)
    }
}

/// Write `reply` as text. Results are grouped by category in registration order.
pub fn render_reply<W: Write>(reply: &CollectingReply, with_departments: bool, out: &mut W) -> io::Result<()> {
    if with_departments {
        if let Some(root) = &reply.departments {
            render_department(root, 0, out)?;
            writeln!(out)?;
        }
    }

    for category in &reply.categories {
        let results = reply.results_in(&category.id);
        if results.is_empty() {
            continue;
        }

        if !category.title.is_empty() {
            writeln!(out, "== {} ==", category.title)?;
        }

        for result in results {
            if result.uri.is_empty() {
                // Placeholder entries such as the login prompt
                writeln!(out, "🔑 {}", result.title)?;
                continue;
            }

            if result.username.is_empty() {
                writeln!(out, "🎬 {}", result.title)?;
            } else {
                writeln!(out, "🎬 {} ({})", result.title, result.username)?;
            }
            writeln!(out, "   {}", result.uri)?;
        }
    }

    Ok(())
}

fn render_department<W: Write>(department: &Department, depth: usize, out: &mut W) -> io::Result<()> {
    let indent = "  ".repeat(depth);
    if department.id.is_empty() {
        writeln!(out, "{}📂 {}", indent, department.title)?;
    } else {
        writeln!(out, "{}📁 {} [{}]", indent, department.title.trim(), department.id)?;
    }

    for child in &department.subdepartments {
        render_department(child, depth + 1, out)?;
    }
    Ok(())
}
