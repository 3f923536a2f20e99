use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

pub const DEFAULT_WIDTH: usize = 80;

/// Output sinks of a command, plus its spinner.
pub struct Terminal<O: Write, E: Write> {
    pub out: O,
    pub err: E,
    pub width: usize,
    spinner: ProgressBar,
}

impl Terminal<io::Stdout, io::Stderr> {
    /// Real terminal. The spinner stays hidden under `verbose` so log lines
    /// don't get drawn over.
    pub fn stdio(verbose: bool) -> Self {
        let width = console::Term::stdout()
            .size_checked()
            .map(|(_rows, cols)| cols as usize)
            .filter(|&cols| cols > 0)
            .unwrap_or(DEFAULT_WIDTH);

        let spinner = if verbose {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
                bar.set_style(style);
            }
            bar
        };

        Self {
            out: io::stdout(),
            err: io::stderr(),
            width,
            spinner,
        }
    }
}

impl<O: Write, E: Write> Terminal<O, E> {
    /// Captured output with no spinner, for tests and non-interactive use.
    pub fn with_writers(out: O, err: E, width: usize) -> Self {
        Self {
            out,
            err,
            width,
            spinner: ProgressBar::hidden(),
        }
    }

    pub fn start_spinner(&self, message: &str) {
        self.spinner.set_message(message.to_string());
        self.spinner.enable_steady_tick(Duration::from_millis(80));
    }

    /// Clears the spinner line; must run before anything else is printed.
    pub fn stop_spinner(&self) {
        self.spinner.finish_and_clear();
    }

    pub fn info(&mut self, message: &str) {
        if let Err(e) = writeln!(self.out, "{message}") {
            log::warn!("failed to write to stdout: {e}");
        }
    }

    /// Prints `message` in red on the error stream.
    pub fn error(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "{}", console::style(message).for_stderr().red()) {
            log::warn!("failed to write to stderr: {e}");
        }
    }
}
