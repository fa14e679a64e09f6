//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{OutputMode, Palette, SearchProgress, SearchSpinner, Tone, UserInterface};

/// Writes results to stdout and diagnostics to stderr.
pub struct TerminalUI {
    out: Term,
    err: Term,
    palette: Palette,
    mode: OutputMode,
}

impl TerminalUI {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            palette: Palette::colored(),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn success(&mut self, msg: &str) {
        writeln!(self.out, "{}", self.palette.paint(Tone::Success, msg)).ok();
    }

    fn warning(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.palette.paint(Tone::Warning, msg)).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.palette.paint(Tone::Error, msg)).ok();
    }

    fn show_header(&mut self, title: &str) {
        writeln!(self.out, "{}", self.palette.paint(Tone::Header, title)).ok();
    }

    fn start_search(&mut self, dirs: usize) -> Box<dyn SearchProgress> {
        if self.mode.shows_progress() && self.err.is_term() {
            Box::new(SearchSpinner::start(dirs))
        } else {
            Box::new(SearchSpinner::hidden())
        }
    }
}

/// Create the UI for the given output mode.
pub fn create_ui(mode: OutputMode) -> Box<dyn UserInterface> {
    Box::new(TerminalUI::new(mode))
}
