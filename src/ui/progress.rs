//! Spinner shown while compilers are probed.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use super::theme::{Palette, Tone};
use super::SearchProgress;

/// Spinner on stderr covering one discovery run.
pub struct SearchSpinner {
    bar: ProgressBar,
}

impl SearchSpinner {
    pub fn start(dirs: usize) -> Self {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
            .template("{spinner:.cyan} {msg}")
        {
            bar.set_style(style);
        }
        bar.set_message(searching(dirs));
        bar.enable_steady_tick(Duration::from_millis(80));
        Self { bar }
    }

    /// A spinner that draws nothing.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl SearchProgress for SearchSpinner {
    fn finish(&mut self, toolchains: usize) {
        if toolchains == 0 {
            self.bar.finish_and_clear();
            return;
        }
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            self.bar.set_style(style);
        }
        self.bar
            .finish_with_message(Palette::colored().paint(Tone::Success, &found(toolchains)));
    }
}

fn searching(dirs: usize) -> String {
    let noun = if dirs == 1 { "path" } else { "paths" };
    format!("Probing compilers in {} search {}...", dirs, noun)
}

fn found(toolchains: usize) -> String {
    let noun = if toolchains == 1 { "toolchain" } else { "toolchains" };
    format!("Found {} {}", toolchains, noun)
}
