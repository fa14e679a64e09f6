//! Terminal output for the commands.
//!
//! Commands talk to a [`UserInterface`]: [`TerminalUI`] in the binary,
//! [`MockUI`] in tests. Plain messages and headers go to stdout, warnings and
//! errors to stderr, so `list --json` output stays machine-readable.
//!
//! # Example
//!
//! ```
//! use compiler_scout::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.success("Added 1 new compiler");
//! ui.warning("No compilers match intel");
//! assert!(ui.has_success("1 new compiler"));
//! assert!(ui.has_warning("intel"));
//! ```

pub mod mock;
pub mod output;
pub mod progress;
pub mod table;
pub mod terminal;
pub mod theme;

pub use mock::{Line, MockUI};
pub use output::OutputMode;
pub use progress::SearchSpinner;
pub use table::RoleTable;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{Palette, Tone};

/// Where commands send their output.
pub trait UserInterface {
    fn output_mode(&self) -> OutputMode;

    /// Plain line on stdout.
    fn message(&mut self, msg: &str);

    fn success(&mut self, msg: &str);

    fn warning(&mut self, msg: &str);

    fn error(&mut self, msg: &str);

    /// Section header, one per vendor or per compiler.
    fn show_header(&mut self, title: &str);

    /// Report that discovery over `dirs` search paths has started.
    fn start_search(&mut self, dirs: usize) -> Box<dyn SearchProgress>;
}

/// Progress of one discovery run.
pub trait SearchProgress {
    /// Discovery is over and produced `toolchains` toolchains.
    fn finish(&mut self, toolchains: usize);
}
