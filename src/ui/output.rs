//! Output verbosity.

/// How much the commands print.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Also print each discovered toolchain and its roles.
    Verbose,
    #[default]
    Normal,
    /// No progress display.
    Quiet,
}

impl OutputMode {
    /// Pick the mode from the `--quiet` and `--verbose` flags; quiet wins.
    pub fn from_flags(quiet: bool, verbose: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    pub fn shows_detail(self) -> bool {
        self == Self::Verbose
    }

    pub fn shows_progress(self) -> bool {
        self != Self::Quiet
    }
}
