//! Colour-aware progress reporting on stderr.

use oktactl_core::identity::Reporter;

/// Tokyo Night color palette
pub mod colors {
    pub const RESET: &str = "\x1b[0m";

    pub const TKN_RED: &str = "\x1b[38;2;247;118;142m"; // #f7768e
    pub const TKN_GREEN: &str = "\x1b[38;2;158;206;106m"; // #9ece6a
    pub const TKN_YELLOW: &str = "\x1b[38;2;224;175;104m"; // #e0af68
    pub const TKN_CYAN: &str = "\x1b[38;2;125;207;255m"; // #7dcfff

    pub fn paint(color: &str, text: &str) -> String {
        format!("{}{}{}", color, text, RESET)
    }
}

/// Marker the dry-run strategy puts in front of every message.
const DRY_RUN_PREFIX: &str = "[dry-run]";

/// Pick the colour for a progress message.
pub fn colorize(message: &str) -> String {
    if message.starts_with(DRY_RUN_PREFIX) {
        colors::paint(colors::TKN_YELLOW, message)
    } else if message.contains(" is now ") || message.ends_with(" deleted") {
        colors::paint(colors::TKN_GREEN, message)
    } else {
        colors::paint(colors::TKN_CYAN, message)
    }
}

/// Writes progress messages to stderr; `anstream` strips the colours when
/// stderr is not a terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn report(&self, message: &str) {
        if !self.quiet {
            anstream::eprintln!("{}", colorize(message));
        }
    }
}

/// Print a fatal error the way every command does before exiting.
pub fn print_error(error: &dyn std::fmt::Display) {
    anstream::eprintln!("{} {}", colors::paint(colors::TKN_RED, "Error:"), error);
}
