use colored::Colorize;
use gqlpen_core::{Notifier, Severity};

/// Prints notifications to stderr, keeping stdout for command output.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Success => eprintln!("{}", message.bright_green()),
            Severity::Info => eprintln!("{}", message.bright_blue()),
            Severity::Error => eprintln!("{}", format!("error: {message}").bright_red()),
        }
    }
}

/// reports an error that ended the command to stderr
pub(crate) fn error(error: &anyhow::Error) {
    eprintln!("{}", format!("error: {error:#}").bright_red());
}

/// reports a hint for the next step to stderr
pub(crate) fn hint(message: &str) {
    eprintln!("{}", format!("hint: {message}").bright_blue());
}

/// reports a value the user changed
pub(crate) fn changed(what: &str, value: &str) {
    eprintln!("{what} set to {}", value.bright_blue());
}
