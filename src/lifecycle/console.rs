//! Terminal controls for the interactive monitor.

/// One line typed at the monitor's prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    DismissSuccess,
    DismissError,
    Status,
    Quit,
}

impl ConsoleCommand {
    /// Parse a line; blank lines are ignored and anything else asks for status.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "" => None,
            "s" => Some(ConsoleCommand::DismissSuccess),
            "e" => Some(ConsoleCommand::DismissError),
            "q" | "quit" => Some(ConsoleCommand::Quit),
            _ => Some(ConsoleCommand::Status),
        }
    }
}
