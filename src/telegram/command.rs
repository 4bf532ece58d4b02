//! Inbound text classification

/// What an inbound text message asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Incoming<'a> {
    /// `/start` or `/help`
    Usage,
    /// Any other slash command; ignored
    UnknownCommand(&'a str),
    /// Plain text, treated as a consumer number
    Lookup(&'a str),
}

impl<'a> Incoming<'a> {
    pub fn classify(text: &'a str) -> Self {
        let trimmed = text.trim();

        let Some(command) = trimmed.strip_prefix('/') else {
            return Incoming::Lookup(trimmed);
        };

        // "/start@SomeBot arg" -> "start"
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .split('@')
            .next()
            .unwrap_or_default();

        match name {
            "start" | "help" => Incoming::Usage,
            _ => Incoming::UnknownCommand(name),
        }
    }
}
