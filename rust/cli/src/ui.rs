//! Small helpers for consistent terminal output.

use std::io::Write;

use felt_engine::cards::Card;

pub fn write_error(err: &mut dyn Write, msg: &str) -> std::io::Result<()> {
    writeln!(err, "Error: {}", msg)
}

/// Display a warning message to stderr with "WARNING:" prefix
pub fn display_warning(err: &mut dyn Write, message: &str) -> std::io::Result<()> {
    writeln!(err, "WARNING: {}", message)
}

/// Space-separated two-character codes.
pub fn card_list(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.code())
        .collect::<Vec<_>>()
        .join(" ")
}
