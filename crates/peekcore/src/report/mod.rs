//! MediaInfo report formatting.
//!
//! Turns the raw text MediaInfo prints on stdout into a compact markup
//! fragment: one heading plus one preformatted block per report section,
//! with the `File size` attribute rewritten from the independently-known
//! byte count (the tool may have inspected only a truncated prefix of the
//! file and reported a wrong size).

pub mod format;
pub mod sections;

// Re-exports for convenience
pub use format::{format_report, FormatOptions};
pub use sections::{SectionSpec, DEFAULT_SECTIONS};
