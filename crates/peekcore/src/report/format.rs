//! The report formatter: MediaInfo stdout -> markup fragment.

use crate::core::utils::format_size;

use super::sections::{SectionSpec, DEFAULT_SECTIONS};

/// Attribute name whose value is always rewritten from the byte-size hint.
const SIZE_ATTRIBUTE: &str = "File size";

/// Policy knobs for [`format_report`].
///
/// The source revisions of this formatter disagreed on two points, so both
/// are configurable rather than hard-coded:
/// - whether a report without a Video or Audio section counts as usable;
/// - whether attribute lines before the first recognized header are kept.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Recognized section vocabulary.
    pub sections: &'static [SectionSpec],
    /// Return `None` unless at least one Video or Audio header was seen.
    pub require_stream: bool,
    /// Keep content preceding the first recognized header in an unlabelled
    /// leading block instead of dropping it.
    pub keep_preamble: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            sections: DEFAULT_SECTIONS,
            require_stream: true,
            keep_preamble: false,
        }
    }
}

/// Formatter state: either inside a preformatted block or not.
enum BlockState {
    NoBlockOpen,
    BlockOpen,
}

/// Formats a MediaInfo report into a markup fragment.
///
/// Produces one `<h4>` heading plus one `<pre>` block per section header in
/// document order, blocks separated by `<br>`. Attribute lines land verbatim
/// (after trimming) inside the block of the most recently opened section,
/// except the `File size` line whose value is replaced by `byte_size`
/// rendered through [`format_size`] - the tool's own number is never trusted.
///
/// Returns `None` when the report contains nothing usable: empty input, or
/// (with [`FormatOptions::require_stream`]) no Video/Audio section at all.
///
/// # Arguments
///
/// * `report_text` - Raw stdout of the mediainfo invocation
/// * `byte_size` - Authoritative size of the inspected file in bytes
/// * `opts` - Section vocabulary and policy switches
pub fn format_report(report_text: &str, byte_size: u64, opts: &FormatOptions) -> Option<String> {
    let size_str = format_size(byte_size);

    let mut finished: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut state = BlockState::NoBlockOpen;
    let mut saw_stream = false;

    for raw in report_text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(section) = match_section(line, opts.sections) {
            if section.is_stream() {
                saw_stream = true;
            }
            if let BlockState::BlockOpen = state {
                current.push_str("</pre>");
                finished.push(std::mem::take(&mut current));
            }
            // Header lines may carry a track index ("Audio #2", "Text #1"),
            // so the whole line is kept with only the name relabelled.
            let heading = line.replacen(section.name, section.label, 1);
            current.push_str("<h4>");
            current.push_str(section.glyph);
            current.push(' ');
            current.push_str(&heading);
            current.push_str("</h4><pre>");
            state = BlockState::BlockOpen;
            continue;
        }

        let content = if line.starts_with(SIZE_ATTRIBUTE) {
            rewrite_size_line(line, &size_str)
        } else {
            line.to_string()
        };

        match state {
            BlockState::BlockOpen => {
                current.push_str(&content);
                current.push('\n');
            }
            BlockState::NoBlockOpen => {
                if opts.keep_preamble {
                    current.push_str("<pre>");
                    current.push_str(&content);
                    current.push('\n');
                    state = BlockState::BlockOpen;
                }
                // Otherwise there is no open block to attach to; dropped.
            }
        }
    }

    if let BlockState::BlockOpen = state {
        current.push_str("</pre>");
        finished.push(current);
    }

    if finished.is_empty() {
        return None;
    }
    if opts.require_stream && !saw_stream {
        return None;
    }

    Some(finished.join("<br>"))
}

/// A line is a section header iff it starts with a vocabulary name and
/// carries no colon (a colon marks a `key : value` attribute line).
fn match_section<'a>(line: &str, sections: &'a [SectionSpec]) -> Option<&'a SectionSpec> {
    if line.contains(':') {
        return None;
    }
    sections.iter().find(|s| line.starts_with(s.name))
}

/// Replaces the value part of a `File size` attribute line, keeping the key
/// part (including its alignment padding) untouched.
fn rewrite_size_line(line: &str, size_str: &str) -> String {
    match line.split_once(':') {
        Some((key, _)) => format!("{}: {}", key, size_str),
        None => format!("{} : {}", SIZE_ATTRIBUTE, size_str),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn lenient() -> FormatOptions {
        FormatOptions {
            require_stream: false,
            ..FormatOptions::default()
        }
    }

    #[test]
    fn test_single_general_section_is_one_block() {
        let report = "General\nFormat : Matroska\nDuration : 1 h 30 min\n";
        let fragment = format_report(report, 1024, &lenient()).unwrap();

        assert_eq!(fragment.matches("<pre>").count(), 1);
        assert_eq!(fragment.matches("</pre>").count(), 1);
        assert!(fragment.contains("Format : Matroska\n"));
    }

    #[test]
    fn test_section_order_is_preserved() {
        let report = "General\nFormat : MKV\nVideo\nWidth : 1920\nAudio\nChannels : 2\n";
        let fragment = format_report(report, 1024, &FormatOptions::default()).unwrap();

        let general = fragment.find("General").unwrap();
        let video = fragment.find("Video").unwrap();
        let audio = fragment.find("Audio").unwrap();
        assert!(general < video && video < audio);
        assert_eq!(fragment.matches("<pre>").count(), 3);
        assert_eq!(fragment.matches("</pre>").count(), 3);
    }

    #[test]
    fn test_text_header_is_relabelled_subtitle() {
        let report = "Video\nWidth : 1280\nText\nLanguage : English\n";
        let fragment = format_report(report, 1024, &FormatOptions::default()).unwrap();

        assert!(fragment.contains("Subtitle</h4>"));
        assert!(!fragment.contains("Text</h4>"));
    }

    #[test]
    fn test_text_header_with_track_index() {
        let report = "Video\nWidth : 1280\nText #1\nLanguage : English\n";
        let fragment = format_report(report, 1024, &FormatOptions::default()).unwrap();

        assert!(fragment.contains("Subtitle #1</h4>"));
    }

    #[test]
    fn test_size_line_is_normalized_from_hint() {
        let report = "General\nFormat : MKV\nFile size : 999 B\nVideo\nCodec : H264\n";
        let fragment = format_report(report, 2_097_152, &FormatOptions::default()).unwrap();

        assert!(fragment.contains("File size : 2.00 MiB\n"));
        assert!(!fragment.contains("999 B"));

        // Codec belongs to the Video block, not the General one
        let general_block = &fragment[..fragment.find("<br>").unwrap()];
        assert!(!general_block.contains("Codec"));
        assert!(fragment.contains("Codec : H264\n"));
    }

    #[test]
    fn test_size_line_gib() {
        let report = "General\nFile size : 12 B\nAudio\nFormat : FLAC\n";
        let fragment = format_report(report, 1_073_741_824, &FormatOptions::default()).unwrap();

        assert!(fragment.contains("File size : 1.00 GiB\n"));
    }

    #[test]
    fn test_no_stream_section_yields_none() {
        let report = "General\nFormat : ZIP\nFile size : 10 MiB\n";
        assert!(format_report(report, 1024, &FormatOptions::default()).is_none());

        // The same input is accepted once the guard is off
        assert!(format_report(report, 1024, &lenient()).is_some());
    }

    #[test]
    fn test_empty_input_yields_none() {
        assert!(format_report("", 1024, &FormatOptions::default()).is_none());
        assert!(format_report("", 1024, &lenient()).is_none());
        assert!(format_report("\n  \n\n", 1024, &lenient()).is_none());
    }

    #[test]
    fn test_preamble_dropped_by_default() {
        let report = "CompleteName : /tmp/x.mkv\nVideo\nWidth : 640\n";
        let fragment = format_report(report, 1024, &FormatOptions::default()).unwrap();

        assert!(!fragment.contains("CompleteName"));
    }

    #[test]
    fn test_preamble_kept_when_configured() {
        let opts = FormatOptions {
            keep_preamble: true,
            ..FormatOptions::default()
        };
        let report = "CompleteName : /tmp/x.mkv\nVideo\nWidth : 640\n";
        let fragment = format_report(report, 1024, &opts).unwrap();

        assert!(fragment.starts_with("<pre>CompleteName : /tmp/x.mkv\n"));
        assert_eq!(fragment.matches("<pre>").count(), 2);
        assert_eq!(fragment.matches("</pre>").count(), 2);
    }

    #[test]
    fn test_section_name_with_colon_is_attribute_line() {
        // "Video : yes" carries a colon, so it is content, not a header
        let report = "General\nVideo : yes\nAudio\nFormat : AAC\n";
        let fragment = format_report(report, 1024, &FormatOptions::default()).unwrap();

        assert!(fragment.contains("Video : yes\n"));
        assert_eq!(fragment.matches("<h4>").count(), 2);
    }

    #[test]
    fn test_deterministic_output() {
        let report = "General\nFile size : 1 B\nVideo\nWidth : 1920\nText\nLanguage : ger\n";
        let first = format_report(report, 123_456_789, &FormatOptions::default());
        let second = format_report(report, 123_456_789, &FormatOptions::default());
        assert_eq!(first, second);
    }

    #[test]
    fn test_blocks_are_separated_by_br() {
        let report = "General\nFormat : MKV\nVideo\nWidth : 1920\n";
        let fragment = format_report(report, 1024, &FormatOptions::default()).unwrap();

        assert_eq!(fragment.matches("</pre><br><h4>").count(), 1);
        assert!(fragment.ends_with("</pre>"));
    }
}
