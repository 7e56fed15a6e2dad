//! Section vocabulary for MediaInfo reports.

/// A named report section and how its heading is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionSpec {
    /// Name as it appears at the start of a header line in the tool output.
    pub name: &'static str,
    /// Label rendered in the fragment heading.
    pub label: &'static str,
    /// Marker glyph prefixed to the heading.
    pub glyph: &'static str,
}

impl SectionSpec {
    /// True for the stream sections whose presence makes a report usable.
    pub fn is_stream(&self) -> bool {
        self.name == "Video" || self.name == "Audio"
    }
}

/// The five sections MediaInfo emits for media containers.
///
/// `Text` is MediaInfo's name for subtitle tracks and is relabelled
/// accordingly in the output.
pub const DEFAULT_SECTIONS: &[SectionSpec] = &[
    SectionSpec {
        name: "General",
        label: "General",
        glyph: "\u{1F5D2}", // 🗒
    },
    SectionSpec {
        name: "Video",
        label: "Video",
        glyph: "\u{1F39E}", // 🎞
    },
    SectionSpec {
        name: "Audio",
        label: "Audio",
        glyph: "\u{1F50A}", // 🔊
    },
    SectionSpec {
        name: "Text",
        label: "Subtitle",
        glyph: "\u{1F520}", // 🔠
    },
    SectionSpec {
        name: "Menu",
        label: "Menu",
        glyph: "\u{1F5C3}", // 🗃
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_vocabulary() {
        assert_eq!(DEFAULT_SECTIONS.len(), 5);

        let text = DEFAULT_SECTIONS.iter().find(|s| s.name == "Text").unwrap();
        assert_eq!(text.label, "Subtitle");

        let streams: Vec<&str> = DEFAULT_SECTIONS.iter().filter(|s| s.is_stream()).map(|s| s.name).collect();
        assert_eq!(streams, vec!["Video", "Audio"]);
    }
}
