//! Integration tests for the report formatter.
//!
//! Run with: cargo test -p peekcore --test report_format_test

use pretty_assertions::assert_eq;

use peekcore::report::{format_report, FormatOptions};

/// A realistic (abridged) mediainfo report for an MKV with two audio tracks
/// and a subtitle track.
const SAMPLE_REPORT: &str = "\
General
Unique ID                                : 223342961307
Format                                   : Matroska
File size                                : 21.4 MiB
Duration                                 : 1 h 52 min

Video
ID                                       : 1
Format                                   : AVC
Width                                    : 1 920 pixels
Height                                   : 1 080 pixels

Audio #1
Format                                   : AAC LC
Channel(s)                               : 6 channels

Audio #2
Format                                   : AC-3
Language                                 : English

Text #1
Format                                   : UTF-8
Language                                 : English

Menu
00:00:00.000                             : en:Opening
";

#[test]
fn full_report_produces_one_block_per_section() {
    let fragment = format_report(SAMPLE_REPORT, 1_500_000_000, &FormatOptions::default()).unwrap();

    assert_eq!(fragment.matches("<h4>").count(), 6);
    assert_eq!(fragment.matches("<pre>").count(), 6);
    assert_eq!(fragment.matches("</pre>").count(), 6);

    // Track indices survive in headings, Text becomes Subtitle
    assert!(fragment.contains("Audio #1</h4>"));
    assert!(fragment.contains("Audio #2</h4>"));
    assert!(fragment.contains("Subtitle #1</h4>"));
    assert!(fragment.contains("Menu</h4>"));
}

#[test]
fn size_line_uses_the_hint_not_the_report() {
    let fragment = format_report(SAMPLE_REPORT, 1_500_000_000, &FormatOptions::default()).unwrap();

    // 1_500_000_000 bytes is ~1.40 GiB; the tool's own "21.4 MiB" is gone
    let size_line = fragment
        .lines()
        .find(|line| line.starts_with("File size"))
        .unwrap();
    assert!(size_line.ends_with(": 1.40 GiB"));
    assert!(!fragment.contains("21.4 MiB"));
}

#[test]
fn spec_scenario_general_then_video() {
    let report = "General\nFormat : MKV\nFile size : 999 B\nVideo\nCodec : H264\n";
    let fragment = format_report(report, 2_097_152, &FormatOptions::default()).unwrap();

    let split = fragment.find("<br>").unwrap();
    let (general_block, video_block) = fragment.split_at(split);

    assert!(general_block.contains("File size : 2.00 MiB\n"));
    assert!(!general_block.contains("Codec"));
    assert!(video_block.contains("Codec : H264\n"));
}

#[test]
fn exact_gib_boundary_renders_in_gib() {
    let report = "General\nFile size : 1 B\nVideo\nWidth : 1\n";
    let fragment = format_report(report, 1_073_741_824, &FormatOptions::default()).unwrap();
    assert!(fragment.contains("File size : 1.00 GiB\n"));

    let fragment = format_report(report, 5_242_880, &FormatOptions::default()).unwrap();
    assert!(fragment.contains("File size : 5.00 MiB\n"));
}

#[test]
fn report_without_streams_is_unusable_by_default() {
    let report = "General\nFormat : ZIP\nFile size : 4 MiB\nMenu\n00:00 : chapter\n";

    assert_eq!(format_report(report, 1024, &FormatOptions::default()), None);

    let lenient = FormatOptions {
        require_stream: false,
        ..FormatOptions::default()
    };
    let fragment = format_report(report, 1024, &lenient).unwrap();
    assert_eq!(fragment.matches("<h4>").count(), 2);
}

#[test]
fn empty_report_is_absent() {
    assert_eq!(format_report("", 0, &FormatOptions::default()), None);
}

#[test]
fn formatting_is_deterministic() {
    let first = format_report(SAMPLE_REPORT, 987_654_321, &FormatOptions::default());
    let second = format_report(SAMPLE_REPORT, 987_654_321, &FormatOptions::default());

    assert_eq!(first, second);
    assert!(first.is_some());
}

#[test]
fn zero_byte_size_is_legal() {
    let report = "General\nFile size : 9 MiB\nAudio\nFormat : MP3\n";
    let fragment = format_report(report, 0, &FormatOptions::default()).unwrap();

    assert!(fragment.contains("File size : 0.00 MiB\n"));
}
