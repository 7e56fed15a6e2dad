/// Escapes special characters in a file name so it is safe to use as a path
/// component on any file system.
///
/// Replaced characters:
/// - `/`, `\` (path separators) -> `_`
/// - `:`, `*`, `?`, `<`, `>`, `|` (reserved on Windows) -> `_`
/// - `"` -> `'`
/// - control characters (0x00-0x1F) -> `_`
///
/// Leading and trailing whitespace and dots are stripped. An empty result
/// falls back to `"unnamed"`.
///
/// # Example
///
/// ```
/// use peekcore::core::utils::escape_filename;
///
/// let safe = escape_filename("clip/name*.mkv");
/// assert_eq!(safe, "clip_name_.mkv");
/// ```
pub fn escape_filename(filename: &str) -> String {
    let mut result = String::with_capacity(filename.len());

    for c in filename.chars() {
        match c {
            '/' | '\\' => result.push('_'),
            ':' | '*' | '?' | '<' | '>' | '|' => result.push('_'),
            '"' => result.push('\''),
            c if c.is_control() => result.push('_'),
            _ => result.push(c),
        }
    }

    let result = result.trim_matches(|c: char| c.is_whitespace() || c == '.');

    if result.is_empty() {
        "unnamed".to_string()
    } else {
        result.to_string()
    }
}

const GIB: u64 = 1 << 30;
const MIB: u64 = 1 << 20;

/// Renders a byte count as a human-readable size string.
///
/// Sizes of 1 GiB and above render as `"<value> GiB"`, everything below as
/// `"<value> MiB"`, both with two decimal digits. This is the normalized
/// value substituted into the report's `File size` line, where the tool's own
/// number cannot be trusted because it may have inspected only a truncated
/// prefix of the file.
///
/// # Example
///
/// ```
/// use peekcore::core::utils::format_size;
///
/// assert_eq!(format_size(5 * 1024 * 1024), "5.00 MiB");
/// assert_eq!(format_size(1 << 30), "1.00 GiB");
/// ```
pub fn format_size(bytes: u64) -> String {
    if bytes >= GIB {
        format!("{:.2} GiB", bytes as f64 / GIB as f64)
    } else {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    }
}

/// Escapes the characters Telegram's HTML parse mode reserves.
///
/// Applied to user-controlled values (file names, error text) interpolated
/// into HTML replies.
///
/// # Example
///
/// ```
/// use peekcore::core::utils::escape_html;
///
/// assert_eq!(escape_html("a <b> & c"), "a &lt;b&gt; &amp; c");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::{escape_filename, escape_html, format_size};

    #[test]
    fn test_escape_filename() {
        // Path separators
        assert_eq!(escape_filename("clip/name.mkv"), "clip_name.mkv");
        assert_eq!(escape_filename("path\\to\\file.mp4"), "path_to_file.mp4");

        // Reserved Windows characters
        assert_eq!(escape_filename("file:name*.mkv"), "file_name_.mkv");
        assert_eq!(escape_filename("title?<>|.mp4"), "title____.mp4");

        // Quotes
        assert_eq!(escape_filename("clip \"live\".mkv"), "clip 'live'.mkv");

        // Leading/trailing whitespace and dots
        assert_eq!(escape_filename("  file.mkv  "), "file.mkv");
        assert_eq!(escape_filename("...file..."), "file");

        // Empty name
        assert_eq!(escape_filename(""), "unnamed");
        assert_eq!(escape_filename("..."), "unnamed");
        assert_eq!(escape_filename("   "), "unnamed");

        // Non-ASCII survives untouched
        assert_eq!(escape_filename("Фильм - серия.mkv"), "Фильм - серия.mkv");
        assert_eq!(escape_filename("Clip (2024) [x264].mkv"), "Clip (2024) [x264].mkv");
    }

    #[test]
    fn test_format_size_mib() {
        assert_eq!(format_size(0), "0.00 MiB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.00 MiB");
        assert_eq!(format_size(2 * 1024 * 1024), "2.00 MiB");
        assert_eq!(format_size(1_572_864), "1.50 MiB");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("movie.mkv"), "movie.mkv");
        assert_eq!(escape_html("a<b>&c"), "a&lt;b&gt;&amp;c");
        assert_eq!(escape_html("&&"), "&amp;&amp;");
    }

    #[test]
    fn test_format_size_gib_boundary() {
        // Exactly 1 GiB already renders in GiB
        assert_eq!(format_size(1_073_741_824), "1.00 GiB");
        assert_eq!(format_size(1_073_741_823), "1024.00 MiB");
        assert_eq!(format_size(3_221_225_472), "3.00 GiB");
    }
}
