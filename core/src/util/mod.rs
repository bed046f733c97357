/// Line separator used when normalizing statement text and writing reports.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Re-terminates every line of `text` with [`LINE_SEPARATOR`].
///
/// Mixed `\n` / `\r\n` input is accepted; the last line always gets a
/// terminator, even if the source file had none.
pub fn normalize_line_endings(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + LINE_SEPARATOR.len());
    for line in text.lines() {
        out.push_str(line);
        out.push_str(LINE_SEPARATOR);
    }
    out
}
