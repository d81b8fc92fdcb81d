//! Input — parsing of raw HTTP response header dumps.

use crate::parser::RawHeader;

/// Parse `Name: value` lines into headers, in order.
///
/// Status lines (`HTTP/1.1 200 OK`), blank lines and lines without a colon
/// are skipped. Values are trimmed; names are kept as written.
pub fn parse_header_dump(text: &str) -> Vec<RawHeader> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim_end_matches('\r');
            if line.starts_with("HTTP/") {
                return None;
            }
            let (name, value) = line.split_once(':')?;
            let name = name.trim();
            if name.is_empty() || name.contains(char::is_whitespace) {
                return None;
            }
            Some(RawHeader::new(name, value.trim()))
        })
        .collect()
}
