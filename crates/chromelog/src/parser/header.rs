//! Header aggregation — joins transport header fragments into encoded blobs.
//!
//! Servers split large payloads over several physical headers of the same
//! name, and some transports fold repeated headers into one value joined
//! with commas. Either way the fragments are pieces of one base64 string.

use std::collections::HashMap;

use super::model::{HeaderGroup, RawHeader};
use super::RECOGNIZED_HEADER_PREFIXES;

/// Check whether a header name carries ChromeLogger data (case-insensitive prefix match).
pub fn is_recognized(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    RECOGNIZED_HEADER_PREFIXES
        .iter()
        .any(|prefix| lower.starts_with(prefix))
}

/// Group recognized headers by name, preserving first-seen name order.
///
/// Commas are removed from every value before concatenation; they are
/// join artifacts, never base64 content. Unrecognized headers are skipped.
pub fn aggregate(headers: &[RawHeader]) -> Vec<HeaderGroup> {
    let mut groups: Vec<HeaderGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for header in headers.iter().filter(|h| is_recognized(&h.name)) {
        let key = header.name.to_ascii_lowercase();
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(HeaderGroup {
                name: header.name.clone(),
                blob: String::new(),
            });
            groups.len() - 1
        });

        groups[slot]
            .blob
            .extend(header.value.chars().filter(|&c| c != ','));
    }

    groups
}
