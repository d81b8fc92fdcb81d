//! Console format directive scanning.
//!
//! Recognized directives are `%s %d %i %f %o %O %c` and the precision forms
//! `%.<digits>` followed by `d`, `i` or `f`. A directive preceded by a run of
//! `k` percent signs is live when `k` is odd; an even run is an escaped
//! literal `%` followed by plain text.

use std::borrow::Cow;

/// One directive-looking sequence found in a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Byte offset of the first `%` of the run
    pub offset: usize,
    /// Length of the `%` run in front of the specifier
    pub percent_run: usize,
    /// Specifier text after the run, e.g. `s` or `.2f`
    pub spec: &'a str,
}

impl Directive<'_> {
    pub fn is_live(&self) -> bool {
        self.percent_run % 2 == 1
    }
}

/// Iterator over directive-looking sequences, live or escaped.
pub struct Directives<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Iterator for Directives<'a> {
    type Item = Directive<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.text.as_bytes();
        while self.pos < bytes.len() {
            if bytes[self.pos] != b'%' {
                self.pos += 1;
                continue;
            }

            let start = self.pos;
            while self.pos < bytes.len() && bytes[self.pos] == b'%' {
                self.pos += 1;
            }

            if let Some(len) = spec_len(&bytes[self.pos..]) {
                let spec = &self.text[self.pos..self.pos + len];
                self.pos += len;
                return Some(Directive {
                    offset: start,
                    percent_run: self.pos - len - start,
                    spec,
                });
            }
        }
        None
    }
}

/// Scan `text` for directive-looking sequences.
pub fn directives(text: &str) -> Directives<'_> {
    Directives { text, pos: 0 }
}

/// True when `text` contains at least one live directive, i.e. it is
/// already a substitution pattern.
pub fn has_live_directive(text: &str) -> bool {
    directives(text).any(|d| d.is_live())
}

/// Collapse any run of two or more `%` directly before a directive to a
/// single `%`, reversing the escaping producers apply to literal text.
pub fn unescape(text: &str) -> Cow<'_, str> {
    if !text.contains("%%") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for directive in directives(text).filter(|d| d.percent_run >= 2) {
        out.push_str(&text[last..directive.offset]);
        out.push('%');
        last = directive.offset + directive.percent_run;
    }

    if last == 0 {
        return Cow::Borrowed(text);
    }
    out.push_str(&text[last..]);
    Cow::Owned(out)
}

/// Length of the specifier at the start of `rest`, if any.
fn spec_len(rest: &[u8]) -> Option<usize> {
    match rest.first()? {
        b's' | b'd' | b'i' | b'f' | b'o' | b'O' | b'c' => Some(1),
        b'.' => {
            let digits = rest[1..].iter().take_while(|b| b.is_ascii_digit()).count();
            if digits == 0 {
                return None;
            }
            match rest.get(1 + digits)? {
                b'd' | b'i' | b'f' => Some(digits + 2),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Live directive detection ─────────────────────────────────

    #[test]
    fn test_simple_directives_are_live() {
        for pattern in ["%s", "%d", "%i", "%f", "%o", "%O", "%c"] {
            assert!(has_live_directive(pattern), "{} should be live", pattern);
        }
        assert!(has_live_directive("user %s logged in"));
    }

    #[test]
    fn test_precision_directives() {
        assert!(has_live_directive("%.2f"));
        assert!(has_live_directive("took %.10d ms"));
        assert!(!has_live_directive("%.f"));
        assert!(!has_live_directive("%.2x"));
        assert!(!has_live_directive("%.2"));
    }

    #[test]
    fn test_escaped_directive_is_not_live() {
        assert!(!has_live_directive("100%%s"));
        assert!(!has_live_directive("%%%%d"));
        assert!(has_live_directive("%%%s"));
        assert!(has_live_directive("%%%%%c"));
    }

    #[test]
    fn test_plain_text_has_no_directive() {
        assert!(!has_live_directive(""));
        assert!(!has_live_directive("hello world"));
        assert!(!has_live_directive("50% off"));
        assert!(!has_live_directive("%"));
        assert!(!has_live_directive("%x %y"));
    }

    #[test]
    fn test_directive_offsets_and_specs() {
        let found: Vec<_> = directives("a %s b %%.3f").collect();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], Directive { offset: 2, percent_run: 1, spec: "s" });
        assert_eq!(found[1], Directive { offset: 7, percent_run: 2, spec: ".3f" });
        assert!(found[0].is_live());
        assert!(!found[1].is_live());
    }

    #[test]
    fn test_multibyte_text_around_directives() {
        let found: Vec<_> = directives("日本 %s ✓").collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].spec, "s");
    }

    // ── Unescaping ───────────────────────────────────────────────

    #[test]
    fn test_unescape_collapses_runs_before_directives() {
        assert_eq!(unescape("100%%s"), "100%s");
        assert_eq!(unescape("100%%%s"), "100%s");
        assert_eq!(unescape("%%%%.2f done"), "%.2f done");
    }

    #[test]
    fn test_unescape_leaves_other_percents() {
        assert_eq!(unescape("50%% off"), "50%% off");
        assert_eq!(unescape("%s stays"), "%s stays");
        assert!(matches!(unescape("no percent"), Cow::Borrowed(_)));
        assert!(matches!(unescape("50%% off"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_unescape_multiple_runs() {
        assert_eq!(unescape("é %%d and %%%o ü"), "é %d and %o ü");
    }
}
