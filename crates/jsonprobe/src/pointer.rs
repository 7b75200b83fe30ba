//! RFC 6901 JSON Pointer parsing and encoding.
//!
//! One deliberate deviation from the RFC: a dangling `~` at the end of a
//! segment, or a `~x` with an unknown `x`, is kept verbatim instead of being
//! rejected.

use alloc::{
    string::{String, ToString},
    vec::Vec,
};

/// Split a pointer into decoded reference tokens.
///
/// The empty string is the whole-document pointer and yields no tokens;
/// `"/"` yields a single empty token (the member with the empty-string key).
pub(crate) fn parse_pointer(s: &str) -> Vec<String> {
    s.split('/').skip(1).map(unescape).collect()
}

/// Encode decoded tokens back into a pointer string.
pub(crate) fn encode_pointer(tokens: &[String]) -> String {
    let mut out = String::with_capacity(64);
    for token in tokens {
        out.push('/');
        for c in token.chars() {
            match c {
                '~' => out.push_str("~0"),
                '/' => out.push_str("~1"),
                _ => out.push(c),
            }
        }
    }
    out
}

// Left to right, one escape at a time, so `~01` comes out as `~1` and not
// as a slash.
fn unescape(s: &str) -> String {
    if !s.contains('~') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('0') => out.push('~'),
            Some('1') => out.push('/'),
            Some(other) => {
                out.push('~');
                out.push(other);
            }
            None => out.push('~'),
        }
    }
    out
}
