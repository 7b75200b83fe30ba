//! Path-directed navigation: locate byte-exact fragments without building a
//! tree.
//!
//! Every navigator here shares one inner loop: drive the scanner, mirror its
//! path-changing events into a `current` pointer, and test the target
//! condition. A match hands off to the value slicer; everything else streams
//! past untouched.

use alloc::{
    borrow::Cow,
    collections::BTreeMap,
    string::{String, ToString},
    vec,
    vec::Vec,
};

use crate::{
    error::Error,
    literal::{grok_literal, next_literal},
    pointer::{encode_pointer, parse_pointer},
    scanner::{is_space, Op, Scanner},
    slice::next_scan_value,
};

/// Parse a path component this module itself wrote as an array position.
/// Anything non-numeric here means the path tracking broke, which is a bug
/// in this crate, not bad input.
fn must_parse_index(s: &str) -> usize {
    match s.parse() {
        Ok(n) => n,
        Err(_) => panic!("invalid array position {s}"),
    }
}

/// Find a section of raw JSON by [RFC 6901] JSON Pointer.
///
/// Returns the exact byte range of the addressed value, aliasing `data`.
/// `Ok(None)` means the pointer addresses nothing, including an array index
/// at or past the end. The empty pointer returns the whole buffer.
///
/// Bytes past the matched value are never validated.
///
/// # Examples
///
/// ```
/// use jsonprobe::find;
///
/// let doc = br#"{"a/b": 1, "list": [10, 11]}"#;
/// assert_eq!(find(doc, "/a~1b").unwrap(), Some(&b"1"[..]));
/// assert_eq!(find(doc, "/list/1").unwrap(), Some(&b"11"[..]));
/// assert_eq!(find(doc, "/list/9").unwrap(), None);
/// ```
///
/// [RFC 6901]: https://datatracker.ietf.org/doc/html/rfc6901
pub fn find<'a>(data: &'a [u8], pointer: &str) -> Result<Option<&'a [u8]>, Error> {
    if pointer.is_empty() {
        return Ok(Some(data));
    }
    let needle = parse_pointer(pointer);

    let mut scan = Scanner::new(data);
    let mut current: Vec<String> = Vec::with_capacity(32);
    let mut last_literal: Cow<'_, str> = Cow::Borrowed("");

    while scan.offset < data.len() {
        let c = data[scan.offset];
        scan.offset += 1;
        let op = scan.step(c);

        match op {
            Op::BeginArray => current.push(String::from("0")),
            Op::BeginObject => current.push(String::new()),
            Op::ObjectKey => {
                if let Some(top) = current.last_mut() {
                    top.clear();
                    top.push_str(&last_literal);
                }
            }
            Op::BeginLiteral => {
                if scan.key_position() {
                    last_literal = next_literal(&mut scan)?;
                }
            }
            Op::ArrayValue => {
                if let Some(top) = current.last_mut() {
                    let n = must_parse_index(top);
                    *top = (n + 1).to_string();
                }
            }
            Op::EndArray | Op::EndObject => {
                current.pop();
            }
            Op::Error => return Err(scan.take_err()),
            Op::Continue | Op::SkipSpace | Op::ObjectValue | Op::End => {}
        }

        if matches!(op, Op::BeginArray | Op::ArrayValue | Op::ObjectKey) && current == needle {
            // Peek past spaces: a closing bracket next means the pointer
            // asked for an array index that is not there.
            let mut peek = scan.offset;
            while peek < data.len() && is_space(data[peek]) {
                peek += 1;
            }
            if peek < data.len() && data[peek] == b']' {
                return Ok(None);
            }
            return next_scan_value(&mut scan).map(Some);
        }
    }

    Ok(None)
}

/// [`find`], then hand the fragment to the external decoder.
///
/// `Ok(None)` when the pointer addresses nothing; decoding failures come
/// back as [`Error::Decode`].
#[cfg(any(test, feature = "serde"))]
pub fn find_decode<'de, T>(data: &'de [u8], pointer: &str) -> Result<Option<T>, Error>
where
    T: serde::de::Deserialize<'de>,
{
    match find(data, pointer)? {
        None => Ok(None),
        Some(raw) => serde_json::from_slice(raw)
            .map(Some)
            .map_err(|e| Error::Decode(e.to_string())),
    }
}

/// Find a first-level field of the root object.
///
/// The empty field returns the whole buffer; a root that is not an object
/// yields `Ok(None)`.
pub fn first_find<'a>(data: &'a [u8], field: &str) -> Result<Option<&'a [u8]>, Error> {
    if field.is_empty() {
        return Ok(Some(data));
    }

    let mut scan = Scanner::new(data);
    let mut level = 0usize;
    let mut current: Cow<'_, str> = Cow::Borrowed("");

    while scan.offset < data.len() {
        let c = data[scan.offset];
        scan.offset += 1;
        match scan.step(c) {
            Op::BeginArray | Op::BeginObject => level += 1,
            Op::ObjectKey => {
                if level == 1 && current == field {
                    return next_scan_value(&mut scan).map(Some);
                }
            }
            Op::BeginLiteral => {
                if level == 1 && scan.key_position() {
                    current = next_literal(&mut scan)?;
                }
            }
            Op::EndArray | Op::EndObject => level -= 1,
            Op::Error => return Err(scan.take_err()),
            _ => {}
        }
    }

    Ok(None)
}

/// Alias of [`first_find`].
pub fn find_key<'a>(data: &'a [u8], field: &str) -> Result<Option<&'a [u8]>, Error> {
    first_find(data, field)
}

/// Find a first-level element of the root array.
///
/// A negative index is a usage error; a root that is not an array, or an
/// index past the end, yields `Ok(None)`.
pub fn find_index(data: &[u8], index: isize) -> Result<Option<&[u8]>, Error> {
    if index < 0 {
        return Err(Error::InvalidArrayIndex);
    }
    #[allow(clippy::cast_sign_loss)]
    let index = index as usize;

    let mut scan = Scanner::new(data);
    let mut level = 0usize;
    let mut position = 0usize;

    while scan.offset < data.len() {
        let c = data[scan.offset];
        scan.offset += 1;
        match scan.step(c) {
            Op::BeginArray => {
                level += 1;
                if level == 1 && index == 0 {
                    return next_scan_value(&mut scan).map(Some);
                }
            }
            Op::ArrayValue => {
                if level == 1 {
                    position += 1;
                    if index == position {
                        return next_scan_value(&mut scan).map(Some);
                    }
                }
            }
            Op::BeginObject => level += 1,
            Op::EndArray | Op::EndObject => level -= 1,
            Op::Error => return Err(scan.take_err()),
            _ => {}
        }
    }

    Ok(None)
}

/// Find several pointers in one left-to-right pass.
///
/// The map is keyed by the requested pointer strings. On error, everything
/// gathered up to that point is returned alongside it; inspect both.
pub fn find_many<'a>(
    data: &'a [u8],
    pointers: &[&str],
) -> (BTreeMap<String, &'a [u8]>, Option<Error>) {
    let mut found = BTreeMap::new();
    let mut tpaths: Vec<&str> = Vec::with_capacity(pointers.len());
    for &p in pointers {
        if p.is_empty() {
            found.insert(String::new(), data);
        } else {
            tpaths.push(p);
        }
    }
    tpaths.sort_unstable();
    tpaths.dedup();

    let mut scan = Scanner::new(data);
    let mut todo = tpaths.len();
    let mut began_literal = 0usize;
    let mut matched_at = 0usize;
    let mut current: Vec<String> = Vec::new();

    while todo > 0 && scan.offset < data.len() {
        let old_offset = scan.offset;
        let c = data[old_offset];
        scan.offset += 1;
        let op = scan.step(c);

        match op {
            Op::BeginArray => current.push(String::from("0")),
            Op::BeginObject => current.push(String::new()),
            Op::ObjectKey => {
                if let Some(top) = current.last_mut() {
                    *top = grok_literal(&data[began_literal - 1..old_offset]).into_owned();
                }
            }
            Op::BeginLiteral => began_literal = scan.offset,
            Op::ArrayValue => {
                if let Some(top) = current.last_mut() {
                    let n = must_parse_index(top);
                    *top = (n + 1).to_string();
                }
            }
            Op::EndArray | Op::EndObject => {
                current.pop();
            }
            Op::Error => return (found, Some(scan.take_err())),
            _ => {}
        }

        if !matches!(op, Op::BeginArray | Op::ArrayValue | Op::ObjectKey) {
            continue;
        }

        // Already backtracked out of every subtree that could still match.
        if matched_at + 1 < current.len() {
            continue;
        }
        if matched_at > current.len() {
            matched_at = current.len();
        }

        let current_str = encode_pointer(&current);
        let idx = match tpaths.binary_search(&current_str.as_str()) {
            Ok(i) | Err(i) => i,
        };
        if idx >= tpaths.len() {
            // fell off the end of the list, no possible match
            continue;
        }
        if tpaths[idx].starts_with(current_str.as_str()) {
            matched_at += 1;
        }
        if tpaths[idx] != current_str {
            continue;
        }

        // Exact match: slice it with a throwaway scanner so the main scan
        // keeps streaming.
        let mut tmp = Scanner::new(data);
        tmp.offset = scan.offset;
        match next_scan_value(&mut tmp) {
            Ok(val) => {
                found.insert(current_str, val);
                todo -= 1;
            }
            Err(e) => return (found, Some(e)),
        }
    }

    (found, None)
}

/// List every addressable pointer in the document, starting with `""` (the
/// document itself), in document order.
pub fn list_pointers(data: &[u8]) -> Result<Vec<String>, Error> {
    if data.is_empty() {
        return Err(Error::EmptyDocument);
    }
    let mut rv = vec![String::new()];

    let mut scan = Scanner::new(data);
    let mut began_literal = 0usize;
    let mut current: Vec<String> = Vec::new();

    while scan.offset < data.len() {
        let old_offset = scan.offset;
        let c = data[old_offset];
        scan.offset += 1;
        let op = scan.step(c);

        match op {
            Op::BeginArray => current.push(String::from("0")),
            Op::BeginObject => current.push(String::new()),
            Op::ObjectKey => {
                if let Some(top) = current.last_mut() {
                    *top = grok_literal(&data[began_literal - 1..old_offset]).into_owned();
                }
            }
            Op::BeginLiteral => began_literal = scan.offset,
            Op::ArrayValue => {
                if let Some(top) = current.last_mut() {
                    let n = must_parse_index(top);
                    *top = (n + 1).to_string();
                }
            }
            Op::EndArray | Op::EndObject => {
                current.pop();
            }
            Op::Error => return Err(Error::ReadFailed(old_offset)),
            _ => {}
        }

        if matches!(op, Op::BeginArray | Op::ArrayValue | Op::ObjectKey) {
            rv.push(encode_pointer(&current));
        }
    }

    Ok(rv)
}
