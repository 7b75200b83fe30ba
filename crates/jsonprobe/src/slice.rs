//! Whole-value slicing: identify the byte range of the value the scanner is
//! sitting on and move past it, without inspecting its contents.

use crate::{
    error::Error,
    scanner::{is_space, Op, Scanner, State},
    simple::unmarshaled_value,
    value::Value,
};

/// Identify the next whole value and return its byte range, preserving the
/// outer scan and moving it along to the rest of the document.
///
/// The range is walked by a temporary scanner with `check_top` off, since
/// completing a sub-value mid-document must not read as trailing garbage.
/// Container values advance the outer scanner one byte past the closing
/// brace or bracket, in end-value state; scalars leave it untouched, and the
/// outer scan re-reads them in stride.
pub(crate) fn next_scan_value<'a>(scan: &mut Scanner<'a>) -> Result<&'a [u8], Error> {
    let data = scan.data;

    let mut tmp = Scanner::new(data);
    tmp.check_top = false;
    tmp.offset = scan.offset;

    // get to the beginning of the token
    if tmp.offset < data.len() && is_space(data[tmp.offset]) {
        tmp.offset += 1;
    }

    let start = tmp.offset;
    while tmp.offset < data.len() {
        let i = tmp.offset;
        let c = data[i];
        tmp.offset += 1;
        match tmp.step(c) {
            Op::EndObject | Op::EndArray => {
                // A container closed. It is the one we started on only if
                // the walk is back at depth zero, which one virtual space
                // confirms.
                if tmp.step(b' ') == Op::End {
                    scan.offset = tmp.offset;
                    scan.state = State::EndValue;
                    return Ok(&data[start..=i]);
                }
            }
            Op::End => {
                // Scalar: the terminator byte stays with the outer scan.
                return Ok(&data[start..i]);
            }
            Op::Error => return Err(tmp.take_err()),
            _ => {}
        }
    }
    if tmp.eof() == Op::Error {
        return Err(tmp.take_err());
    }
    Ok(&data[start..])
}

/// Decode the next whole value mid-scan, then put the outer scanner back
/// just before the byte that terminated it, in end-value state.
pub(crate) fn next_unmarshaled_value(scan: &mut Scanner<'_>) -> Result<Value, Error> {
    let mut tmp = Scanner::new(scan.data);
    tmp.check_top = false;
    tmp.offset = scan.offset;

    let val = unmarshaled_value(&mut tmp)?;

    // the inner walk has gone one byte past the terminator
    scan.offset = tmp.offset - 1;
    scan.state = State::EndValue;
    Ok(val)
}
