//! Reflection-free dynamic decoding.

use alloc::{string::String, vec::Vec};

use crate::{
    error::{Error, SyntaxError},
    literal::{next_literal, next_number},
    scanner::{Op, Scanner},
    value::{Array, Map, Value},
};

/// Decode a whole document into a [`Value`], skipping any reflective
/// machinery: the scanner's events drive three small stacks and nothing
/// else.
///
/// # Examples
///
/// ```
/// use jsonprobe::{simple_unmarshal, Value};
///
/// let v = simple_unmarshal(b"{\"n\": [1, 2.5]}").unwrap();
/// let n = v.as_object().unwrap()["n"].as_array().unwrap();
/// assert_eq!(n[0], Value::Integer(1));
/// assert_eq!(n[1], Value::Float(2.5));
/// ```
pub fn simple_unmarshal(data: &[u8]) -> Result<Value, Error> {
    let mut scan = Scanner::new(data);
    unmarshaled_value(&mut scan)
}

/// Distinguishes "no value produced yet" from "the value is null", so empty
/// containers are not flushed with a spurious element.
enum Slot {
    Unset,
    Val(Value),
}

impl Slot {
    fn take(&mut self) -> Option<Value> {
        match core::mem::replace(self, Slot::Unset) {
            Slot::Unset => None,
            Slot::Val(v) => Some(v),
        }
    }
}

/// A container under construction.
enum Frame {
    Array(Array),
    Object(Map),
}

pub(crate) fn unmarshaled_value(scan: &mut Scanner<'_>) -> Result<Value, Error> {
    let mut frames: Vec<Frame> = Vec::new();
    let mut keys: Vec<String> = Vec::new();
    let mut current = Slot::Unset;

    'outer: while scan.offset < scan.data.len() {
        let c = scan.data[scan.offset];
        scan.offset += 1;
        match scan.step(c) {
            // A string, a number, true, false or null.
            Op::BeginLiteral => match c {
                // the string is consumed here
                b'"' => {
                    let s = next_literal(scan)?;
                    current = Slot::Val(Value::String(s.into_owned()));
                }
                // presumed here, verified by the scanner's next states
                b't' => current = Slot::Val(Value::Boolean(true)),
                b'f' => current = Slot::Val(Value::Boolean(false)),
                b'n' => current = Slot::Val(Value::Null),
                // a number, consumed here
                _ => current = Slot::Val(next_number(scan, c)?),
            },
            Op::BeginArray => {
                frames.push(Frame::Array(Array::with_capacity(10)));
                current = Slot::Unset;
            }
            Op::ArrayValue => {
                let Some(Frame::Array(top)) = frames.last_mut() else {
                    return Err(Error::UnexpectedArrayValue);
                };
                top.push(current.take().unwrap_or(Value::Null));
            }
            Op::EndArray => {
                let Some(Frame::Array(mut top)) = frames.pop() else {
                    return Err(Error::UnexpectedArrayValue);
                };
                // no ArrayValue event precedes the close: flush the last
                // element, unless the array was empty
                if let Some(v) = current.take() {
                    top.push(v);
                }
                current = Slot::Val(Value::Array(top));
            }
            Op::BeginObject => {
                frames.push(Frame::Object(Map::new()));
                keys.push(String::new());
                current = Slot::Unset;
            }
            Op::ObjectKey => {
                let Some(slot) = keys.last_mut() else {
                    return Err(Error::UnexpectedObjectKey);
                };
                match current.take() {
                    Some(Value::String(k)) => *slot = k,
                    _ => return Err(Error::KeyNotString),
                }
            }
            Op::ObjectValue => {
                let Some(Frame::Object(top)) = frames.last_mut() else {
                    return Err(Error::UnexpectedObjectValue);
                };
                let Some(key) = keys.last() else {
                    return Err(Error::UnexpectedObjectValue);
                };
                top.insert(key.clone(), current.take().unwrap_or(Value::Null));
            }
            Op::EndObject => {
                let Some(Frame::Object(mut top)) = frames.pop() else {
                    return Err(Error::UnexpectedObjectValue);
                };
                // flush the final member, unless the object was empty
                if let Some(v) = current.take() {
                    if let Some(key) = keys.last() {
                        top.insert(key.clone(), v);
                    }
                }
                keys.pop();
                current = Slot::Val(Value::Object(top));
            }
            Op::SkipSpace | Op::Continue => {}
            Op::End => {
                if !scan.check_top {
                    break 'outer;
                }
            }
            Op::Error => return Err(scan.take_err()),
        }
    }

    // An unwound eof(): the latched error wins, then the virtual trailing
    // space gets one chance to complete a dangling literal.
    if let Some(err) = scan.err.clone() {
        return Err(Error::Syntax(err));
    }
    if !scan.end_top {
        scan.step(b' ');
    }
    if scan.end_top {
        return match current.take() {
            Some(v) => Ok(v),
            None => Err(unexpected_end(scan.offset)),
        };
    }
    if scan.err.is_none() || scan.offset == scan.data.len() {
        return Err(unexpected_end(scan.offset));
    }
    Err(scan.take_err())
}

fn unexpected_end(offset: usize) -> Error {
    Error::Syntax(SyntaxError {
        msg: String::from("unexpected end of JSON input"),
        offset,
    })
}

#[cfg(test)]
mod tests {
    use alloc::{borrow::ToOwned, string::ToString, vec, vec::Vec};

    use super::*;

    fn obj(members: &[(&str, Value)]) -> Value {
        Value::Object(members.iter().map(|(k, v)| ((*k).to_owned(), v.clone())).collect())
    }

    fn syn(msg: &str, offset: usize) -> Result<Value, Error> {
        Err(Error::Syntax(SyntaxError {
            msg: msg.to_string(),
            offset,
        }))
    }

    // Expected floats for the i64 overflow vectors: nearest representable
    // f64 of the literal.
    fn float_of(src: &str) -> Value {
        Value::Float(src.parse::<f64>().unwrap())
    }

    #[test]
    fn unmarshal_vectors() {
        #[allow(clippy::type_complexity)]
        let cases: Vec<(&[u8], Result<Value, Error>)> = vec![
            // basic types
            (b"true", Ok(Value::Boolean(true))),
            (b"1", Ok(Value::Integer(1))),
            (b"1.2", Ok(Value::Float(1.2))),
            (b"-5", Ok(Value::Integer(-5))),
            (b"-1.2", Ok(Value::Float(-1.2))),
            (b"\"a\\u1234\"", Ok(Value::from("a\u{1234}"))),
            (b"\"http:\\/\\/\"", Ok(Value::from("http://"))),
            (b"\"g-clef: \\uD834\\uDD1E\"", Ok(Value::from("g-clef: \u{1D11E}"))),
            (
                b"\"invalid: \\uD834x\\uDD1E\"",
                Ok(Value::from("invalid: \u{FFFD}x\u{FFFD}")),
            ),
            (b"null", Ok(Value::Null)),
            (
                b"{\"X\": [1,2,3], \"Y\": 4}",
                Ok(obj(&[
                    (
                        "X",
                        Value::Array(vec![
                            Value::Integer(1),
                            Value::Integer(2),
                            Value::Integer(3),
                        ]),
                    ),
                    ("Y", Value::Integer(4)),
                ])),
            ),
            (b"{\"x\": 1}", Ok(obj(&[("x", Value::Integer(1))]))),
            // raw values with whitespace
            (b"\n true ", Ok(Value::Boolean(true))),
            (b"\t 1 ", Ok(Value::Integer(1))),
            (b"\r 1.2 ", Ok(Value::Float(1.2))),
            (b"\t -5 \n", Ok(Value::Integer(-5))),
            (b"\t \"a\\u1234\" \n", Ok(Value::from("a\u{1234}"))),
            // syntax errors
            (b"nulll", syn("invalid character 'l' after top-level value", 5)),
            (b"nul1", syn("invalid character '1' in literal null (expecting 'l')", 4)),
            (b"nul", syn("unexpected end of JSON input", 3)),
            (b"mull", syn("invalid character 'm' looking for beginning of value", 1)),
            (b"truee", syn("invalid character 'e' after top-level value", 5)),
            (b"tru3", syn("invalid character '3' in literal true (expecting 'e')", 4)),
            (b"tru", syn("unexpected end of JSON input", 3)),
            (b"falsee", syn("invalid character 'e' after top-level value", 6)),
            (b"fals3", syn("invalid character '3' in literal false (expecting 'e')", 5)),
            (b"fals", syn("unexpected end of JSON input", 4)),
            (b"00", syn("invalid character '0' after top-level value", 2)),
            (b".0", syn("invalid character '.' looking for beginning of value", 1)),
            (b"\"aaa", syn("unexpected end of JSON input", 4)),
            (
                b"{\"X\": \"foo\", \"Y\"}",
                syn("invalid character '}' after object key", 17),
            ),
            (b"[1, 2, 3+]", syn("invalid character '+' after array element", 9)),
            (
                b"{\"X\":12x}",
                syn("invalid character 'x' after object key:value pair", 8),
            ),
            (
                b"{\"X\":12} {\"Y\":13}",
                syn("invalid character '{' after top-level value", 10),
            ),
            // raw value errors
            (b"\x01 42", syn("invalid character '\\x01' looking for beginning of value", 1)),
            (b" 42 \x01", syn("invalid character '\\x01' after top-level value", 5)),
            (b"\x01 true", syn("invalid character '\\x01' looking for beginning of value", 1)),
            (b" false \x01", syn("invalid character '\\x01' after top-level value", 8)),
            (b"\x01 1.2", syn("invalid character '\\x01' looking for beginning of value", 1)),
            (b" 3.4 \x01", syn("invalid character '\\x01' after top-level value", 6)),
            (
                b"\x01 \"string\"",
                syn("invalid character '\\x01' looking for beginning of value", 1),
            ),
            (
                b" \"string\" \x01",
                syn("invalid character '\\x01' after top-level value", 11),
            ),
            // array tests
            (
                b"[1, 2, 3]",
                Ok(Value::Array(vec![
                    Value::Integer(1),
                    Value::Integer(2),
                    Value::Integer(3),
                ])),
            ),
            // empty containers
            (b"[]", Ok(Value::Array(vec![]))),
            (b"{\"T\":[]}", Ok(obj(&[("T", Value::Array(vec![]))]))),
            (b"{\"T\":null}", Ok(obj(&[("T", Value::Null)]))),
            // integer-looking keys stay strings
            (
                b"{\"-1\":\"a\",\"0\":\"b\",\"1\":\"c\"}",
                Ok(obj(&[("-1", "a".into()), ("0", "b".into()), ("1", "c".into())])),
            ),
            (
                b"{\"0\":false,\"10\":true}",
                Ok(obj(&[("0", false.into()), ("10", true.into())])),
            ),
            // invalid UTF-8 is coerced to valid UTF-8
            (b"\"hello\xffworld\"", Ok(Value::from("hello\u{FFFD}world"))),
            (b"\"hello\xc2\xc2world\"", Ok(Value::from("hello\u{FFFD}\u{FFFD}world"))),
            (b"\"hello\xc2\xffworld\"", Ok(Value::from("hello\u{FFFD}\u{FFFD}world"))),
            (b"\"hello\\ud800world\"", Ok(Value::from("hello\u{FFFD}world"))),
            (
                b"\"hello\\ud800\\ud800world\"",
                Ok(Value::from("hello\u{FFFD}\u{FFFD}world")),
            ),
            (
                b"\"hello\xed\xa0\x80\xed\xb0\x80world\"",
                Ok(Value::from(
                    "hello\u{FFFD}\u{FFFD}\u{FFFD}\u{FFFD}\u{FFFD}\u{FFFD}world",
                )),
            ),
            // large numbers around the i64 boundary
            (b"-5106534569952410475", Ok(Value::Integer(-5_106_534_569_952_410_475))),
            (b"18446744073709551610", Ok(float_of("18446744073709551610"))),
            (b"23456789012345678901", Ok(float_of("23456789012345678901"))),
            (b"9223372036854775807", Ok(Value::Integer(i64::MAX))),
            (b"9223372036854775808", Ok(float_of("9223372036854775808"))),
            (b"-9223372036854775808", Ok(Value::Integer(i64::MIN))),
            (b"-9223372036854775809", Ok(float_of("-9223372036854775809"))),
            (b"-92233720368547758080", Ok(float_of("-92233720368547758080"))),
        ];

        for (i, (input, want)) in cases.iter().enumerate() {
            let got = simple_unmarshal(input);
            assert_eq!(
                &got,
                want,
                "case {i}: {:?}",
                alloc::string::String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn unmarshal_interface_probe() {
        let v = simple_unmarshal(b"{\"X\":1}").unwrap();
        let m = v.as_object().expect("did not find a map");
        assert_eq!(m["X"].as_i64(), Some(1));
    }

    #[test]
    fn nested_containers() {
        let v = simple_unmarshal(b"[{\"a\": [[]]}, [{}], null]").unwrap();
        assert_eq!(
            v,
            Value::Array(vec![
                obj(&[("a", Value::Array(vec![Value::Array(vec![])]))]),
                Value::Array(vec![obj(&[])]),
                Value::Null,
            ])
        );
    }

    #[test]
    fn duplicate_keys_last_wins() {
        let v = simple_unmarshal(b"{\"a\":1,\"a\":2}").unwrap();
        assert_eq!(v, obj(&[("a", Value::Integer(2))]));
    }

    #[test]
    fn empty_input() {
        assert_eq!(simple_unmarshal(b""), syn("unexpected end of JSON input", 0));
        assert_eq!(simple_unmarshal(b"  "), syn("unexpected end of JSON input", 2));
    }
}
