//! Byte-at-a-time JSON scanner.
//!
//! The scanner classifies each input byte into a structural [`Op`] while
//! keeping just enough bookkeeping (a parse stack and a state tag) to resume
//! mid-document. Navigators drive it one byte at a time:
//!
//! ```text
//! let c = scan.data[scan.offset];
//! scan.offset += 1;
//! match scan.step(c) { ... }
//! ```
//!
//! State is a tag, not data: [`Scanner::step`] dispatches on [`State`] and
//! never recurses over the input, so deeply nested documents cost O(1)
//! native stack. Nesting depth lives in the heap-allocated parse stack.

use alloc::{format, string::String, vec::Vec};

use crate::error::{Error, SyntaxError};

/// Structural classification of one scanned byte.
///
/// Emission order is significant: a container close (`EndObject`/`EndArray`)
/// is reported for its closing byte, while [`Op::End`] is reported by the
/// *following* byte once the outermost value has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    /// Byte consumed, no boundary crossed.
    Continue,
    /// First byte of a string, number, `true`, `false` or `null`.
    BeginLiteral,
    BeginObject,
    /// An object key just finished (emitted at the colon).
    ObjectKey,
    /// A non-final object member just finished (emitted at the comma).
    ObjectValue,
    EndObject,
    BeginArray,
    /// A non-final array element just finished (emitted at the comma).
    ArrayValue,
    EndArray,
    /// Insignificant whitespace.
    SkipSpace,
    /// The top-level value ended before this byte.
    End,
    /// A syntax error was latched; see [`Scanner::take_err`].
    Error,
}

/// What the innermost open container is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseState {
    ObjectKey,
    ObjectValue,
    ArrayValue,
}

/// The transition the next byte will be fed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    BeginValue,
    /// Like `BeginValue`, but `]` is also acceptable (just after `[`).
    BeginValueOrEmpty,
    BeginString,
    /// Like `BeginString`, but `}` is also acceptable (just after `{`).
    BeginStringOrEmpty,
    EndValue,
    /// The top-level value is complete; only whitespace may follow.
    EndTop,
    InString,
    InStringEsc,
    InStringEscU,
    InStringEscU1,
    InStringEscU12,
    InStringEscU123,
    Neg,
    Zero,
    Digits,
    Dot,
    DotDigits,
    Exp,
    ExpSign,
    ExpDigits,
    T,
    Tr,
    Tru,
    F,
    Fa,
    Fal,
    Fals,
    N,
    Nu,
    Nul,
    /// Replays a saved op for a byte handed back by [`Scanner::undo`].
    Redo,
    Error,
}

/// JSON whitespace.
#[inline]
pub(crate) fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r')
}

/// The resumable scanner state over one input buffer.
///
/// Callers own the `offset` cursor; the scanner owns everything else. Once
/// an error is latched every further step reports [`Op::Error`].
#[derive(Debug, Clone)]
pub(crate) struct Scanner<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) offset: usize,
    pub(crate) state: State,
    parse_state: Vec<ParseState>,
    pub(crate) err: Option<SyntaxError>,
    /// Latched when the top-level value has been completely consumed.
    pub(crate) end_top: bool,
    /// When false, bytes trailing a complete value are tolerated. Sub-value
    /// extraction turns this off so finishing mid-document is not an error.
    pub(crate) check_top: bool,
    /// Number hint: attempt i64 accumulation until a float marker shows up.
    pub(crate) use_ints: bool,
    redo_op: Op,
    redo_state: State,
}

impl<'a> Scanner<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Scanner {
            data,
            offset: 0,
            state: State::BeginValue,
            parse_state: Vec::new(),
            err: None,
            end_top: false,
            check_top: true,
            use_ints: false,
            redo_op: Op::Continue,
            redo_state: State::BeginValue,
        }
    }

    /// Feed one byte through the current transition.
    pub(crate) fn step(&mut self, c: u8) -> Op {
        match self.state {
            State::BeginValue => self.state_begin_value(c),
            State::BeginValueOrEmpty => self.state_begin_value_or_empty(c),
            State::BeginString => self.state_begin_string(c),
            State::BeginStringOrEmpty => self.state_begin_string_or_empty(c),
            State::EndValue => self.state_end_value(c),
            State::EndTop => self.state_end_top(c),
            State::InString => self.state_in_string(c),
            State::InStringEsc => self.state_in_string_esc(c),
            State::InStringEscU => self.state_in_string_esc_u(c, State::InStringEscU1),
            State::InStringEscU1 => self.state_in_string_esc_u(c, State::InStringEscU12),
            State::InStringEscU12 => self.state_in_string_esc_u(c, State::InStringEscU123),
            State::InStringEscU123 => self.state_in_string_esc_u(c, State::InString),
            State::Neg => self.state_neg(c),
            State::Zero => self.state_zero(c),
            State::Digits => self.state_digits(c),
            State::Dot => self.state_dot(c),
            State::DotDigits => self.state_dot_digits(c),
            State::Exp => self.state_exp(c),
            State::ExpSign => self.state_exp_sign(c),
            State::ExpDigits => self.state_exp_digits(c),
            State::T => self.state_literal(c, b'r', State::Tr, "in literal true (expecting 'r')"),
            State::Tr => self.state_literal(c, b'u', State::Tru, "in literal true (expecting 'u')"),
            State::Tru => {
                self.state_literal(c, b'e', State::EndValue, "in literal true (expecting 'e')")
            }
            State::F => self.state_literal(c, b'a', State::Fa, "in literal false (expecting 'a')"),
            State::Fa => self.state_literal(c, b'l', State::Fal, "in literal false (expecting 'l')"),
            State::Fal => {
                self.state_literal(c, b's', State::Fals, "in literal false (expecting 's')")
            }
            State::Fals => {
                self.state_literal(c, b'e', State::EndValue, "in literal false (expecting 'e')")
            }
            State::N => self.state_literal(c, b'u', State::Nu, "in literal null (expecting 'u')"),
            State::Nu => self.state_literal(c, b'l', State::Nul, "in literal null (expecting 'l')"),
            State::Nul => {
                self.state_literal(c, b'l', State::EndValue, "in literal null (expecting 'l')")
            }
            State::Redo => {
                self.state = self.redo_state;
                self.redo_op
            }
            State::Error => Op::Error,
        }
    }

    /// Rewind one byte and arrange for `op` to be re-emitted when the
    /// scanner steps over it again. The number extractor uses this to peek
    /// at the byte that terminated a number and hand it back to the caller's
    /// drive loop.
    pub(crate) fn undo(&mut self, op: Op) {
        self.redo_op = op;
        self.redo_state = self.state;
        self.state = State::Redo;
        self.offset -= 1;
    }

    /// Virtual trailing space: decides whether running out of input left a
    /// complete top-level value behind.
    pub(crate) fn eof(&mut self) -> Op {
        if self.err.is_some() {
            return Op::Error;
        }
        if self.end_top {
            return Op::End;
        }
        self.step(b' ');
        if self.end_top {
            return Op::End;
        }
        if self.err.is_none() {
            self.err = Some(SyntaxError {
                msg: String::from("unexpected end of JSON input"),
                offset: self.offset,
            });
        }
        Op::Error
    }

    /// True when the scanner sits inside an object at key position.
    pub(crate) fn key_position(&self) -> bool {
        matches!(self.parse_state.last(), Some(ParseState::ObjectKey))
    }

    /// The latched syntax error. Only meaningful after an [`Op::Error`].
    pub(crate) fn take_err(&self) -> Error {
        match &self.err {
            Some(e) => Error::Syntax(e.clone()),
            None => Error::Syntax(SyntaxError {
                msg: String::from("unexpected end of JSON input"),
                offset: self.offset,
            }),
        }
    }

    /// Latch a syntax error for `c`; every later step reports [`Op::Error`].
    pub(crate) fn latch_err(&mut self, c: u8, context: &str) -> SyntaxError {
        let err = SyntaxError {
            msg: format!("invalid character {} {context}", quote_char(c)),
            offset: self.offset,
        };
        self.state = State::Error;
        self.err = Some(err.clone());
        err
    }

    fn error(&mut self, c: u8, context: &str) -> Op {
        self.latch_err(c, context);
        Op::Error
    }

    fn push_parse_state(&mut self, p: ParseState) {
        self.parse_state.push(p);
    }

    fn pop_parse_state(&mut self) {
        self.parse_state.pop();
        if self.parse_state.is_empty() {
            self.state = State::EndTop;
            self.end_top = true;
        } else {
            self.state = State::EndValue;
        }
    }

    fn state_begin_value_or_empty(&mut self, c: u8) -> Op {
        if is_space(c) {
            return Op::SkipSpace;
        }
        if c == b']' {
            return self.state_end_value(c);
        }
        self.state_begin_value(c)
    }

    fn state_begin_value(&mut self, c: u8) -> Op {
        if is_space(c) {
            return Op::SkipSpace;
        }
        match c {
            b'{' => {
                self.state = State::BeginStringOrEmpty;
                self.push_parse_state(ParseState::ObjectKey);
                Op::BeginObject
            }
            b'[' => {
                self.state = State::BeginValueOrEmpty;
                self.push_parse_state(ParseState::ArrayValue);
                Op::BeginArray
            }
            b'"' => {
                self.state = State::InString;
                Op::BeginLiteral
            }
            b'-' => {
                self.state = State::Neg;
                self.use_ints = true;
                Op::BeginLiteral
            }
            b'0' => {
                self.state = State::Zero;
                self.use_ints = true;
                Op::BeginLiteral
            }
            b'1'..=b'9' => {
                self.state = State::Digits;
                self.use_ints = true;
                Op::BeginLiteral
            }
            b't' => {
                self.state = State::T;
                Op::BeginLiteral
            }
            b'f' => {
                self.state = State::F;
                Op::BeginLiteral
            }
            b'n' => {
                self.state = State::N;
                Op::BeginLiteral
            }
            _ => self.error(c, "looking for beginning of value"),
        }
    }

    fn state_begin_string_or_empty(&mut self, c: u8) -> Op {
        if is_space(c) {
            return Op::SkipSpace;
        }
        if c == b'}' {
            if let Some(top) = self.parse_state.last_mut() {
                *top = ParseState::ObjectValue;
            }
            return self.state_end_value(c);
        }
        self.state_begin_string(c)
    }

    fn state_begin_string(&mut self, c: u8) -> Op {
        if is_space(c) {
            return Op::SkipSpace;
        }
        if c == b'"' {
            self.state = State::InString;
            return Op::BeginLiteral;
        }
        self.error(c, "looking for beginning of object key string")
    }

    fn state_end_value(&mut self, c: u8) -> Op {
        let n = self.parse_state.len();
        if n == 0 {
            // Completed the top-level value before this byte.
            self.state = State::EndTop;
            self.end_top = true;
            return self.state_end_top(c);
        }
        if is_space(c) {
            self.state = State::EndValue;
            return Op::SkipSpace;
        }
        match self.parse_state[n - 1] {
            ParseState::ObjectKey => {
                if c == b':' {
                    self.parse_state[n - 1] = ParseState::ObjectValue;
                    self.state = State::BeginValue;
                    return Op::ObjectKey;
                }
                self.error(c, "after object key")
            }
            ParseState::ObjectValue => {
                if c == b',' {
                    self.parse_state[n - 1] = ParseState::ObjectKey;
                    self.state = State::BeginString;
                    return Op::ObjectValue;
                }
                if c == b'}' {
                    self.pop_parse_state();
                    return Op::EndObject;
                }
                self.error(c, "after object key:value pair")
            }
            ParseState::ArrayValue => {
                if c == b',' {
                    self.state = State::BeginValue;
                    return Op::ArrayValue;
                }
                if c == b']' {
                    self.pop_parse_state();
                    return Op::EndArray;
                }
                self.error(c, "after array element")
            }
        }
    }

    fn state_end_top(&mut self, c: u8) -> Op {
        if self.check_top && !is_space(c) {
            // Complain about trailing garbage; this byte still reports End,
            // the latched error surfaces on the next step.
            self.error(c, "after top-level value");
        }
        Op::End
    }

    fn state_in_string(&mut self, c: u8) -> Op {
        match c {
            b'"' => {
                self.state = State::EndValue;
                Op::Continue
            }
            b'\\' => {
                self.state = State::InStringEsc;
                Op::Continue
            }
            _ if c < 0x20 => self.error(c, "in string literal"),
            _ => Op::Continue,
        }
    }

    fn state_in_string_esc(&mut self, c: u8) -> Op {
        match c {
            b'b' | b'f' | b'n' | b'r' | b't' | b'\\' | b'/' | b'"' => {
                self.state = State::InString;
                Op::Continue
            }
            b'u' => {
                self.state = State::InStringEscU;
                Op::Continue
            }
            _ => self.error(c, "in string escape code"),
        }
    }

    fn state_in_string_esc_u(&mut self, c: u8, next: State) -> Op {
        if c.is_ascii_hexdigit() {
            self.state = next;
            return Op::Continue;
        }
        self.error(c, "in \\u hexadecimal character escape")
    }

    fn state_neg(&mut self, c: u8) -> Op {
        match c {
            b'0' => {
                self.state = State::Zero;
                Op::Continue
            }
            b'1'..=b'9' => {
                self.state = State::Digits;
                Op::Continue
            }
            _ => self.error(c, "in numeric literal"),
        }
    }

    // After a leading zero, or delegated to once the integer digits run out.
    fn state_zero(&mut self, c: u8) -> Op {
        match c {
            b'.' => {
                self.use_ints = false;
                self.state = State::Dot;
                Op::Continue
            }
            b'e' | b'E' => {
                self.use_ints = false;
                self.state = State::Exp;
                Op::Continue
            }
            _ => self.state_end_value(c),
        }
    }

    fn state_digits(&mut self, c: u8) -> Op {
        if c.is_ascii_digit() {
            return Op::Continue;
        }
        self.state_zero(c)
    }

    fn state_dot(&mut self, c: u8) -> Op {
        if c.is_ascii_digit() {
            self.state = State::DotDigits;
            return Op::Continue;
        }
        self.error(c, "after decimal point in numeric literal")
    }

    fn state_dot_digits(&mut self, c: u8) -> Op {
        if c.is_ascii_digit() {
            return Op::Continue;
        }
        if matches!(c, b'e' | b'E') {
            self.state = State::Exp;
            return Op::Continue;
        }
        self.state_end_value(c)
    }

    fn state_exp(&mut self, c: u8) -> Op {
        if matches!(c, b'+' | b'-') {
            self.state = State::ExpSign;
            return Op::Continue;
        }
        self.state_exp_sign(c)
    }

    fn state_exp_sign(&mut self, c: u8) -> Op {
        if c.is_ascii_digit() {
            self.state = State::ExpDigits;
            return Op::Continue;
        }
        self.error(c, "in exponent of numeric literal")
    }

    fn state_exp_digits(&mut self, c: u8) -> Op {
        if c.is_ascii_digit() {
            return Op::Continue;
        }
        self.state_end_value(c)
    }

    fn state_literal(&mut self, c: u8, want: u8, next: State, context: &'static str) -> Op {
        if c == want {
            self.state = next;
            return Op::Continue;
        }
        self.error(c, context)
    }
}

/// Render a byte for an error message, matching the quoting convention the
/// historical test vectors were recorded with.
fn quote_char(c: u8) -> String {
    match c {
        b'\'' => String::from("'\\''"),
        b'"' => String::from("'\"'"),
        b'\t' => String::from("'\\t'"),
        b'\n' => String::from("'\\n'"),
        b'\r' => String::from("'\\r'"),
        0x20..=0x7e => format!("'{}'", c as char),
        _ => format!("'\\x{c:02x}'"),
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    fn ops(data: &[u8]) -> (Vec<Op>, Scanner<'_>) {
        let mut scan = Scanner::new(data);
        let mut out = Vec::new();
        while scan.offset < data.len() {
            let c = data[scan.offset];
            scan.offset += 1;
            let op = scan.step(c);
            out.push(op);
            if op == Op::Error {
                break;
            }
        }
        (out, scan)
    }

    #[test]
    fn object_event_stream() {
        use Op::*;
        let (got, scan) = ops(b"{\"a\":[1]} ");
        assert_eq!(
            got,
            alloc::vec![
                BeginObject,  // {
                BeginLiteral, // "
                Continue,     // a
                Continue,     // "
                ObjectKey,    // :
                BeginArray,   // [
                BeginLiteral, // 1
                EndArray,     // ]
                EndObject,    // }
                End,          // trailing space
            ]
        );
        assert!(scan.end_top);
        assert!(scan.err.is_none());
    }

    #[test]
    fn trailing_garbage_latches_on_next_byte() {
        use Op::*;
        let (got, scan) = ops(b"1 x");
        // The offending byte itself still reports End; the error is latched
        // for whatever comes after.
        assert_eq!(got, alloc::vec![BeginLiteral, End, End]);
        let err = scan.err.unwrap();
        assert_eq!(err.msg, "invalid character 'x' after top-level value");
        assert_eq!(err.offset, 3);
    }

    #[test]
    fn check_top_off_tolerates_trailing_bytes() {
        let data = b"true,1";
        let mut scan = Scanner::new(data);
        scan.check_top = false;
        let mut last = Op::Continue;
        while scan.offset < data.len() {
            let c = data[scan.offset];
            scan.offset += 1;
            last = scan.step(c);
        }
        assert_eq!(last, Op::End);
        assert!(scan.err.is_none());
    }

    #[test]
    fn eof_mid_document() {
        let (_, mut scan) = ops(b"{\"a\":");
        assert_eq!(scan.eof(), Op::Error);
        assert_eq!(scan.err.unwrap().msg, "unexpected end of JSON input");
    }

    #[test]
    fn eof_completes_bare_scalar() {
        let (_, mut scan) = ops(b"42");
        assert!(!scan.end_top);
        assert_eq!(scan.eof(), Op::End);
        assert!(scan.end_top);
    }

    #[test]
    fn undo_replays_the_terminator() {
        let data = b"[12,2]";
        let mut scan = Scanner::new(data);
        for _ in 0..3 {
            let c = data[scan.offset];
            scan.offset += 1;
            scan.step(c);
        }

        // Step the comma, hand it back, and watch it replay.
        let c = data[scan.offset];
        scan.offset += 1;
        let op = scan.step(c);
        assert_eq!(op, Op::ArrayValue);
        scan.undo(op);
        assert_eq!(scan.offset, 3);
        let c = data[scan.offset];
        scan.offset += 1;
        assert_eq!(scan.step(c), Op::ArrayValue);
        assert!(scan.err.is_none());
    }

    #[test]
    fn deep_nesting_is_iterative() {
        let mut doc = Vec::new();
        for _ in 0..10_000 {
            doc.push(b'[');
        }
        for _ in 0..10_000 {
            doc.push(b']');
        }
        let (got, scan) = ops(&doc);
        assert!(scan.err.is_none());
        assert_eq!(got.last(), Some(&Op::EndArray));
        assert!(scan.end_top);
    }
}
