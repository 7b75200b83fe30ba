//! Stateful navigators: resumable lookups over one buffer that never
//! reparse an already-scanned prefix.
//!
//! Each state embeds the scanner it left off with, plus a cache of what the
//! scan has already walked past. Probing in any order is fine: a miss
//! resumes the scan exactly where it stopped, caching everything on the way,
//! so each input byte is touched at most once across the state's lifetime.

use alloc::{borrow::Cow, collections::BTreeMap, string::String, vec::Vec};

use crate::{
    error::Error,
    literal::next_literal,
    scanner::{Op, Scanner},
    slice,
    value::Value,
};

/// Cached first-level key lookup.
///
/// Every key the scan passes on the way to a requested field is recorded
/// with its value slice, so repeated probes for it or any earlier key skip
/// the scanner entirely.
pub struct KeyState<'a> {
    found: BTreeMap<String, &'a [u8]>,
    level: usize,
    scan: Scanner<'a>,
}

/// The find-flavored spelling of [`KeyState`].
pub type FindState<'a> = KeyState<'a>;

impl<'a> KeyState<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        KeyState {
            found: BTreeMap::new(),
            level: 0,
            scan: Scanner::new(data),
        }
    }

    /// Find a first-level field, caching every field passed on the way.
    ///
    /// The empty field returns the whole buffer. Returned slices alias the
    /// input and stay valid for its lifetime, cached or not.
    pub fn find_key(&mut self, field: &str) -> Result<Option<&'a [u8]>, Error> {
        if field.is_empty() {
            return Ok(Some(self.scan.data));
        }
        if let Some(&found) = self.found.get(field) {
            return Ok(Some(found));
        }

        let mut current: Cow<'_, str> = Cow::Borrowed("");
        while self.scan.offset < self.scan.data.len() {
            let c = self.scan.data[self.scan.offset];
            self.scan.offset += 1;
            match self.scan.step(c) {
                Op::BeginArray | Op::BeginObject => self.level += 1,
                Op::ObjectKey => {
                    if self.level == 1 {
                        let val = slice::next_scan_value(&mut self.scan)?;
                        self.found.insert(current.clone().into_owned(), val);
                        if current == field {
                            return Ok(Some(val));
                        }
                    }
                }
                Op::BeginLiteral => {
                    if self.level == 1 && self.scan.key_position() {
                        current = next_literal(&mut self.scan)?;
                    }
                }
                Op::EndArray | Op::EndObject => self.level -= 1,
                Op::Error => return Err(self.scan.take_err()),
                _ => {}
            }
        }

        Ok(None)
    }

    /// [`find_key`](KeyState::find_key) under its [`FindState`] spelling.
    pub fn first_find(&mut self, field: &str) -> Result<Option<&'a [u8]>, Error> {
        self.find_key(field)
    }

    /// True once the scan has consumed the whole buffer.
    #[must_use]
    pub fn eos(&self) -> bool {
        self.scan.offset >= self.scan.data.len()
    }

    /// Drop the cache and detach from the buffer. Slices already handed out
    /// stay valid: they alias the input, not the cache.
    pub fn release(&mut self) {
        self.found = BTreeMap::new();
        self.level = 0;
        self.scan = Scanner::new(&[]);
    }
}

/// Sequential first-level cursor: alternate key retrieval with optional
/// value retrieval.
pub struct ScanState<'a> {
    level: usize,
    step: Op,
    scan: Scanner<'a>,
}

impl<'a> ScanState<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        ScanState {
            level: 0,
            step: Op::Continue,
            scan: Scanner::new(data),
        }
    }

    /// The next first-level key in document order; `None` after the last.
    pub fn scan_keys(&mut self) -> Result<Option<Cow<'a, str>>, Error> {
        let mut current = None;
        while self.scan.offset < self.scan.data.len() {
            let c = self.scan.data[self.scan.offset];
            self.scan.offset += 1;
            self.step = self.scan.step(c);
            match self.step {
                Op::BeginArray | Op::BeginObject => self.level += 1,
                Op::ObjectKey => {
                    if self.level == 1 {
                        return Ok(current);
                    }
                }
                Op::BeginLiteral => {
                    if self.level == 1 && self.scan.key_position() {
                        current = Some(next_literal(&mut self.scan)?);
                    }
                }
                Op::EndArray | Op::EndObject => self.level -= 1,
                Op::Error => return Err(self.scan.take_err()),
                _ => {}
            }
        }
        Ok(None)
    }

    /// The raw value for the key just returned by
    /// [`scan_keys`](ScanState::scan_keys); callable once per key.
    pub fn next_value(&mut self) -> Result<&'a [u8], Error> {
        if self.step == Op::ObjectKey && self.level == 1 {
            let val = slice::next_scan_value(&mut self.scan);
            self.step = Op::ObjectValue;
            return val;
        }
        Err(Error::NotAfterObjectKey)
    }

    /// Like [`next_value`](ScanState::next_value), but decoded.
    pub fn next_unmarshaled_value(&mut self) -> Result<Value, Error> {
        if self.step == Op::ObjectKey && self.level == 1 {
            let val = slice::next_unmarshaled_value(&mut self.scan);
            self.step = Op::ObjectValue;
            return val;
        }
        Err(Error::NotAfterObjectKey)
    }

    /// True once the scan has consumed the whole buffer.
    #[must_use]
    pub fn eos(&self) -> bool {
        self.scan.offset >= self.scan.data.len()
    }

    /// Detach from the buffer.
    pub fn release(&mut self) {
        self.level = 0;
        self.step = Op::Continue;
        self.scan = Scanner::new(&[]);
    }
}

/// Cached first-level array element lookup.
pub struct IndexState<'a> {
    found: Vec<&'a [u8]>,
    level: usize,
    started: bool,
    scan: Scanner<'a>,
}

impl<'a> IndexState<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        IndexState {
            found: Vec::with_capacity(32),
            level: 0,
            started: false,
            scan: Scanner::new(data),
        }
    }

    /// Find a first-level element, caching every element passed on the way.
    pub fn find_index(&mut self, index: isize) -> Result<Option<&'a [u8]>, Error> {
        if index < 0 {
            return Err(Error::InvalidArrayIndex);
        }
        #[allow(clippy::cast_sign_loss)]
        let index = index as usize;

        // been here already
        if index < self.found.len() {
            return Ok(Some(self.found[index]));
        }

        // already walked off the end of the array
        if self.started && self.level == 0 {
            return Ok(None);
        }
        self.started = true;

        while self.scan.offset < self.scan.data.len() {
            let c = self.scan.data[self.scan.offset];
            self.scan.offset += 1;
            match self.scan.step(c) {
                Op::BeginArray => {
                    self.level += 1;
                    if self.level == 1 {
                        let val = slice::next_scan_value(&mut self.scan)?;
                        self.found.push(val);
                        if index == 0 {
                            return Ok(Some(val));
                        }
                    }
                }
                Op::ArrayValue => {
                    if self.level == 1 {
                        let val = slice::next_scan_value(&mut self.scan)?;
                        self.found.push(val);
                        if index + 1 == self.found.len() {
                            return Ok(Some(val));
                        }
                    }
                }
                Op::BeginObject => self.level += 1,
                Op::EndArray | Op::EndObject => self.level -= 1,
                Op::Error => return Err(self.scan.take_err()),
                _ => {}
            }
        }

        Ok(None)
    }

    /// True once the scan has consumed the whole buffer.
    #[must_use]
    pub fn eos(&self) -> bool {
        self.scan.offset >= self.scan.data.len()
    }

    /// Drop the cache and detach from the buffer.
    pub fn release(&mut self) {
        self.found = Vec::new();
        self.level = 0;
        self.started = false;
        self.scan = Scanner::new(&[]);
    }
}
