use trellis_wire::{Value, WireError, parse_value};

use crate::error::DecodeError;
use crate::extract::FromValue;

/// Single-pass, zero-copy cursor over a buffer of self-describing values.
///
/// `Decoder` borrows one message's bytes and walks them strictly forward.
/// Every read operation follows the same three-step rule: stage the value
/// under the cursor (parse it, if not already parsed), interpret it as the
/// requested type, and advance past it. Values are never copied out of the
/// buffer — string and binary reads return views with the buffer's
/// lifetime, which is why the decoder must not outlive its input.
///
/// # Usage pattern
///
/// ```text
///   let mut decoder = Decoder::new(payload);
///   let id: Uuid = decoder.read()?;
///   let name: &str = decoder.read()?;
///   let retries = decoder.read_or_default(3_i32)?;
///   decoder.read_map(|key: &str, value: i64| { /* per pair */ })?;
/// ```
///
/// # Cursor rules
///
/// - The cursor never moves backward; `position()` is non-decreasing.
///   Random access means constructing a fresh decoder at a recorded
///   position via [`starting_at`](Self::starting_at).
/// - A mismatch (`try_read` returning `None`, or a `TypeMismatch` error)
///   leaves the cursor in place so the caller can try another type or
///   [`skip`](Self::skip).
/// - Reaching the end of the buffer is `StreamExhausted` — the normal
///   end-of-message signal, distinct from corruption.
/// - A wire-level parse failure poisons the decoder: the error is pinned
///   and every later operation repeats it. There is no resynchronization;
///   the pass is over.
///
/// The decoder is single-threaded and non-reentrant by construction: it
/// holds no synchronization and `&mut self` serializes all cursor motion.
pub struct Decoder<'a> {
    buf: &'a [u8],
    offset: usize,
    cursor: Cursor<'a>,
}

/// What the cursor currently knows about the value at `offset`.
enum Cursor<'a> {
    /// Nothing staged; the next read parses at `offset`.
    Stale,
    /// The value at `offset` is parsed; `next` is the offset after it.
    Staged { value: Value<'a>, next: usize },
    /// A wire error killed the pass; repeated on every later operation.
    Poisoned(WireError),
}

impl<'a> Decoder<'a> {
    /// Create a decoder over one message's bytes.
    ///
    /// Staging is lazy: nothing is parsed until the first read, so
    /// constructing a decoder is free.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self::starting_at(buf, 0)
    }

    /// Create a decoder positioned at `offset` within `buf`.
    ///
    /// This is the re-read path: record [`position`](Self::position)
    /// during a pass, then build a fresh decoder here to decode the same
    /// suffix again.
    #[must_use]
    pub fn starting_at(buf: &'a [u8], offset: usize) -> Self {
        Self {
            buf,
            offset,
            cursor: Cursor::Stale,
        }
    }

    /// Offset of the value currently under the cursor.
    ///
    /// After a value is consumed this is the offset of the next one, so a
    /// framing layer can use it to account for consumed bytes.
    #[must_use]
    pub fn position(&self) -> usize {
        self.offset
    }

    /// The unconsumed tail of the buffer.
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        self.buf.get(self.offset..).unwrap_or(&[])
    }

    /// Parse the value under the cursor if it is not already staged.
    fn stage(&mut self) -> Result<(Value<'a>, usize), DecodeError> {
        match &self.cursor {
            Cursor::Poisoned(e) => Err(DecodeError::Malformed(e.clone())),
            Cursor::Staged { value, next } => Ok((*value, *next)),
            Cursor::Stale => {
                if self.offset >= self.buf.len() {
                    return Err(DecodeError::StreamExhausted);
                }
                match parse_value(self.buf, self.offset) {
                    Ok((value, next)) => {
                        self.cursor = Cursor::Staged { value, next };
                        Ok((value, next))
                    }
                    Err(e) => Err(self.fail(e)),
                }
            }
        }
    }

    /// Move the cursor to `next` and mark it stale.
    fn advance_to(&mut self, next: usize) {
        self.offset = next;
        self.cursor = Cursor::Stale;
    }

    /// Pin a wire error; the decoder is dead from here on.
    fn fail(&mut self, e: WireError) -> DecodeError {
        self.cursor = Cursor::Poisoned(e.clone());
        DecodeError::Malformed(e)
    }

    /// Poison the decoder if a typed-extraction error was wire-level.
    fn escalate(&mut self, e: DecodeError) -> DecodeError {
        if let DecodeError::Malformed(w) = &e {
            self.cursor = Cursor::Poisoned(w.clone());
        }
        e
    }

    /// Read the value under the cursor as `T` and advance past it.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::StreamExhausted`] if no value remains.
    /// - [`DecodeError::TypeMismatch`] / [`DecodeError::NumericOverflow`]
    ///   if the staged value is incompatible; the cursor does not move.
    /// - [`DecodeError::Malformed`] if the bytes are unparseable.
    pub fn read<T: FromValue<'a>>(&mut self) -> Result<T, DecodeError> {
        let (value, next) = self.stage()?;
        match T::from_value(&value) {
            Ok(out) => {
                self.advance_to(next);
                Ok(out)
            }
            Err(e) => Err(self.escalate(e)),
        }
    }

    /// Read as `T` if the staged value matches, else leave the cursor put.
    ///
    /// Returns `Ok(None)` on a mismatch (including numeric overflow) so
    /// the caller can attempt a different type or [`skip`](Self::skip).
    ///
    /// # Errors
    ///
    /// [`DecodeError::StreamExhausted`] and [`DecodeError::Malformed`]
    /// still propagate — only mismatch-class conditions become `None`.
    pub fn try_read<T: FromValue<'a>>(&mut self) -> Result<Option<T>, DecodeError> {
        let (value, next) = self.stage()?;
        match T::from_value(&value) {
            Ok(out) => {
                self.advance_to(next);
                Ok(Some(out))
            }
            Err(DecodeError::TypeMismatch { .. } | DecodeError::NumericOverflow { .. }) => Ok(None),
            Err(e) => Err(self.escalate(e)),
        }
    }

    /// Read `T`, treating an encoded nil as "absent".
    ///
    /// Nil is consumed; any other value must decode as `T` or the read
    /// fails exactly like [`read`](Self::read).
    ///
    /// # Errors
    ///
    /// Same conditions as [`read`](Self::read).
    pub fn read_nullable<T: FromValue<'a>>(&mut self) -> Result<Option<T>, DecodeError> {
        if self.try_read_nil()? {
            Ok(None)
        } else {
            self.read().map(Some)
        }
    }

    /// Read `T`, substituting `on_nil` when the stream holds nil.
    ///
    /// # Errors
    ///
    /// Same conditions as [`read`](Self::read).
    pub fn read_or_default<T: FromValue<'a>>(&mut self, on_nil: T) -> Result<T, DecodeError> {
        if self.try_read_nil()? {
            Ok(on_nil)
        } else {
            self.read()
        }
    }

    /// Consume a nil if one is staged.
    ///
    /// Returns `true` and advances on nil; returns `false` without moving
    /// the cursor otherwise.
    ///
    /// # Errors
    ///
    /// [`DecodeError::StreamExhausted`] if no value remains, or
    /// [`DecodeError::Malformed`] if the stream is unparseable.
    pub fn try_read_nil(&mut self) -> Result<bool, DecodeError> {
        let (value, next) = self.stage()?;
        if matches!(value, Value::Nil) {
            self.advance_to(next);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Advance past the staged value without interpreting it.
    ///
    /// # Errors
    ///
    /// [`DecodeError::StreamExhausted`] if no value remains, or
    /// [`DecodeError::Malformed`] if the stream is unparseable.
    pub fn skip(&mut self) -> Result<(), DecodeError> {
        let (_, next) = self.stage()?;
        self.advance_to(next);
        Ok(())
    }

    /// Element count of the staged array.
    ///
    /// Does not advance — the array header is only consumed once its
    /// elements have been processed by one of the `read_array` variants
    /// (or the whole aggregate is skipped).
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the staged value is not an array.
    pub fn read_array_size(&mut self) -> Result<u32, DecodeError> {
        let (value, _) = self.stage()?;
        match value {
            Value::Array { len, .. } => Ok(len),
            other => Err(DecodeError::TypeMismatch {
                requested: "array",
                actual: other.kind(),
            }),
        }
    }

    /// Decode every element as `T`, preserving encoded order.
    ///
    /// The cursor advances past the whole array exactly once, after the
    /// last element. On a typed failure the cursor stays on the array
    /// header — never mid-aggregate — so the caller can still `skip` it.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the staged value is not an array
    /// or an element fails extraction; [`DecodeError::Malformed`] if an
    /// element's bytes are unparseable.
    pub fn read_array<T: FromValue<'a>>(&mut self) -> Result<Vec<T>, DecodeError> {
        self.read_array_with(|value| T::from_value(value))
    }

    /// Decode every element with a caller-supplied function.
    ///
    /// The hook for heterogeneous or protocol-specific element types: the
    /// function sees each element as a staged [`Value`] and produces the
    /// result collected into the output, in encoded order.
    ///
    /// # Errors
    ///
    /// Same cursor contract as [`read_array`](Self::read_array); errors
    /// from `decode` propagate unchanged.
    pub fn read_array_with<T, F>(&mut self, mut decode: F) -> Result<Vec<T>, DecodeError>
    where
        F: FnMut(&Value<'a>) -> Result<T, DecodeError>,
    {
        let (value, next) = self.stage()?;
        let Some(elements) = value.elements() else {
            return Err(DecodeError::TypeMismatch {
                requested: "array",
                actual: value.kind(),
            });
        };

        let mut out = Vec::with_capacity(elements.size_hint().0);
        for element in elements {
            let element = element.map_err(|e| self.fail(e))?;
            out.push(decode(&element).map_err(|e| self.escalate(e))?);
        }
        self.advance_to(next);
        Ok(out)
    }

    /// Visit every element as a raw staged [`Value`] with its index.
    ///
    /// For element types the typed surface cannot express. The visitor
    /// may fail, which aborts the traversal with the cursor still on the
    /// array header.
    ///
    /// # Errors
    ///
    /// Same cursor contract as [`read_array`](Self::read_array).
    pub fn read_array_raw<F>(&mut self, mut visit: F) -> Result<(), DecodeError>
    where
        F: FnMut(u32, &Value<'a>) -> Result<(), DecodeError>,
    {
        let (value, next) = self.stage()?;
        let Some(elements) = value.elements() else {
            return Err(DecodeError::TypeMismatch {
                requested: "array",
                actual: value.kind(),
            });
        };

        for (idx, element) in elements.enumerate() {
            let element = element.map_err(|e| self.fail(e))?;
            visit(idx as u32, &element).map_err(|e| self.escalate(e))?;
        }
        self.advance_to(next);
        Ok(())
    }

    /// Pair count of the staged map.
    ///
    /// Does not advance, mirroring [`read_array_size`](Self::read_array_size).
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the staged value is not a map.
    pub fn read_map_size(&mut self) -> Result<u32, DecodeError> {
        let (value, _) = self.stage()?;
        match value {
            Value::Map { len, .. } => Ok(len),
            other => Err(DecodeError::TypeMismatch {
                requested: "map",
                actual: other.kind(),
            }),
        }
    }

    /// Decode every pair as `(K, V)` and hand it to `handler`, in encoded
    /// order.
    ///
    /// Pairs are delivered exactly as encoded: duplicate keys invoke the
    /// handler once per pair, and no reordering or deduplication happens —
    /// last-wins semantics, if wanted, belong to the handler. The cursor
    /// advances past the whole map once, after the last pair.
    ///
    /// # Errors
    ///
    /// [`DecodeError::TypeMismatch`] if the staged value is not a map or
    /// a key/value fails extraction; [`DecodeError::Malformed`] if pair
    /// bytes are unparseable.
    pub fn read_map<K, V, F>(&mut self, mut handler: F) -> Result<(), DecodeError>
    where
        K: FromValue<'a>,
        V: FromValue<'a>,
        F: FnMut(K, V),
    {
        let (value, next) = self.stage()?;
        let Some(entries) = value.entries() else {
            return Err(DecodeError::TypeMismatch {
                requested: "map",
                actual: value.kind(),
            });
        };

        for entry in entries {
            let (key, val) = entry.map_err(|e| self.fail(e))?;
            let key = K::from_value(&key).map_err(|e| self.escalate(e))?;
            let val = V::from_value(&val).map_err(|e| self.escalate(e))?;
            handler(key, val);
        }
        self.advance_to(next);
        Ok(())
    }

    /// Visit every pair as raw staged [`Value`]s, in encoded order.
    ///
    /// The dispatch hook for heterogeneous maps: the handler inspects each
    /// key and value itself and may fail, aborting the traversal with the
    /// cursor still on the map header.
    ///
    /// # Errors
    ///
    /// Same cursor contract as [`read_map`](Self::read_map).
    pub fn read_map_raw<F>(&mut self, mut handler: F) -> Result<(), DecodeError>
    where
        F: FnMut(&Value<'a>, &Value<'a>) -> Result<(), DecodeError>,
    {
        let (value, next) = self.stage()?;
        let Some(entries) = value.entries() else {
            return Err(DecodeError::TypeMismatch {
                requested: "map",
                actual: value.kind(),
            });
        };

        for entry in entries {
            let (key, val) = entry.map_err(|e| self.fail(e))?;
            handler(&key, &val).map_err(|e| self.escalate(e))?;
        }
        self.advance_to(next);
        Ok(())
    }

    /// Read a binary payload as a zero-copy view and advance.
    ///
    /// Accepts both binary and string values (the format aliases them for
    /// raw transport). The returned slice borrows the input buffer.
    ///
    /// # Errors
    ///
    /// Same conditions as [`read`](Self::read).
    pub fn read_binary(&mut self) -> Result<&'a [u8], DecodeError> {
        self.read::<&'a [u8]>()
    }
}
