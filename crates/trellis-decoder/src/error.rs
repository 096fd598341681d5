use trellis_wire::{ValueKind, WireError};

/// Errors surfaced by the typed read API.
///
/// The decoder distinguishes three situations a protocol handler reacts to
/// very differently: the message simply ended, the message holds a value of
/// the wrong type at this position, and the byte stream itself is broken.
///
/// Error hierarchy:
///
/// ```text
///   DecodeError
///   ├── StreamExhausted        ← cursor is past the last value (normal end)
///   ├── TypeMismatch           ← staged value incompatible with the request
///   ├── NumericOverflow        ← integer present but wider than requested
///   └── Malformed(WireError)   ← bytes unparseable; fatal for the pass
/// ```
///
/// `StreamExhausted` and `TypeMismatch` leave the decoder usable: the
/// cursor does not move, and the caller can try a different type or stop
/// cleanly. `Malformed` is terminal — the decoder pins the wire error and
/// returns it from every subsequent operation, because after a bad tag the
/// value boundaries can no longer be trusted and resynchronizing would
/// only produce garbage reads.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// A read was attempted with no value left in the stream.
    ///
    /// This is the normal end-of-message condition, not stream corruption.
    #[error("no more data in stream")]
    StreamExhausted,

    /// The staged value cannot be interpreted as the requested type.
    ///
    /// Carries both sides for diagnostics: what the caller asked for and
    /// what the stream actually holds at the cursor.
    #[error("type mismatch: requested {requested}, stream holds {actual}")]
    TypeMismatch {
        requested: &'static str,
        actual: ValueKind,
    },

    /// An integer is present but does not fit the requested width.
    ///
    /// Kept distinct from [`TypeMismatch`] so callers can tell "wrong kind
    /// of value" from "right kind, too big" — `try_read` treats both as
    /// mismatch-class and converts them to `None`.
    #[error("numeric overflow: value {value} does not fit {requested}")]
    NumericOverflow {
        requested: &'static str,
        value: i128,
    },

    /// The underlying parser could not interpret the bytes at the cursor.
    ///
    /// Truncated payload, unrecognized marker, invalid UTF-8 in a string,
    /// or a bad fixed-size extension length. Fatal for the remainder of
    /// the pass.
    #[error("malformed stream: {0}")]
    Malformed(#[from] WireError),
}
