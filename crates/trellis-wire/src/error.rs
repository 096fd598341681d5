/// Errors produced while parsing the byte stream into values.
///
/// Every variant carries enough positional context to point a developer at
/// the offending byte. All variants are `Clone` because the decoder layer
/// pins the first wire error it sees and re-surfaces it on every subsequent
/// read of a dead stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// Input ended before a complete value could be read.
    ///
    /// The offset is the byte position where the truncated read started,
    /// measured from the start of the buffer handed to the parser.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// The byte at `offset` is not a recognized value marker.
    ///
    /// `0xC1` is the one permanently reserved marker; anything else here
    /// means the cursor is desynchronized or the stream is corrupt.
    #[error("unknown marker {marker:#04X} at offset {offset}")]
    UnknownMarker { marker: u8, offset: usize },

    /// A string payload was not valid UTF-8.
    ///
    /// The offset points at the start of the string payload, not at the
    /// first bad byte inside it.
    #[error("invalid UTF-8 in string payload at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// A fixed-size extension payload had the wrong length.
    ///
    /// Extension types with a defined width (the 128-bit identifier) must
    /// carry exactly `expected` bytes; anything else can only come from a
    /// broken encoder.
    #[error("extension type {type_code} payload must be {expected} bytes, got {len}")]
    InvalidExtLength {
        type_code: i8,
        expected: usize,
        len: usize,
    },
}
