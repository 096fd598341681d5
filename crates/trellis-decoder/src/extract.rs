//! Typed extraction from a staged [`Value`].
//!
//! Each supported scalar type implements [`FromValue`]; the decoder's
//! generic `read<T>`/`try_read<T>` surface dispatches through it. The
//! per-type rules live here so every read path — direct, nullable, array
//! element, map key/value — applies exactly the same width and kind
//! checks.

use trellis_wire::marker::ext_type;
use trellis_wire::{Value, WireError};
use uuid::Uuid;

use crate::error::DecodeError;

/// Interpret a staged value as a concrete Rust type.
///
/// Implementations never consume stream state — they look at one already
/// parsed [`Value`] and either produce the requested type or report why
/// they cannot. The decoder decides what happens to the cursor.
pub trait FromValue<'a>: Sized {
    /// Diagnostic name of the requested type, used in error messages.
    const REQUESTED: &'static str;

    /// Extract `Self` from the staged value.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::TypeMismatch`] if the value is a different kind.
    /// - [`DecodeError::NumericOverflow`] if an integer does not fit.
    /// - [`DecodeError::Malformed`] if a fixed-size extension payload has
    ///   the wrong length.
    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError>;
}

fn mismatch(requested: &'static str, value: &Value<'_>) -> DecodeError {
    DecodeError::TypeMismatch {
        requested,
        actual: value.kind(),
    }
}

impl<'a> FromValue<'a> for bool {
    const REQUESTED: &'static str = "boolean";

    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
        match *value {
            Value::Bool(b) => Ok(b),
            ref other => Err(mismatch(Self::REQUESTED, other)),
        }
    }
}

// Integer widths share one rule: accept any encoded integer, signed or
// unsigned, and range-check it against the requested width. A value that
// does not fit is NumericOverflow, never a silent truncation.
macro_rules! impl_from_value_int {
    ($($ty:ty => $name:literal),+ $(,)?) => {$(
        impl<'a> FromValue<'a> for $ty {
            const REQUESTED: &'static str = $name;

            fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
                match *value {
                    Value::Uint(v) => {
                        <$ty>::try_from(v).map_err(|_| DecodeError::NumericOverflow {
                            requested: $name,
                            value: i128::from(v),
                        })
                    }
                    Value::Int(v) => {
                        <$ty>::try_from(v).map_err(|_| DecodeError::NumericOverflow {
                            requested: $name,
                            value: i128::from(v),
                        })
                    }
                    ref other => Err(mismatch($name, other)),
                }
            }
        }
    )+};
}

impl_from_value_int! {
    i16 => "int16",
    i32 => "int32",
    i64 => "int64",
    u16 => "uint16",
    u32 => "uint32",
    u64 => "uint64",
}

impl<'a> FromValue<'a> for f32 {
    const REQUESTED: &'static str = "float32";

    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
        match *value {
            Value::F32(v) => Ok(v),
            // float64 → float32 would round; the narrowing is rejected.
            ref other => Err(mismatch(Self::REQUESTED, other)),
        }
    }
}

impl<'a> FromValue<'a> for f64 {
    const REQUESTED: &'static str = "float64";

    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
        match *value {
            Value::F64(v) => Ok(v),
            Value::F32(v) => Ok(f64::from(v)),
            ref other => Err(mismatch(Self::REQUESTED, other)),
        }
    }
}

impl<'a> FromValue<'a> for &'a str {
    const REQUESTED: &'static str = "string";

    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
        match *value {
            Value::Str(s) => Ok(s),
            ref other => Err(mismatch(Self::REQUESTED, other)),
        }
    }
}

impl<'a> FromValue<'a> for String {
    const REQUESTED: &'static str = "string";

    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
        <&str>::from_value(value).map(str::to_owned)
    }
}

/// Binary reads accept both binary and string payloads — encoders for
/// this format alias the two families for raw byte transport.
impl<'a> FromValue<'a> for &'a [u8] {
    const REQUESTED: &'static str = "binary";

    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
        match *value {
            Value::Bin(b) => Ok(b),
            Value::Str(s) => Ok(s.as_bytes()),
            ref other => Err(mismatch(Self::REQUESTED, other)),
        }
    }
}

impl<'a> FromValue<'a> for Uuid {
    const REQUESTED: &'static str = "uuid";

    fn from_value(value: &Value<'a>) -> Result<Self, DecodeError> {
        match *value {
            Value::Ext { type_code, data } if type_code == ext_type::UUID => {
                let bytes: [u8; 16] = data.try_into().map_err(|_| {
                    DecodeError::Malformed(WireError::InvalidExtLength {
                        type_code,
                        expected: ext_type::UUID_LEN,
                        len: data.len(),
                    })
                })?;
                Ok(Uuid::from_bytes(bytes))
            }
            ref other => Err(mismatch(Self::REQUESTED, other)),
        }
    }
}
