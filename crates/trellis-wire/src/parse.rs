//! Single-value parsing over a borrowed byte buffer.
//!
//! The two entry points mirror each other:
//!
//! - [`parse_value`] materializes the value at an offset as a [`Value`]
//!   and returns the offset of the next value. For aggregates this walks
//!   the full extent of the children (without materializing them) so the
//!   caller always learns where the value ends.
//! - [`skip_value`] computes the end offset only, touching nothing else.
//!
//! Both fail on truncated payloads and unrecognized markers; neither ever
//! reads past the buffer.

use crate::error::WireError;
use crate::marker;
use crate::value::Value;

/// Bounds-checked view of `n` bytes starting at `offset`.
fn take(buf: &[u8], offset: usize, n: usize) -> Result<&[u8], WireError> {
    match buf.get(offset..) {
        Some(rest) if rest.len() >= n => Ok(&rest[..n]),
        _ => Err(WireError::UnexpectedEof { offset }),
    }
}

fn read_u8(buf: &[u8], offset: usize) -> Result<u8, WireError> {
    Ok(take(buf, offset, 1)?[0])
}

fn read_u16(buf: &[u8], offset: usize) -> Result<u16, WireError> {
    let bytes: [u8; 2] = take(buf, offset, 2)?.try_into().expect("length already checked");
    Ok(u16::from_be_bytes(bytes))
}

fn read_u32(buf: &[u8], offset: usize) -> Result<u32, WireError> {
    let bytes: [u8; 4] = take(buf, offset, 4)?.try_into().expect("length already checked");
    Ok(u32::from_be_bytes(bytes))
}

fn read_u64(buf: &[u8], offset: usize) -> Result<u64, WireError> {
    let bytes: [u8; 8] = take(buf, offset, 8)?.try_into().expect("length already checked");
    Ok(u64::from_be_bytes(bytes))
}

fn read_i8(buf: &[u8], offset: usize) -> Result<i8, WireError> {
    Ok(read_u8(buf, offset)? as i8)
}

fn read_f32(buf: &[u8], offset: usize) -> Result<f32, WireError> {
    Ok(f32::from_bits(read_u32(buf, offset)?))
}

fn read_f64(buf: &[u8], offset: usize) -> Result<f64, WireError> {
    Ok(f64::from_bits(read_u64(buf, offset)?))
}

/// Normalize a signed wire integer: non-negative values stage as `Uint`.
fn int_value(v: i64) -> Value<'static> {
    if v < 0 {
        Value::Int(v)
    } else {
        Value::Uint(v as u64)
    }
}

fn str_value(buf: &[u8], payload: usize, len: usize) -> Result<(Value<'_>, usize), WireError> {
    let bytes = take(buf, payload, len)?;
    let s = core::str::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset: payload })?;
    Ok((Value::Str(s), payload + len))
}

fn bin_value(buf: &[u8], payload: usize, len: usize) -> Result<(Value<'_>, usize), WireError> {
    let bytes = take(buf, payload, len)?;
    Ok((Value::Bin(bytes), payload + len))
}

fn ext_value(
    buf: &[u8],
    type_at: usize,
    len: usize,
) -> Result<(Value<'_>, usize), WireError> {
    let type_code = read_i8(buf, type_at)?;
    let data = take(buf, type_at + 1, len)?;
    Ok((Value::Ext { type_code, data }, type_at + 1 + len))
}

fn array_value(buf: &[u8], body: usize, len: u32) -> Result<(Value<'_>, usize), WireError> {
    let end = skip_values(buf, body, u64::from(len))?;
    Ok((
        Value::Array {
            len,
            items: &buf[body..end],
        },
        end,
    ))
}

fn map_value(buf: &[u8], body: usize, len: u32) -> Result<(Value<'_>, usize), WireError> {
    let end = skip_values(buf, body, u64::from(len) * 2)?;
    Ok((
        Value::Map {
            len,
            entries: &buf[body..end],
        },
        end,
    ))
}

/// Parse exactly one value at `offset`.
///
/// Returns the value and the offset of the first byte after it. For
/// arrays and maps the returned offset is past the entire aggregate —
/// header and all children — and the [`Value`] carries the children's
/// raw byte region for lazy traversal.
///
/// # Errors
///
/// - [`WireError::UnexpectedEof`] if the buffer ends mid-value.
/// - [`WireError::UnknownMarker`] on `0xC1` or a desynchronized cursor.
/// - [`WireError::InvalidUtf8`] if a string payload is not UTF-8.
pub fn parse_value(buf: &[u8], offset: usize) -> Result<(Value<'_>, usize), WireError> {
    let m = read_u8(buf, offset)?;
    let pos = offset + 1;

    match m {
        0x00..=marker::POS_FIXINT_MAX => Ok((Value::Uint(u64::from(m)), pos)),
        marker::NEG_FIXINT_MIN..=0xFF => Ok((Value::Int(i64::from(m as i8)), pos)),

        marker::NIL => Ok((Value::Nil, pos)),
        marker::FALSE => Ok((Value::Bool(false), pos)),
        marker::TRUE => Ok((Value::Bool(true), pos)),

        marker::UINT8 => Ok((Value::Uint(u64::from(read_u8(buf, pos)?)), pos + 1)),
        marker::UINT16 => Ok((Value::Uint(u64::from(read_u16(buf, pos)?)), pos + 2)),
        marker::UINT32 => Ok((Value::Uint(u64::from(read_u32(buf, pos)?)), pos + 4)),
        marker::UINT64 => Ok((Value::Uint(read_u64(buf, pos)?), pos + 8)),

        marker::INT8 => Ok((int_value(i64::from(read_i8(buf, pos)?)), pos + 1)),
        marker::INT16 => Ok((int_value(i64::from(read_u16(buf, pos)? as i16)), pos + 2)),
        marker::INT32 => Ok((int_value(i64::from(read_u32(buf, pos)? as i32)), pos + 4)),
        marker::INT64 => Ok((int_value(read_u64(buf, pos)? as i64), pos + 8)),

        marker::FLOAT32 => Ok((Value::F32(read_f32(buf, pos)?), pos + 4)),
        marker::FLOAT64 => Ok((Value::F64(read_f64(buf, pos)?), pos + 8)),

        marker::FIXSTR_MIN..=marker::FIXSTR_MAX => {
            str_value(buf, pos, usize::from(m & 0x1F))
        }
        marker::STR8 => {
            let len = usize::from(read_u8(buf, pos)?);
            str_value(buf, pos + 1, len)
        }
        marker::STR16 => {
            let len = usize::from(read_u16(buf, pos)?);
            str_value(buf, pos + 2, len)
        }
        marker::STR32 => {
            let len = read_u32(buf, pos)? as usize;
            str_value(buf, pos + 4, len)
        }

        marker::BIN8 => {
            let len = usize::from(read_u8(buf, pos)?);
            bin_value(buf, pos + 1, len)
        }
        marker::BIN16 => {
            let len = usize::from(read_u16(buf, pos)?);
            bin_value(buf, pos + 2, len)
        }
        marker::BIN32 => {
            let len = read_u32(buf, pos)? as usize;
            bin_value(buf, pos + 4, len)
        }

        marker::FIXEXT1 => ext_value(buf, pos, 1),
        marker::FIXEXT2 => ext_value(buf, pos, 2),
        marker::FIXEXT4 => ext_value(buf, pos, 4),
        marker::FIXEXT8 => ext_value(buf, pos, 8),
        marker::FIXEXT16 => ext_value(buf, pos, 16),
        marker::EXT8 => {
            let len = usize::from(read_u8(buf, pos)?);
            ext_value(buf, pos + 1, len)
        }
        marker::EXT16 => {
            let len = usize::from(read_u16(buf, pos)?);
            ext_value(buf, pos + 2, len)
        }
        marker::EXT32 => {
            let len = read_u32(buf, pos)? as usize;
            ext_value(buf, pos + 4, len)
        }

        marker::FIXARRAY_MIN..=marker::FIXARRAY_MAX => {
            array_value(buf, pos, u32::from(m & 0x0F))
        }
        marker::ARRAY16 => {
            let len = u32::from(read_u16(buf, pos)?);
            array_value(buf, pos + 2, len)
        }
        marker::ARRAY32 => {
            let len = read_u32(buf, pos)?;
            array_value(buf, pos + 4, len)
        }

        marker::FIXMAP_MIN..=marker::FIXMAP_MAX => map_value(buf, pos, u32::from(m & 0x0F)),
        marker::MAP16 => {
            let len = u32::from(read_u16(buf, pos)?);
            map_value(buf, pos + 2, len)
        }
        marker::MAP32 => {
            let len = read_u32(buf, pos)?;
            map_value(buf, pos + 4, len)
        }

        marker::RESERVED => Err(WireError::UnknownMarker { marker: m, offset }),
    }
}

/// Compute the end offset of the value at `offset` without materializing it.
///
/// Aggregate children are walked iteratively with a pending-value counter,
/// so nesting depth is bounded by the buffer length, not the call stack.
/// String payloads are *not* UTF-8 validated here — skipping is a pure
/// structural walk.
///
/// # Errors
///
/// Same conditions as [`parse_value`], minus UTF-8 validation.
pub fn skip_value(buf: &[u8], offset: usize) -> Result<usize, WireError> {
    skip_values(buf, offset, 1)
}

/// Skip `count` consecutive values starting at `offset`.
pub(crate) fn skip_values(buf: &[u8], mut offset: usize, count: u64) -> Result<usize, WireError> {
    let mut remaining = count;
    while remaining > 0 {
        remaining -= 1;
        let (next, children) = value_extent(buf, offset)?;
        // Every value occupies at least one byte, so a header claiming
        // more children than there are bytes left is already truncated.
        if children > (buf.len() - next) as u64 {
            return Err(WireError::UnexpectedEof { offset: buf.len() });
        }
        remaining += children;
        offset = next;
    }
    Ok(offset)
}

/// Shallow extent of the value at `offset`: the offset just past its
/// header and scalar payload, plus the number of child values that follow
/// (elements for arrays, keys and values for maps).
fn value_extent(buf: &[u8], offset: usize) -> Result<(usize, u64), WireError> {
    let m = read_u8(buf, offset)?;
    let pos = offset + 1;

    let skip_payload = |n: usize| -> Result<(usize, u64), WireError> {
        take(buf, pos, n)?;
        Ok((pos + n, 0))
    };

    match m {
        0x00..=marker::POS_FIXINT_MAX | marker::NEG_FIXINT_MIN..=0xFF => Ok((pos, 0)),
        marker::NIL | marker::FALSE | marker::TRUE => Ok((pos, 0)),

        marker::UINT8 | marker::INT8 => skip_payload(1),
        marker::UINT16 | marker::INT16 => skip_payload(2),
        marker::UINT32 | marker::INT32 | marker::FLOAT32 => skip_payload(4),
        marker::UINT64 | marker::INT64 | marker::FLOAT64 => skip_payload(8),

        marker::FIXSTR_MIN..=marker::FIXSTR_MAX => skip_payload(usize::from(m & 0x1F)),
        marker::STR8 | marker::BIN8 => {
            let len = usize::from(read_u8(buf, pos)?);
            take(buf, pos + 1, len)?;
            Ok((pos + 1 + len, 0))
        }
        marker::STR16 | marker::BIN16 => {
            let len = usize::from(read_u16(buf, pos)?);
            take(buf, pos + 2, len)?;
            Ok((pos + 2 + len, 0))
        }
        marker::STR32 | marker::BIN32 => {
            let len = read_u32(buf, pos)? as usize;
            take(buf, pos + 4, len)?;
            Ok((pos + 4 + len, 0))
        }

        marker::FIXEXT1 => skip_payload(1 + 1),
        marker::FIXEXT2 => skip_payload(1 + 2),
        marker::FIXEXT4 => skip_payload(1 + 4),
        marker::FIXEXT8 => skip_payload(1 + 8),
        marker::FIXEXT16 => skip_payload(1 + 16),
        marker::EXT8 => {
            let len = usize::from(read_u8(buf, pos)?);
            take(buf, pos + 1, 1 + len)?;
            Ok((pos + 1 + 1 + len, 0))
        }
        marker::EXT16 => {
            let len = usize::from(read_u16(buf, pos)?);
            take(buf, pos + 2, 1 + len)?;
            Ok((pos + 2 + 1 + len, 0))
        }
        marker::EXT32 => {
            let len = read_u32(buf, pos)? as usize;
            take(buf, pos + 4, 1 + len)?;
            Ok((pos + 4 + 1 + len, 0))
        }

        marker::FIXARRAY_MIN..=marker::FIXARRAY_MAX => Ok((pos, u64::from(m & 0x0F))),
        marker::ARRAY16 => Ok((pos + 2, u64::from(read_u16(buf, pos)?))),
        marker::ARRAY32 => Ok((pos + 4, u64::from(read_u32(buf, pos)?))),

        marker::FIXMAP_MIN..=marker::FIXMAP_MAX => Ok((pos, u64::from(m & 0x0F) * 2)),
        marker::MAP16 => Ok((pos + 2, u64::from(read_u16(buf, pos)?) * 2)),
        marker::MAP32 => Ok((pos + 4, u64::from(read_u32(buf, pos)?) * 2)),

        marker::RESERVED => Err(WireError::UnknownMarker { marker: m, offset }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nil() {
        let (v, next) = parse_value(&[0xC0], 0).unwrap();
        assert_eq!(v, Value::Nil);
        assert_eq!(next, 1);
    }

    #[test]
    fn parse_bools() {
        assert_eq!(parse_value(&[0xC2], 0).unwrap().0, Value::Bool(false));
        assert_eq!(parse_value(&[0xC3], 0).unwrap().0, Value::Bool(true));
    }

    #[test]
    fn parse_positive_fixint() {
        assert_eq!(parse_value(&[0x00], 0).unwrap().0, Value::Uint(0));
        assert_eq!(parse_value(&[0x7F], 0).unwrap().0, Value::Uint(127));
    }

    #[test]
    fn parse_negative_fixint() {
        assert_eq!(parse_value(&[0xFF], 0).unwrap().0, Value::Int(-1));
        assert_eq!(parse_value(&[0xE0], 0).unwrap().0, Value::Int(-32));
    }

    #[test]
    fn parse_uint_widths() {
        assert_eq!(parse_value(&[0xCC, 0xFF], 0).unwrap(), (Value::Uint(255), 2));
        assert_eq!(
            parse_value(&[0xCD, 0x01, 0x00], 0).unwrap(),
            (Value::Uint(256), 3)
        );
        assert_eq!(
            parse_value(&[0xCE, 0x00, 0x01, 0x11, 0x70], 0).unwrap(),
            (Value::Uint(70000), 5)
        );
        assert_eq!(
            parse_value(&[0xCF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], 0).unwrap(),
            (Value::Uint(u64::MAX), 9)
        );
    }

    #[test]
    fn parse_int_widths() {
        assert_eq!(parse_value(&[0xD0, 0x80], 0).unwrap(), (Value::Int(-128), 2));
        assert_eq!(
            parse_value(&[0xD1, 0x80, 0x00], 0).unwrap(),
            (Value::Int(-32768), 3)
        );
        assert_eq!(
            parse_value(&[0xD2, 0xFF, 0xFE, 0xEE, 0x90], 0).unwrap(),
            (Value::Int(-70000), 5)
        );
        assert_eq!(
            parse_value(&[0xD3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], 0).unwrap(),
            (Value::Int(i64::MIN), 9)
        );
    }

    #[test]
    fn signed_encoding_of_nonnegative_normalizes_to_uint() {
        // int8 marker carrying +5 stages as an unsigned value
        assert_eq!(parse_value(&[0xD0, 0x05], 0).unwrap().0, Value::Uint(5));
    }

    #[test]
    fn parse_floats() {
        let (v, next) = parse_value(&[0xCA, 0x3F, 0x80, 0x00, 0x00], 0).unwrap();
        assert_eq!(v, Value::F32(1.0));
        assert_eq!(next, 5);

        let (v, next) =
            parse_value(&[0xCB, 0x40, 0x09, 0x21, 0xFB, 0x54, 0x44, 0x2D, 0x18], 0).unwrap();
        assert_eq!(v, Value::F64(core::f64::consts::PI));
        assert_eq!(next, 9);
    }

    #[test]
    fn parse_fixstr() {
        let buf = [0xA5, b'h', b'e', b'l', b'l', b'o'];
        let (v, next) = parse_value(&buf, 0).unwrap();
        assert_eq!(v, Value::Str("hello"));
        assert_eq!(next, 6);
    }

    #[test]
    fn parse_empty_str() {
        assert_eq!(parse_value(&[0xA0], 0).unwrap(), (Value::Str(""), 1));
    }

    #[test]
    fn parse_str8() {
        let mut buf = vec![0xD9, 3];
        buf.extend_from_slice("abc".as_bytes());
        assert_eq!(parse_value(&buf, 0).unwrap(), (Value::Str("abc"), 5));
    }

    #[test]
    fn reject_invalid_utf8() {
        let buf = [0xA2, 0xFF, 0xFE];
        let result = parse_value(&buf, 0);
        assert!(matches!(result, Err(WireError::InvalidUtf8 { offset: 1 })));
    }

    #[test]
    fn parse_bin8() {
        let buf = [0xC4, 0x03, 0xDE, 0xAD, 0xBE];
        let (v, next) = parse_value(&buf, 0).unwrap();
        assert_eq!(v, Value::Bin(&[0xDE, 0xAD, 0xBE]));
        assert_eq!(next, 5);
    }

    #[test]
    fn parse_zero_length_bin() {
        assert_eq!(parse_value(&[0xC4, 0x00], 0).unwrap(), (Value::Bin(&[]), 2));
    }

    #[test]
    fn parse_fixext16() {
        let mut buf = vec![0xD8, 0x03];
        buf.extend_from_slice(&[0xAB; 16]);
        let (v, next) = parse_value(&buf, 0).unwrap();
        assert_eq!(
            v,
            Value::Ext {
                type_code: 3,
                data: &[0xAB; 16],
            }
        );
        assert_eq!(next, 18);
    }

    #[test]
    fn parse_fixarray_extent() {
        // [1, "ab", -2]
        let buf = [0x93, 0x01, 0xA2, b'a', b'b', 0xFE];
        let (v, next) = parse_value(&buf, 0).unwrap();
        assert_eq!(next, buf.len());
        let Value::Array { len, items } = v else {
            panic!("expected array, got {v:?}");
        };
        assert_eq!(len, 3);
        assert_eq!(items, &buf[1..]);
    }

    #[test]
    fn parse_nested_array_extent() {
        // [[1, 2], [3]]
        let buf = [0x92, 0x92, 0x01, 0x02, 0x91, 0x03];
        let (v, next) = parse_value(&buf, 0).unwrap();
        assert_eq!(next, buf.len());
        assert!(matches!(v, Value::Array { len: 2, .. }));
    }

    #[test]
    fn parse_fixmap_extent() {
        // {"a": 1}
        let buf = [0x81, 0xA1, b'a', 0x01];
        let (v, next) = parse_value(&buf, 0).unwrap();
        assert_eq!(next, buf.len());
        assert!(matches!(v, Value::Map { len: 1, .. }));
    }

    #[test]
    fn element_iter_preserves_order() {
        // [3, 1, 2]
        let buf = [0x93, 0x03, 0x01, 0x02];
        let (v, _) = parse_value(&buf, 0).unwrap();
        let elems: Vec<_> = v.elements().unwrap().map(Result::unwrap).collect();
        assert_eq!(
            elems,
            vec![Value::Uint(3), Value::Uint(1), Value::Uint(2)]
        );
    }

    #[test]
    fn entry_iter_yields_duplicate_keys() {
        // {"k": 1, "k": 2}
        let buf = [0x82, 0xA1, b'k', 0x01, 0xA1, b'k', 0x02];
        let (v, _) = parse_value(&buf, 0).unwrap();
        let entries: Vec<_> = v.entries().unwrap().map(Result::unwrap).collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], (Value::Str("k"), Value::Uint(1)));
        assert_eq!(entries[1], (Value::Str("k"), Value::Uint(2)));
    }

    #[test]
    fn reject_empty_input() {
        assert!(matches!(
            parse_value(&[], 0),
            Err(WireError::UnexpectedEof { offset: 0 })
        ));
    }

    #[test]
    fn reject_truncated_payload() {
        // uint32 marker with only two payload bytes
        assert!(matches!(
            parse_value(&[0xCE, 0x00, 0x01], 0),
            Err(WireError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn reject_truncated_array() {
        // fixarray of 3 with only one element present
        assert!(matches!(
            parse_value(&[0x93, 0x01], 0),
            Err(WireError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn reject_reserved_marker() {
        assert!(matches!(
            parse_value(&[0xC1], 0),
            Err(WireError::UnknownMarker { marker: 0xC1, offset: 0 })
        ));
    }

    #[test]
    fn oversized_child_count_rejected_early() {
        // map16 claiming 0xFFFF pairs with no bytes behind it
        let result = parse_value(&[0xDE, 0xFF, 0xFF], 0);
        assert!(matches!(result, Err(WireError::UnexpectedEof { .. })));
    }

    #[test]
    fn skip_scalar() {
        assert_eq!(skip_value(&[0xC0, 0x01], 0).unwrap(), 1);
        assert_eq!(skip_value(&[0xCD, 0x01, 0x00], 0).unwrap(), 3);
    }

    #[test]
    fn skip_nested_aggregate() {
        // {"a": [1, 2]} followed by a trailing nil
        let buf = [0x81, 0xA1, b'a', 0x92, 0x01, 0x02, 0xC0];
        assert_eq!(skip_value(&buf, 0).unwrap(), 6);
    }

    #[test]
    fn skip_does_not_validate_utf8() {
        // structurally sound string with garbage payload
        let buf = [0xA2, 0xFF, 0xFE];
        assert_eq!(skip_value(&buf, 0).unwrap(), 3);
    }

    #[test]
    fn parse_at_nonzero_offset() {
        let buf = [0xC0, 0xCC, 0x2A];
        let (v, next) = parse_value(&buf, 1).unwrap();
        assert_eq!(v, Value::Uint(42));
        assert_eq!(next, 3);
    }
}
