//! Marker byte constants for the self-describing value encoding.
//!
//! Every value starts with a single marker byte that identifies its kind
//! and, for the compact "fix" families, embeds a small payload or length
//! directly in the marker itself. Multi-byte lengths and numeric payloads
//! that follow a marker are always big-endian.
//!
//! ```text
//! ┌───────────┬──────────────────────────────────────────────┐
//! │ Range     │ Meaning                                      │
//! ├───────────┼──────────────────────────────────────────────┤
//! │ 0x00-0x7F │ positive fixint (value is the marker byte)   │
//! │ 0x80-0x8F │ fixmap (low nibble = pair count)             │
//! │ 0x90-0x9F │ fixarray (low nibble = element count)        │
//! │ 0xA0-0xBF │ fixstr (low 5 bits = byte length)            │
//! │ 0xC0      │ nil                                          │
//! │ 0xC1      │ reserved, never valid                        │
//! │ 0xC2-0xC3 │ false / true                                 │
//! │ 0xC4-0xC6 │ bin 8/16/32                                  │
//! │ 0xC7-0xC9 │ ext 8/16/32                                  │
//! │ 0xCA-0xCB │ float 32/64                                  │
//! │ 0xCC-0xCF │ uint 8/16/32/64                              │
//! │ 0xD0-0xD3 │ int 8/16/32/64                               │
//! │ 0xD4-0xD8 │ fixext 1/2/4/8/16                            │
//! │ 0xD9-0xDB │ str 8/16/32                                  │
//! │ 0xDC-0xDD │ array 16/32                                  │
//! │ 0xDE-0xDF │ map 16/32                                    │
//! │ 0xE0-0xFF │ negative fixint (-32..=-1)                   │
//! └───────────┴──────────────────────────────────────────────┘
//! ```

pub const POS_FIXINT_MAX: u8 = 0x7F;

pub const FIXMAP_MIN: u8 = 0x80;
pub const FIXMAP_MAX: u8 = 0x8F;
pub const FIXARRAY_MIN: u8 = 0x90;
pub const FIXARRAY_MAX: u8 = 0x9F;
pub const FIXSTR_MIN: u8 = 0xA0;
pub const FIXSTR_MAX: u8 = 0xBF;

pub const NIL: u8 = 0xC0;
pub const RESERVED: u8 = 0xC1;
pub const FALSE: u8 = 0xC2;
pub const TRUE: u8 = 0xC3;

pub const BIN8: u8 = 0xC4;
pub const BIN16: u8 = 0xC5;
pub const BIN32: u8 = 0xC6;

pub const EXT8: u8 = 0xC7;
pub const EXT16: u8 = 0xC8;
pub const EXT32: u8 = 0xC9;

pub const FLOAT32: u8 = 0xCA;
pub const FLOAT64: u8 = 0xCB;

pub const UINT8: u8 = 0xCC;
pub const UINT16: u8 = 0xCD;
pub const UINT32: u8 = 0xCE;
pub const UINT64: u8 = 0xCF;

pub const INT8: u8 = 0xD0;
pub const INT16: u8 = 0xD1;
pub const INT32: u8 = 0xD2;
pub const INT64: u8 = 0xD3;

pub const FIXEXT1: u8 = 0xD4;
pub const FIXEXT2: u8 = 0xD5;
pub const FIXEXT4: u8 = 0xD6;
pub const FIXEXT8: u8 = 0xD7;
pub const FIXEXT16: u8 = 0xD8;

pub const STR8: u8 = 0xD9;
pub const STR16: u8 = 0xDA;
pub const STR32: u8 = 0xDB;

pub const ARRAY16: u8 = 0xDC;
pub const ARRAY32: u8 = 0xDD;

pub const MAP16: u8 = 0xDE;
pub const MAP32: u8 = 0xDF;

pub const NEG_FIXINT_MIN: u8 = 0xE0;

/// Known extension type codes.
///
/// Extension values carry domain types the core tag families cannot
/// express. The protocol layer assigns the codes; the wire layer only
/// needs them for fixed-width validation.
pub mod ext_type {
    /// 128-bit unique identifier, 16 bytes in RFC 4122 order
    /// (most significant byte first).
    pub const UUID: i8 = 3;

    /// Required payload length for [`UUID`].
    pub const UUID_LEN: usize = 16;
}
