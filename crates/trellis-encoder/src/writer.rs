use trellis_wire::marker;
use trellis_wire::marker::ext_type;
use uuid::Uuid;

/// Writer for the self-describing value encoding — the symmetric partner
/// of the decoder.
///
/// Appends values to an internal buffer through chainable methods:
///
/// ```rust
/// use trellis_encoder::Writer;
///
/// let mut w = Writer::new();
/// w.write_str("alice").write_i32(30).write_nil();
/// let payload = w.into_bytes();
/// ```
///
/// Integer writes always pick the most compact encoding the value fits —
/// a fixint where possible, then the narrowest sufficient width. A reader
/// therefore cannot assume the encoded width matches the logical type it
/// wants; width acceptance is the decoder's job.
///
/// Multi-byte lengths and numeric payloads are big-endian.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    #[must_use]
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Borrow the encoded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Finish writing and take the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_nil(&mut self) -> &mut Self {
        self.buf.push(marker::NIL);
        self
    }

    pub fn write_bool(&mut self, v: bool) -> &mut Self {
        self.buf.push(if v { marker::TRUE } else { marker::FALSE });
        self
    }

    /// Write an unsigned integer in its most compact encoding.
    pub fn write_u64(&mut self, v: u64) -> &mut Self {
        if v <= u64::from(marker::POS_FIXINT_MAX) {
            self.buf.push(v as u8);
        } else if let Ok(v) = u8::try_from(v) {
            self.buf.push(marker::UINT8);
            self.buf.push(v);
        } else if let Ok(v) = u16::try_from(v) {
            self.buf.push(marker::UINT16);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else if let Ok(v) = u32::try_from(v) {
            self.buf.push(marker::UINT32);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else {
            self.buf.push(marker::UINT64);
            self.buf.extend_from_slice(&v.to_be_bytes());
        }
        self
    }

    pub fn write_u16(&mut self, v: u16) -> &mut Self {
        self.write_u64(u64::from(v))
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        self.write_u64(u64::from(v))
    }

    /// Write a signed integer in its most compact encoding.
    ///
    /// Non-negative values take the unsigned encodings; negative values
    /// take the negative fixint or the narrowest signed width.
    pub fn write_i64(&mut self, v: i64) -> &mut Self {
        if v >= 0 {
            return self.write_u64(v as u64);
        }
        if v >= -32 {
            self.buf.push(v as u8);
        } else if let Ok(v) = i8::try_from(v) {
            self.buf.push(marker::INT8);
            self.buf.push(v as u8);
        } else if let Ok(v) = i16::try_from(v) {
            self.buf.push(marker::INT16);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else if let Ok(v) = i32::try_from(v) {
            self.buf.push(marker::INT32);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else {
            self.buf.push(marker::INT64);
            self.buf.extend_from_slice(&v.to_be_bytes());
        }
        self
    }

    pub fn write_i16(&mut self, v: i16) -> &mut Self {
        self.write_i64(i64::from(v))
    }

    pub fn write_i32(&mut self, v: i32) -> &mut Self {
        self.write_i64(i64::from(v))
    }

    pub fn write_f32(&mut self, v: f32) -> &mut Self {
        self.buf.push(marker::FLOAT32);
        self.buf.extend_from_slice(&v.to_bits().to_be_bytes());
        self
    }

    pub fn write_f64(&mut self, v: f64) -> &mut Self {
        self.buf.push(marker::FLOAT64);
        self.buf.extend_from_slice(&v.to_bits().to_be_bytes());
        self
    }

    /// Write a UTF-8 string with the shortest sufficient length header.
    ///
    /// # Panics
    ///
    /// Panics if the string is longer than `u32::MAX` bytes — the format
    /// has no encoding for it.
    pub fn write_str(&mut self, s: &str) -> &mut Self {
        let len = s.len();
        if len < 32 {
            self.buf.push(marker::FIXSTR_MIN | (len as u8));
        } else if let Ok(len) = u8::try_from(len) {
            self.buf.push(marker::STR8);
            self.buf.push(len);
        } else if let Ok(len) = u16::try_from(len) {
            self.buf.push(marker::STR16);
            self.buf.extend_from_slice(&len.to_be_bytes());
        } else {
            let len = u32::try_from(len).expect("string exceeds maximum encodable length");
            self.buf.push(marker::STR32);
            self.buf.extend_from_slice(&len.to_be_bytes());
        }
        self.buf.extend_from_slice(s.as_bytes());
        self
    }

    /// Write a binary payload with the shortest sufficient length header.
    ///
    /// # Panics
    ///
    /// Panics if the payload is longer than `u32::MAX` bytes.
    pub fn write_bin(&mut self, data: &[u8]) -> &mut Self {
        if let Ok(len) = u8::try_from(data.len()) {
            self.buf.push(marker::BIN8);
            self.buf.push(len);
        } else if let Ok(len) = u16::try_from(data.len()) {
            self.buf.push(marker::BIN16);
            self.buf.extend_from_slice(&len.to_be_bytes());
        } else {
            let len = u32::try_from(data.len()).expect("binary exceeds maximum encodable length");
            self.buf.push(marker::BIN32);
            self.buf.extend_from_slice(&len.to_be_bytes());
        }
        self.buf.extend_from_slice(data);
        self
    }

    /// Write an array header. The caller then writes `len` values as the
    /// elements.
    pub fn write_array_header(&mut self, len: u32) -> &mut Self {
        if len < 16 {
            self.buf.push(marker::FIXARRAY_MIN | (len as u8));
        } else if let Ok(len) = u16::try_from(len) {
            self.buf.push(marker::ARRAY16);
            self.buf.extend_from_slice(&len.to_be_bytes());
        } else {
            self.buf.push(marker::ARRAY32);
            self.buf.extend_from_slice(&len.to_be_bytes());
        }
        self
    }

    /// Write a map header. The caller then writes `len` key/value pairs
    /// as alternating values.
    pub fn write_map_header(&mut self, len: u32) -> &mut Self {
        if len < 16 {
            self.buf.push(marker::FIXMAP_MIN | (len as u8));
        } else if let Ok(len) = u16::try_from(len) {
            self.buf.push(marker::MAP16);
            self.buf.extend_from_slice(&len.to_be_bytes());
        } else {
            self.buf.push(marker::MAP32);
            self.buf.extend_from_slice(&len.to_be_bytes());
        }
        self
    }

    /// Write an extension value with the shortest sufficient encoding.
    ///
    /// # Panics
    ///
    /// Panics if the payload is longer than `u32::MAX` bytes.
    pub fn write_ext(&mut self, type_code: i8, data: &[u8]) -> &mut Self {
        match data.len() {
            1 => self.buf.push(marker::FIXEXT1),
            2 => self.buf.push(marker::FIXEXT2),
            4 => self.buf.push(marker::FIXEXT4),
            8 => self.buf.push(marker::FIXEXT8),
            16 => self.buf.push(marker::FIXEXT16),
            len => {
                if let Ok(len) = u8::try_from(len) {
                    self.buf.push(marker::EXT8);
                    self.buf.push(len);
                } else if let Ok(len) = u16::try_from(len) {
                    self.buf.push(marker::EXT16);
                    self.buf.extend_from_slice(&len.to_be_bytes());
                } else {
                    let len =
                        u32::try_from(len).expect("extension exceeds maximum encodable length");
                    self.buf.push(marker::EXT32);
                    self.buf.extend_from_slice(&len.to_be_bytes());
                }
            }
        }
        self.buf.push(type_code as u8);
        self.buf.extend_from_slice(data);
        self
    }

    /// Write a 128-bit unique identifier as a fixext16 extension,
    /// RFC 4122 byte order.
    pub fn write_uuid(&mut self, id: Uuid) -> &mut Self {
        self.write_ext(ext_type::UUID, id.as_bytes())
    }
}
