use bytes::{Buf, Bytes};

use super::{
    error::{ProtoError, Result},
    transcoder::Transcoder,
    value::{FieldType, Format, Value, VarWidth},
};

/// Maximum packet length in bytes (protocol limit).
pub const MAX_PACKET_SIZE: usize = 2_097_152;

/// Read direction: decodes primitives from `src` into an ordered value buffer.
pub struct Decoder<B> {
    src: B,
    values: Vec<Value>,
}

impl<B: Buf> Decoder<B> {
    #[must_use]
    pub const fn new(src: B) -> Self {
        Self {
            src,
            values: Vec::new(),
        }
    }

    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Values decoded so far; fails if the source still holds bytes.
    pub fn finish(self) -> Result<Vec<Value>> {
        match self.src.remaining() {
            0 => Ok(self.values),
            n => Err(ProtoError::TrailingBytes(n)),
        }
    }

    /// Removes the most recent value, which must be a VarInt.
    pub(crate) fn take_varint(&mut self, field: &'static str) -> Result<i32> {
        match self.values.pop() {
            Some(Value::VarInt(value)) => Ok(value),
            other => Err(ProtoError::FieldMismatch {
                field,
                expected: FieldType::VarInt,
                found: other.as_ref().map(Value::field_type),
            }),
        }
    }

    pub(crate) fn take_bytes(&mut self, len: usize) -> Result<Bytes> {
        self.ensure(len)?;
        Ok(self.src.copy_to_bytes(len))
    }

    fn ensure(&self, len: usize) -> Result<()> {
        if self.src.remaining() < len {
            return Err(ProtoError::UnexpectedEof);
        }
        Ok(())
    }
}

impl<B: Buf> Transcoder for Decoder<B> {
    fn fixed(&mut self, format: Format) -> Result<()> {
        self.ensure(format.size())?;
        let value = match format {
            Format::Byte => Value::Byte(self.src.get_i8()),
            Format::UByte => Value::UByte(self.src.get_u8()),
            Format::Short => Value::Short(self.src.get_i16()),
            Format::UShort => Value::UShort(self.src.get_u16()),
            Format::Int => Value::Int(self.src.get_i32()),
            Format::Long => Value::Long(self.src.get_i64()),
            Format::Float => Value::Float(self.src.get_f32()),
            Format::Double => Value::Double(self.src.get_f64()),
        };
        self.values.push(value);
        Ok(())
    }

    fn var(&mut self, width: VarWidth) -> Result<()> {
        let max_bytes = width.max_bytes();
        let mut value: u64 = 0;
        for i in 0..max_bytes {
            self.ensure(1)?;
            let byte = self.src.get_u8();
            value |= u64::from(byte & 0x7f) << (7 * i);
            if byte & 0x80 == 0 {
                self.values.push(match width {
                    VarWidth::Int => Value::VarInt(value as u32 as i32),
                    VarWidth::Long => Value::VarLong(value as i64),
                });
                return Ok(());
            }
        }

        Err(ProtoError::VarNumTooLong { max_bytes })
    }

    fn string(&mut self) -> Result<()> {
        self.varint()?;
        let len = self.take_varint("string length")?;
        let len = usize::try_from(len).map_err(|_| ProtoError::NegativeLength(len))?;
        let raw = self.take_bytes(len)?;
        let value = String::from_utf8(raw.to_vec()).map_err(|_| ProtoError::InvalidUtf8)?;
        self.values.push(Value::String(value));
        Ok(())
    }
}

/// Validates a decoded frame length prefix.
pub(crate) fn frame_len(raw: i32) -> Result<usize> {
    let len = usize::try_from(raw).map_err(|_| ProtoError::NegativeLength(raw))?;
    if len > MAX_PACKET_SIZE {
        return Err(ProtoError::PacketTooLarge { len });
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_is_big_endian() {
        let src: &[u8] = &[0x12, 0x34, 0xff, 0xff, 0xff, 0xfe, 0x3f, 0x80, 0x00, 0x00];
        let mut dec = Decoder::new(src);
        dec.ushort().unwrap();
        dec.int().unwrap();
        dec.float().unwrap();
        assert_eq!(
            dec.finish().unwrap(),
            vec![Value::UShort(0x1234), Value::Int(-2), Value::Float(1.0)]
        );
    }

    #[test]
    fn short_read_is_eof() {
        let src: &[u8] = &[0x00, 0x00, 0x01];
        let mut dec = Decoder::new(src);
        assert_eq!(dec.int(), Err(ProtoError::UnexpectedEof));
    }

    #[test]
    fn varint_rejects_sixth_byte() {
        let src: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x80, 0x01];
        let mut dec = Decoder::new(src);
        assert_eq!(
            dec.varint(),
            Err(ProtoError::VarNumTooLong { max_bytes: 5 })
        );
    }

    #[test]
    fn string_length_is_not_kept() {
        let src: &[u8] = &[0x03, b'a', b'b', b'c'];
        let mut dec = Decoder::new(src);
        dec.string().unwrap();
        assert_eq!(dec.values(), &[Value::String("abc".into())]);
    }

    #[test]
    fn string_rejects_negative_length() {
        let src: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0x0f];
        let mut dec = Decoder::new(src);
        assert_eq!(dec.string(), Err(ProtoError::NegativeLength(-1)));
    }

    #[test]
    fn string_rejects_invalid_utf8() {
        let src: &[u8] = &[0x02, 0xc3, 0x28];
        let mut dec = Decoder::new(src);
        assert_eq!(dec.string(), Err(ProtoError::InvalidUtf8));
    }

    #[test]
    fn trailing_bytes_are_reported() {
        let src: &[u8] = &[0x01, 0x02];
        let mut dec = Decoder::new(src);
        dec.ubyte().unwrap();
        assert_eq!(dec.finish(), Err(ProtoError::TrailingBytes(1)));
    }

    #[test]
    fn frame_len_bounds() {
        assert_eq!(frame_len(3), Ok(3));
        assert_eq!(frame_len(-1), Err(ProtoError::NegativeLength(-1)));
        assert_eq!(
            frame_len(MAX_PACKET_SIZE as i32 + 1),
            Err(ProtoError::PacketTooLarge {
                len: MAX_PACKET_SIZE + 1
            })
        );
    }
}
