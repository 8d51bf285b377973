use std::collections::VecDeque;

use bytes::{BufMut, BytesMut};

use super::{
    error::{ProtoError, Result},
    transcoder::Transcoder,
    value::{FieldType, Format, Value, VarWidth},
};

/// Write direction: consumes pending values front-to-back into `out`.
pub struct Encoder {
    values: VecDeque<Value>,
    out: BytesMut,
}

impl Encoder {
    #[must_use]
    pub fn with_values(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            values: values.into_iter().collect(),
            out: BytesMut::new(),
        }
    }

    /// Appends already-encoded bytes.
    pub fn put_raw(&mut self, raw: &[u8]) {
        self.out.put_slice(raw);
    }

    /// Encoded bytes; fails if pending values were never written.
    pub fn finish(self) -> Result<BytesMut> {
        match self.values.len() {
            0 => Ok(self.out),
            n => Err(ProtoError::TrailingValues(n)),
        }
    }

    fn next(&mut self, expected: FieldType) -> Result<Value> {
        match self.values.pop_front() {
            Some(value) if value.field_type() == expected => Ok(value),
            other => Err(ProtoError::FieldMismatch {
                field: "pending value",
                expected,
                found: other.as_ref().map(Value::field_type),
            }),
        }
    }
}

impl Transcoder for Encoder {
    fn fixed(&mut self, format: Format) -> Result<()> {
        match self.next(format.field_type())? {
            Value::Byte(v) => self.out.put_i8(v),
            Value::UByte(v) => self.out.put_u8(v),
            Value::Short(v) => self.out.put_i16(v),
            Value::UShort(v) => self.out.put_u16(v),
            Value::Int(v) => self.out.put_i32(v),
            Value::Long(v) => self.out.put_i64(v),
            Value::Float(v) => self.out.put_f32(v),
            Value::Double(v) => self.out.put_f64(v),
            Value::VarInt(_) | Value::VarLong(_) | Value::String(_) => {
                unreachable!("next() only yields values of the requested fixed type")
            }
        }
        Ok(())
    }

    fn var(&mut self, width: VarWidth) -> Result<()> {
        // VarInt wraps modulo 2^32, so negatives always take five bytes.
        let mut value = match self.next(width.field_type())? {
            Value::VarInt(v) => u64::from(v as u32),
            Value::VarLong(v) => v as u64,
            _ => unreachable!("next() only yields values of the requested var type"),
        };
        loop {
            if value & !0x7f == 0 {
                self.out.put_u8(value as u8);
                return Ok(());
            }
            self.out.put_u8((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
    }

    fn string(&mut self) -> Result<()> {
        let Value::String(value) = self.next(FieldType::String)? else {
            unreachable!("next() only yields strings here")
        };
        let len = i32::try_from(value.len()).map_err(|_| ProtoError::LengthTooLarge {
            max: i32::MAX as usize,
            actual: value.len(),
        })?;
        self.values.push_front(Value::VarInt(len));
        self.varint()?;
        self.out.put_slice(value.as_bytes());
        Ok(())
    }
}
