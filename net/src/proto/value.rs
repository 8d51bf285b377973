/// Primitive type tag of a packet field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    Long,
    Float,
    Double,
    VarInt,
    VarLong,
    String,
}

/// One named field of a packet, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: FieldType,
}

/// A decoded or pending-encoded field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    UByte(u8),
    Short(i16),
    UShort(u16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    VarInt(i32),
    VarLong(i64),
    String(String),
}

impl Value {
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        match self {
            Value::Byte(_) => FieldType::Byte,
            Value::UByte(_) => FieldType::UByte,
            Value::Short(_) => FieldType::Short,
            Value::UShort(_) => FieldType::UShort,
            Value::Int(_) => FieldType::Int,
            Value::Long(_) => FieldType::Long,
            Value::Float(_) => FieldType::Float,
            Value::Double(_) => FieldType::Double,
            Value::VarInt(_) => FieldType::VarInt,
            Value::VarLong(_) => FieldType::VarLong,
            Value::String(_) => FieldType::String,
        }
    }
}

/// Fixed-width big-endian layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Byte,
    UByte,
    Short,
    UShort,
    Int,
    Long,
    Float,
    Double,
}

impl Format {
    /// Width on the wire in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Format::Byte | Format::UByte => 1,
            Format::Short | Format::UShort => 2,
            Format::Int | Format::Float => 4,
            Format::Long | Format::Double => 8,
        }
    }

    #[must_use]
    pub const fn field_type(self) -> FieldType {
        match self {
            Format::Byte => FieldType::Byte,
            Format::UByte => FieldType::UByte,
            Format::Short => FieldType::Short,
            Format::UShort => FieldType::UShort,
            Format::Int => FieldType::Int,
            Format::Long => FieldType::Long,
            Format::Float => FieldType::Float,
            Format::Double => FieldType::Double,
        }
    }
}

/// Variable-length integer widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarWidth {
    Int,
    Long,
}

pub const VARINT_MAX_BYTES: usize = 5;
pub const VARLONG_MAX_BYTES: usize = 10;

impl VarWidth {
    #[must_use]
    pub const fn max_bytes(self) -> usize {
        match self {
            VarWidth::Int => VARINT_MAX_BYTES,
            VarWidth::Long => VARLONG_MAX_BYTES,
        }
    }

    #[must_use]
    pub const fn field_type(self) -> FieldType {
        match self {
            VarWidth::Int => FieldType::VarInt,
            VarWidth::Long => FieldType::VarLong,
        }
    }
}
