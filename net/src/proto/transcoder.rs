use super::{
    error::Result,
    value::{Field, FieldType, Format, VarWidth},
};

/// Primitive catalog shared by [`Decoder`](super::Decoder) and
/// [`Encoder`](super::Encoder).
///
/// Implementors supply the two raw transfers; every primitive is expressed in
/// terms of them so both directions agree on the byte layout.
pub trait Transcoder {
    /// Transfer `format.size()` bytes laid out as `format`.
    fn fixed(&mut self, format: Format) -> Result<()>;

    /// Transfer one variable-length integer.
    fn var(&mut self, width: VarWidth) -> Result<()>;

    /// Transfer a VarInt-length-prefixed UTF-8 string.
    fn string(&mut self) -> Result<()>;

    fn byte(&mut self) -> Result<()> {
        self.fixed(Format::Byte)
    }

    fn ubyte(&mut self) -> Result<()> {
        self.fixed(Format::UByte)
    }

    fn short(&mut self) -> Result<()> {
        self.fixed(Format::Short)
    }

    fn ushort(&mut self) -> Result<()> {
        self.fixed(Format::UShort)
    }

    fn int(&mut self) -> Result<()> {
        self.fixed(Format::Int)
    }

    fn long(&mut self) -> Result<()> {
        self.fixed(Format::Long)
    }

    fn float(&mut self) -> Result<()> {
        self.fixed(Format::Float)
    }

    fn double(&mut self) -> Result<()> {
        self.fixed(Format::Double)
    }

    fn varint(&mut self) -> Result<()> {
        self.var(VarWidth::Int)
    }

    fn varlong(&mut self) -> Result<()> {
        self.var(VarWidth::Long)
    }

    fn transcode(&mut self, ty: FieldType) -> Result<()> {
        match ty {
            FieldType::Byte => self.byte(),
            FieldType::UByte => self.ubyte(),
            FieldType::Short => self.short(),
            FieldType::UShort => self.ushort(),
            FieldType::Int => self.int(),
            FieldType::Long => self.long(),
            FieldType::Float => self.float(),
            FieldType::Double => self.double(),
            FieldType::VarInt => self.varint(),
            FieldType::VarLong => self.varlong(),
            FieldType::String => self.string(),
        }
    }

    fn transcode_fields(&mut self, fields: &[Field]) -> Result<()> {
        fields.iter().try_for_each(|field| self.transcode(field.ty))
    }
}
