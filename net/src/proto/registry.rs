use std::{
    collections::{hash_map::Entry, HashMap},
    sync::OnceLock,
};

use bytes::{Buf, Bytes, BytesMut};

use super::{
    decoder::{frame_len, Decoder, MAX_PACKET_SIZE},
    encoder::Encoder,
    error::{ProtoError, Result},
    packets::{self, AnyPacket},
    state::{Direction, Phase},
    transcoder::Transcoder,
    value::{Field, Value},
};

/// Static description of one packet type.
///
/// `fields` is the wire order and only drives transcoding; member access goes
/// through the generated struct.
#[derive(Debug, Clone, Copy)]
pub struct PacketDescriptor {
    pub name: &'static str,
    pub phase: Phase,
    pub direction: Direction,
    pub id: i32,
    pub fields: &'static [Field],
    pub build: fn(Vec<Value>) -> Result<AnyPacket>,
}

/// A packet with a fixed phase, direction, id and field schema.
pub trait Packet: Sized + Into<AnyPacket> {
    const DESCRIPTOR: PacketDescriptor;

    /// Field values in declaration order.
    fn to_values(&self) -> Vec<Value>;

    fn from_values(values: Vec<Value>) -> Result<Self>;

    fn from_any(packet: AnyPacket) -> Option<Self>;

    fn build_any(values: Vec<Value>) -> Result<AnyPacket> {
        Self::from_values(values).map(Into::into)
    }
}

/// Encodes `packet` as a complete length-prefixed frame.
pub fn encode<P: Packet>(packet: &P) -> Result<BytesMut> {
    let descriptor = P::DESCRIPTOR;
    let mut inner = Encoder::with_values(
        std::iter::once(Value::VarInt(descriptor.id)).chain(packet.to_values()),
    );
    inner.varint()?;
    inner.transcode_fields(descriptor.fields)?;
    let inner = inner.finish()?;

    let len = inner.len();
    if len > MAX_PACKET_SIZE {
        return Err(ProtoError::PacketTooLarge { len });
    }

    let mut outer = Encoder::with_values([Value::VarInt(len as i32)]);
    outer.varint()?;
    outer.put_raw(&inner);
    outer.finish()
}

type IdTable = HashMap<i32, PacketDescriptor>;

/// Lookup table `phase -> direction -> id -> descriptor`.
#[derive(Debug)]
pub struct Registry {
    table: HashMap<Phase, HashMap<Direction, IdTable>>,
}

#[derive(Debug, Default)]
pub struct RegistryBuilder {
    table: HashMap<Phase, HashMap<Direction, IdTable>>,
}

impl RegistryBuilder {
    /// # Panics
    ///
    /// Panics if `(phase, direction, id)` is already taken.
    pub fn register(&mut self, descriptor: PacketDescriptor) -> &mut Self {
        let ids = self
            .table
            .entry(descriptor.phase)
            .or_default()
            .entry(descriptor.direction)
            .or_default();
        match ids.entry(descriptor.id) {
            Entry::Occupied(existing) => panic!(
                "packet id {:#04x} ({}, {}) registered twice: {} and {}",
                descriptor.id,
                descriptor.phase,
                descriptor.direction,
                existing.get().name,
                descriptor.name
            ),
            Entry::Vacant(slot) => {
                slot.insert(descriptor);
            }
        }
        self
    }

    #[must_use]
    pub fn build(self) -> Registry {
        Registry { table: self.table }
    }
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Process-wide registry holding every packet in [`packets`].
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        let mut builder = RegistryBuilder::default();
        packets::register_all(&mut builder);
        builder.build()
    })
}

impl Registry {
    pub fn lookup(&self, phase: Phase, direction: Direction, id: i32) -> Result<PacketDescriptor> {
        self.table
            .get(&phase)
            .and_then(|directions| directions.get(&direction))
            .and_then(|ids| ids.get(&id))
            .copied()
            .ok_or(ProtoError::UnknownPacket {
                phase,
                direction,
                id,
            })
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &PacketDescriptor> {
        self.table
            .values()
            .flat_map(HashMap::values)
            .flat_map(HashMap::values)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Decodes one complete frame (length, id, fields) from the front of `src`.
    pub fn decode<B: Buf>(
        &self,
        src: &mut B,
        phase: Phase,
        direction: Direction,
    ) -> Result<AnyPacket> {
        let mut dec = Decoder::new(src);
        dec.varint()?;
        let len = frame_len(dec.take_varint("packet length")?)?;
        let body = dec.take_bytes(len)?;
        self.decode_body(body, phase, direction)
    }

    /// Decodes the id and fields of an already delimited frame.
    pub fn decode_body(
        &self,
        body: Bytes,
        phase: Phase,
        direction: Direction,
    ) -> Result<AnyPacket> {
        let mut dec = Decoder::new(body);
        dec.varint()?;
        let id = dec.take_varint("packet id")?;
        let descriptor = self.lookup(phase, direction, id)?;
        dec.transcode_fields(descriptor.fields)?;
        (descriptor.build)(dec.finish()?)
    }
}
