use bytes::BytesMut;

use super::{
    error::{ProtoError, Result},
    registry::{encode, Packet, PacketDescriptor, RegistryBuilder},
    state::{Direction, Phase},
    value::{Field, FieldType, Value},
};

/// Declares packet structs from a field schema.
///
/// Each entry expands to a struct with one public member per field, a
/// [`Packet`] impl whose descriptor lists the fields in wire order, and a
/// variant of [`AnyPacket`].
macro_rules! packets {
    ($(
        $(#[$meta:meta])*
        $name:ident($phase:ident, $direction:ident, $id:literal) {
            $($field:ident: $tag:ident($ty:ty)),* $(,)?
        }
    )*) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq)]
            pub struct $name {
                $(pub $field: $ty,)*
            }

            impl Packet for $name {
                const DESCRIPTOR: PacketDescriptor = PacketDescriptor {
                    name: stringify!($name),
                    phase: Phase::$phase,
                    direction: Direction::$direction,
                    id: $id,
                    fields: &[$(Field { name: stringify!($field), ty: FieldType::$tag }),*],
                    build: <$name as Packet>::build_any,
                };

                fn to_values(&self) -> Vec<Value> {
                    vec![$(Value::$tag(self.$field.clone())),*]
                }

                #[allow(unused_mut)]
                fn from_values(values: Vec<Value>) -> Result<Self> {
                    let mut values = values.into_iter();
                    let packet = Self {
                        $($field: match values.next() {
                            Some(Value::$tag(value)) => value,
                            other => {
                                return Err(ProtoError::FieldMismatch {
                                    field: stringify!($field),
                                    expected: FieldType::$tag,
                                    found: other.as_ref().map(Value::field_type),
                                })
                            }
                        },)*
                    };
                    match values.len() {
                        0 => Ok(packet),
                        n => Err(ProtoError::TrailingValues(n)),
                    }
                }

                fn from_any(packet: AnyPacket) -> Option<Self> {
                    match packet {
                        AnyPacket::$name(packet) => Some(packet),
                        _ => None,
                    }
                }
            }

            impl From<$name> for AnyPacket {
                fn from(packet: $name) -> Self {
                    AnyPacket::$name(packet)
                }
            }
        )*

        /// Any packet known to the registry.
        #[derive(Debug, Clone, PartialEq)]
        pub enum AnyPacket {
            $($name($name),)*
        }

        impl AnyPacket {
            #[must_use]
            pub fn descriptor(&self) -> PacketDescriptor {
                match self {
                    $(AnyPacket::$name(_) => <$name as Packet>::DESCRIPTOR,)*
                }
            }

            pub fn encode(&self) -> Result<BytesMut> {
                match self {
                    $(AnyPacket::$name(packet) => encode(packet),)*
                }
            }
        }

        pub(crate) fn register_all(builder: &mut RegistryBuilder) {
            $(builder.register(<$name as Packet>::DESCRIPTOR);)*
        }
    };
}

packets! {
    /// Handshake (C2S). Selects the phase the connection continues in.
    SetProtocol(Handshaking, Serverbound, 0x00) {
        protocol_version: VarInt(i32),
        server_address: String(String),
        server_port: UShort(u16),
        next_state: VarInt(i32),
    }

    /// Status request (C2S).
    Start(Status, Serverbound, 0x00) {}

    /// Status ping (C2S). `payload` is echoed back in [`Pong`].
    Ping(Status, Serverbound, 0x01) {
        payload: Long(i64),
    }

    /// Status response (S2C) carrying the JSON status document.
    StatusResponse(Status, Clientbound, 0x00) {
        json: String(String),
    }

    /// Status pong (S2C).
    Pong(Status, Clientbound, 0x01) {
        payload: Long(i64),
    }
}

impl AnyPacket {
    /// Narrows to `P`, failing with [`ProtoError::UnexpectedPacket`] otherwise.
    pub fn into_packet<P: Packet>(self) -> Result<P> {
        let found = self.descriptor().name;
        P::from_any(self).ok_or(ProtoError::UnexpectedPacket {
            expected: P::DESCRIPTOR.name,
            found,
        })
    }
}
