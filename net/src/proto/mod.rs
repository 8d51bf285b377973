//! Wire codec for the handshake and status phases.

mod decoder;
mod encoder;
mod error;
mod packets;
mod registry;
mod state;
mod transcoder;
mod value;


pub use decoder::{Decoder, MAX_PACKET_SIZE};
pub(crate) use decoder::frame_len;
pub use encoder::Encoder;
pub use error::{ProtoError, Result};
pub use packets::{AnyPacket, Ping, Pong, SetProtocol, Start, StatusResponse};
pub use registry::{encode, registry, Packet, PacketDescriptor, Registry, RegistryBuilder};
pub use state::{Direction, Phase};
pub use transcoder::Transcoder;
pub use value::{Field, FieldType, Format, Value, VarWidth, VARINT_MAX_BYTES, VARLONG_MAX_BYTES};
