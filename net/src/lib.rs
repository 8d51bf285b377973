//! Minimal Minecraft protocol client for the handshake and status phases.
pub mod client;
pub mod proto;
pub mod status;
pub mod transport;

pub use client::{Client, ClientError, PROTOCOL_VERSION};
pub use proto::{
    encode, registry, AnyPacket, Direction, Packet, Phase, Ping, Pong, ProtoError, SetProtocol,
    Start, StatusResponse, MAX_PACKET_SIZE,
};
pub use status::{LiveInfo, MapInfo, ServerInfo, StatusError};
pub use transport::Transport;
