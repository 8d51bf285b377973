use super::{
    state::{Direction, Phase},
    value::FieldType,
};

/// Protocol decode/encode error.
///
/// Every variant is fatal for the frame being transcoded. After a decode
/// failure the stream position can no longer be trusted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtoError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("variable-length integer too long (max {max_bytes} bytes)")]
    VarNumTooLong { max_bytes: usize },
    #[error("negative length {0}")]
    NegativeLength(i32),
    #[error("packet of {len} bytes exceeds the protocol limit")]
    PacketTooLarge { len: usize },
    #[error("length {actual} exceeds maximum {max}")]
    LengthTooLarge { max: usize, actual: usize },
    #[error("string is not valid UTF-8")]
    InvalidUtf8,
    #[error("{0} trailing bytes after packet body")]
    TrailingBytes(usize),
    #[error("{0} values left unconsumed after encoding")]
    TrailingValues(usize),
    #[error("field `{field}` expected {expected:?}, found {found:?}")]
    FieldMismatch {
        field: &'static str,
        expected: FieldType,
        found: Option<FieldType>,
    },
    #[error("unknown packet {id:#04x} ({phase}, {direction})")]
    UnknownPacket {
        phase: Phase,
        direction: Direction,
        id: i32,
    },
    #[error("expected {expected}, received {found}")]
    UnexpectedPacket {
        expected: &'static str,
        found: &'static str,
    },
    #[error("{packet} belongs to the {expected} phase, connection is in {current}")]
    WrongPhase {
        packet: &'static str,
        expected: Phase,
        current: Phase,
    },
    #[error("{packet} is {direction}")]
    WrongDirection {
        packet: &'static str,
        direction: Direction,
    },
    #[error("invalid handshake next state {0}")]
    InvalidNextState(i32),
}

pub type Result<T> = std::result::Result<T, ProtoError>;
