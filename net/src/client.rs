use std::{
    io,
    net::TcpStream,
    time::{SystemTime, UNIX_EPOCH},
};

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    proto::{
        frame_len, registry, AnyPacket, Decoder, Direction, Packet, Phase, Ping, Pong,
        ProtoError, SetProtocol, Start, StatusResponse, Transcoder, VARINT_MAX_BYTES,
    },
    status::{ServerInfo, StatusError},
    transport::{self, Transport},
};

/// Protocol version sent in every handshake.
pub const PROTOCOL_VERSION: i32 = 47;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("protocol error: {0}")]
    Proto(#[from] ProtoError),
    #[error("status payload: {0}")]
    Status(#[from] StatusError),
}

/// One status-phase session with a server.
///
/// `ping` and `status` consume the client: a connection carries exactly one
/// query, and a failed read leaves the stream position unknown.
pub struct Client<T = TcpStream> {
    host: String,
    port: u16,
    transport: T,
    phase: Phase,
}

impl Client<TcpStream> {
    pub fn connect(host: impl Into<String>, port: u16) -> Result<Self, ClientError> {
        let host = host.into();
        let stream = transport::connect(&host, port)?;
        Ok(Self::with_transport(host, port, stream))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(host: impl Into<String>, port: u16, transport: T) -> Self {
        Self {
            host: host.into(),
            port,
            transport,
            phase: Phase::Handshaking,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Writes one serverbound packet of the current phase.
    ///
    /// Writing [`SetProtocol`] moves the session to the phase named by its
    /// `next_state`.
    pub fn send(&mut self, packet: impl Into<AnyPacket>) -> Result<(), ClientError> {
        let packet = packet.into();
        let descriptor = packet.descriptor();
        if descriptor.direction != Direction::Serverbound {
            return Err(ProtoError::WrongDirection {
                packet: descriptor.name,
                direction: descriptor.direction,
            }
            .into());
        }
        if descriptor.phase != self.phase {
            return Err(ProtoError::WrongPhase {
                packet: descriptor.name,
                expected: descriptor.phase,
                current: self.phase,
            }
            .into());
        }

        let next_phase = match &packet {
            AnyPacket::SetProtocol(handshake) => Some(
                Phase::from_index(handshake.next_state)
                    .ok_or(ProtoError::InvalidNextState(handshake.next_state))?,
            ),
            _ => None,
        };

        let bytes = packet.encode()?;
        self.transport.write_all(&bytes)?;
        self.transport.flush()?;

        if let Some(next) = next_phase {
            self.phase = next;
        }
        Ok(())
    }

    /// Reads one clientbound packet of the current phase.
    pub fn recv(&mut self) -> Result<AnyPacket, ClientError> {
        let body = self.read_frame()?;
        Ok(registry().decode_body(body, self.phase, Direction::Clientbound)?)
    }

    pub fn recv_expected<P: Packet>(&mut self) -> Result<P, ClientError> {
        Ok(self.recv()?.into_packet()?)
    }

    pub fn handshake(&mut self, next: Phase) -> Result<(), ClientError> {
        self.send(SetProtocol {
            protocol_version: PROTOCOL_VERSION,
            server_address: self.host.clone(),
            server_port: self.port,
            next_state: next.index(),
        })
    }

    /// Round-trips `payload` (current Unix time in milliseconds by default)
    /// and returns what the server echoed.
    pub fn ping(mut self, payload: Option<i64>) -> Result<i64, ClientError> {
        self.handshake(Phase::Status)?;
        self.send(Ping {
            payload: payload.unwrap_or_else(unix_millis),
        })?;
        let pong: Pong = self.recv_expected()?;
        self.close()?;
        Ok(pong.payload)
    }

    pub fn status(mut self) -> Result<ServerInfo, ClientError> {
        self.handshake(Phase::Status)?;
        self.send(Start {})?;
        let response: StatusResponse = self.recv_expected()?;
        self.close()?;
        Ok(ServerInfo::from_json(&response.json)?)
    }

    pub fn close(mut self) -> io::Result<()> {
        self.transport.close()
    }

    fn read_frame(&mut self) -> Result<Bytes, ClientError> {
        let mut prefix = BytesMut::with_capacity(VARINT_MAX_BYTES);
        loop {
            let mut byte = [0u8; 1];
            self.transport.read_exact(&mut byte)?;
            prefix.put_u8(byte[0]);
            if byte[0] & 0x80 == 0 || prefix.len() == VARINT_MAX_BYTES {
                break;
            }
        }

        let mut dec = Decoder::new(prefix.freeze());
        dec.varint()?;
        let len = frame_len(dec.take_varint("packet length")?)?;

        let mut body = BytesMut::zeroed(len);
        self.transport.read_exact(&mut body)?;
        Ok(body.freeze())
    }
}

pub(crate) fn unix_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::{
        cell::{Cell, RefCell},
        io::{Cursor, Read, Write},
        rc::Rc,
    };

    use super::*;
    use crate::proto::encode;

    #[derive(Default)]
    struct MockTransport {
        incoming: Cursor<Vec<u8>>,
        written: Rc<RefCell<Vec<u8>>>,
        closed: Rc<Cell<bool>>,
    }

    impl MockTransport {
        fn replying(frames: &[&[u8]]) -> Self {
            Self {
                incoming: Cursor::new(frames.concat()),
                ..Self::default()
            }
        }
    }

    impl Read for MockTransport {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.incoming.read(buf)
        }
    }

    impl Write for MockTransport {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.borrow_mut().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transport for MockTransport {
        fn close(&mut self) -> io::Result<()> {
            self.closed.set(true);
            Ok(())
        }
    }

    fn handshake_bytes(next_state: i32) -> Vec<u8> {
        encode(&SetProtocol {
            protocol_version: PROTOCOL_VERSION,
            server_address: "localhost".into(),
            server_port: 25565,
            next_state,
        })
        .unwrap()
        .to_vec()
    }

    #[test]
    fn ping_returns_echoed_payload() {
        let pong = encode(&Pong { payload: 42 }).unwrap();
        let transport = MockTransport::replying(&[&pong[..]]);
        let written = Rc::clone(&transport.written);
        let closed = Rc::clone(&transport.closed);

        let client = Client::with_transport("localhost", 25565, transport);
        assert_eq!(client.ping(Some(42)).unwrap(), 42);

        let mut expected = handshake_bytes(1);
        expected.extend_from_slice(&encode(&Ping { payload: 42 }).unwrap());
        assert_eq!(*written.borrow(), expected);
        assert!(closed.get());
    }

    #[test]
    fn ping_does_not_verify_echo() {
        let pong = encode(&Pong { payload: 7 }).unwrap();
        let client =
            Client::with_transport("localhost", 25565, MockTransport::replying(&[&pong[..]]));
        assert_eq!(client.ping(Some(8)).unwrap(), 7);
    }

    #[test]
    fn status_parses_response() {
        let json = r#"{"version":{"name":"1.8","protocol":47},"players":{"max":20,"online":5},"description":"A server"}"#;
        let response = encode(&StatusResponse { json: json.into() }).unwrap();
        let transport = MockTransport::replying(&[&response[..]]);
        let written = Rc::clone(&transport.written);

        let info = Client::with_transport("localhost", 25565, transport)
            .status()
            .unwrap();
        assert_eq!(info.version, "1.8");
        assert_eq!(info.protocol, 47);
        assert_eq!(info.max_players, 20);
        assert_eq!(info.online_players, 5);
        assert_eq!(info.description, "A server");
        assert!(info.icon.is_none());

        let mut expected = handshake_bytes(1);
        expected.extend_from_slice(&[0x01, 0x00]);
        assert_eq!(*written.borrow(), expected);
    }

    #[test]
    fn status_rejects_pong() {
        let pong = encode(&Pong { payload: 1 }).unwrap();
        let client =
            Client::with_transport("localhost", 25565, MockTransport::replying(&[&pong[..]]));
        assert!(matches!(
            client.status(),
            Err(ClientError::Proto(ProtoError::UnexpectedPacket {
                expected: "StatusResponse",
                found: "Pong",
            }))
        ));
    }

    #[test]
    fn handshake_switches_phase() {
        let pong = encode(&Pong { payload: 9 }).unwrap();
        let mut client =
            Client::with_transport("localhost", 25565, MockTransport::replying(&[&pong[..]]));
        assert_eq!(client.phase(), Phase::Handshaking);

        client.handshake(Phase::Status).unwrap();
        assert_eq!(client.phase(), Phase::Status);
        assert_eq!(
            client.recv().unwrap(),
            AnyPacket::Pong(Pong { payload: 9 })
        );
    }

    #[test]
    fn status_packets_are_unknown_before_handshake() {
        let pong = encode(&Pong { payload: 9 }).unwrap();
        let mut client =
            Client::with_transport("localhost", 25565, MockTransport::replying(&[&pong[..]]));
        assert!(matches!(
            client.recv(),
            Err(ClientError::Proto(ProtoError::UnknownPacket {
                phase: Phase::Handshaking,
                direction: Direction::Clientbound,
                id: 0x01,
            }))
        ));
    }

    #[test]
    fn packets_outside_current_phase_are_not_sent() {
        let transport = MockTransport::default();
        let written = Rc::clone(&transport.written);
        let mut client = Client::with_transport("localhost", 25565, transport);

        assert!(matches!(
            client.send(Ping { payload: 1 }),
            Err(ClientError::Proto(ProtoError::WrongPhase {
                expected: Phase::Status,
                current: Phase::Handshaking,
                ..
            }))
        ));
        assert!(matches!(
            client.send(Pong { payload: 1 }),
            Err(ClientError::Proto(ProtoError::WrongDirection { .. }))
        ));
        assert!(written.borrow().is_empty());
    }

    #[test]
    fn handshake_is_one_way() {
        let mut client = Client::with_transport("localhost", 25565, MockTransport::default());
        client.handshake(Phase::Status).unwrap();
        assert!(matches!(
            client.handshake(Phase::Login),
            Err(ClientError::Proto(ProtoError::WrongPhase { .. }))
        ));
        assert_eq!(client.phase(), Phase::Status);
    }

    #[test]
    fn invalid_next_state_keeps_phase() {
        let transport = MockTransport::default();
        let written = Rc::clone(&transport.written);
        let mut client = Client::with_transport("localhost", 25565, transport);
        let result = client.send(SetProtocol {
            protocol_version: PROTOCOL_VERSION,
            server_address: "localhost".into(),
            server_port: 25565,
            next_state: 4,
        });
        assert!(matches!(
            result,
            Err(ClientError::Proto(ProtoError::InvalidNextState(4)))
        ));
        assert_eq!(client.phase(), Phase::Handshaking);
        assert!(written.borrow().is_empty());
    }

    #[test]
    fn overlong_length_prefix_is_fatal() {
        let garbage: &[u8] = &[0xff, 0xff, 0xff, 0xff, 0xff, 0x01];
        let client =
            Client::with_transport("localhost", 25565, MockTransport::replying(&[garbage]));
        assert!(matches!(
            client.ping(Some(1)),
            Err(ClientError::Proto(ProtoError::VarNumTooLong { max_bytes: 5 }))
        ));
    }

    #[test]
    fn truncated_frame_surfaces_io_error() {
        let pong = encode(&Pong { payload: 1 }).unwrap();
        let client = Client::with_transport(
            "localhost",
            25565,
            MockTransport::replying(&[&pong[..pong.len() - 2]]),
        );
        match client.ping(Some(1)) {
            Err(ClientError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof),
            other => panic!("expected EOF, got {other:?}"),
        }
    }
}
