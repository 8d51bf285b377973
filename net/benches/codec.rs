use bytes::Bytes;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use net::{
    encode, registry, AnyPacket, Direction, Ping, Pong, SetProtocol, Start, StatusResponse,
    PROTOCOL_VERSION,
};

const STATUS_JSON: &str = "{\"version\":{\"name\":\"1.8.9\",\"protocol\":47},\"players\":{\"max\":10,\"online\":0},\"description\":{\"text\":\"Lobby\"}}";

fn sample_packets() -> Vec<AnyPacket> {
    vec![
        SetProtocol {
            protocol_version: PROTOCOL_VERSION,
            server_address: "localhost".into(),
            server_port: 25565,
            next_state: 1,
        }
        .into(),
        Start {}.into(),
        Ping { payload: 1_234_567 }.into(),
        StatusResponse {
            json: STATUS_JSON.into(),
        }
        .into(),
        Pong { payload: 1_234_567 }.into(),
    ]
}

fn bench_encode(c: &mut Criterion) {
    let packets = sample_packets();
    c.bench_function("encode_all", |b| {
        b.iter(|| {
            for packet in &packets {
                black_box(packet.encode().unwrap());
            }
        })
    });
}

fn bench_decode(c: &mut Criterion) {
    let frames: Vec<(Bytes, AnyPacket)> = sample_packets()
        .into_iter()
        .map(|packet| (packet.encode().unwrap().freeze(), packet))
        .collect();
    c.bench_function("decode_all", |b| {
        b.iter(|| {
            for (frame, packet) in &frames {
                let descriptor = packet.descriptor();
                let mut src = frame.clone();
                black_box(
                    registry()
                        .decode(&mut src, descriptor.phase, descriptor.direction)
                        .unwrap(),
                );
            }
        })
    });
}

fn bench_status_response(c: &mut Criterion) {
    let frame = encode(&StatusResponse {
        json: STATUS_JSON.repeat(64),
    })
    .unwrap()
    .freeze();
    c.bench_function("decode_large_status_response", |b| {
        b.iter(|| {
            let mut src = frame.clone();
            black_box(
                registry()
                    .decode(&mut src, net::Phase::Status, Direction::Clientbound)
                    .unwrap(),
            );
        })
    });
}

criterion_group!(benches, bench_encode, bench_decode, bench_status_response);
criterion_main!(benches);
