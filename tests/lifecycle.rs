//! End-to-end lifecycle tests: a scripted reliable-delivery engine driven
//! through handshake, data exchange, engine errors and disconnection, with
//! every application-visible notification captured in order.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use relnet::{
    Channel, PeerEngine, PeerErrorKind, PeerEvents, PeerState, ServerConnection,
    ServerConnectionConfigBuilder,
};

const COOKIE: u32 = 0xAABBCCDD;
const REMOTE: &str = "198.51.100.23:19700";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Connected(SocketAddr),
    Data(Vec<u8>, Channel),
    Disconnected,
    Error(PeerErrorKind, String),
    RawSend(Vec<u8>),
}

/// Engine double with a scripted reaction per reliable payload:
/// `hello` completes the handshake, `bye` disconnects, `ping` asks for
/// bytes on the wire, `err:<msg>` reports a decode error, anything else is
/// delivered as application data.
struct ScriptedEngine {
    state: PeerState,
}

impl ScriptedEngine {
    fn new() -> Self {
        Self {
            state: PeerState::Handshaking,
        }
    }
}

impl PeerEngine for ScriptedEngine {
    fn state(&self) -> PeerState {
        self.state
    }

    fn ingest_reliable(&mut self, payload: Bytes, events: &mut dyn PeerEvents) {
        match &payload[..] {
            b"hello" => {
                self.state = PeerState::Authenticated;
                events.on_authenticated();
            }
            b"bye" => {
                self.state = PeerState::Disconnected;
                events.on_disconnected();
            }
            b"ping" => events.raw_send(b"pong"),
            p if p.starts_with(b"err:") => {
                let msg = std::str::from_utf8(&p[4..]).unwrap_or("unreadable");
                events.on_error(PeerErrorKind::Decode, msg);
            }
            _ => events.on_data(payload.clone(), Channel::Reliable),
        }
    }

    fn ingest_unreliable(&mut self, payload: Bytes, events: &mut dyn PeerEvents) {
        events.on_data(payload, Channel::Unreliable);
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn connection() -> (ServerConnection<ScriptedEngine>, Arc<Mutex<Vec<Event>>>) {
    init_tracing();

    let events = Arc::new(Mutex::new(Vec::new()));
    let e1 = events.clone();
    let e2 = events.clone();
    let e3 = events.clone();
    let e4 = events.clone();
    let e5 = events.clone();

    let config = ServerConnectionConfigBuilder::new()
        .remote_addr(REMOTE.parse::<SocketAddr>().unwrap())
        .cookie(COOKIE)
        .on_connected(move |addr| e1.lock().unwrap().push(Event::Connected(addr)))
        .on_data(move |payload, channel| {
            e2.lock()
                .unwrap()
                .push(Event::Data(payload.to_vec(), channel))
        })
        .on_disconnected(move || e3.lock().unwrap().push(Event::Disconnected))
        .on_error(move |kind, msg| e4.lock().unwrap().push(Event::Error(kind, msg.to_string())))
        .on_raw_send(move |bytes| e5.lock().unwrap().push(Event::RawSend(bytes.to_vec())))
        .build()
        .unwrap();

    (ServerConnection::new(config, ScriptedEngine::new()), events)
}

fn frame(channel_id: u8, cookie: u32, payload: &[u8]) -> Bytes {
    let mut buf = Vec::with_capacity(5 + payload.len());
    buf.push(channel_id);
    buf.extend_from_slice(&cookie.to_le_bytes());
    buf.extend_from_slice(payload);
    Bytes::from(buf)
}

#[test]
fn ack_precedes_connected_callback() {
    let (mut conn, events) = connection();

    // The handshake hello arrives before the remote can know the cookie.
    conn.handle_raw_input(frame(0x01, 0x0000_0000, b"hello"));

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            Event::RawSend(vec![0x00, 0xDD, 0xCC, 0xBB, 0xAA]),
            Event::Connected(REMOTE.parse().unwrap()),
        ]
    );
}

#[test]
fn full_lifecycle() {
    let (mut conn, events) = connection();

    // Handshake with a garbage cookie: accepted while unauthenticated.
    conn.handle_raw_input(frame(0x01, 0xDEAD_BEEF, b"hello"));
    assert_eq!(conn.state(), PeerState::Authenticated);

    // Data now requires the real cookie.
    conn.handle_raw_input(frame(0x01, COOKIE, b"request"));
    conn.handle_raw_input(frame(0x02, COOKIE, b"telemetry"));

    // Spoofed frame: dropped without any application-visible effect.
    conn.handle_raw_input(frame(0x01, 0x0000_0000, b"forged"));

    // Engine-reported error: forwarded verbatim, connection stays up.
    conn.handle_raw_input(frame(0x01, COOKIE, b"err:bad frame"));
    assert_eq!(conn.state(), PeerState::Authenticated);

    // Graceful close.
    conn.handle_raw_input(frame(0x01, COOKIE, b"bye"));
    assert_eq!(conn.state(), PeerState::Disconnected);

    let events = events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            Event::RawSend(vec![0x00, 0xDD, 0xCC, 0xBB, 0xAA]),
            Event::Connected(REMOTE.parse().unwrap()),
            Event::Data(b"request".to_vec(), Channel::Reliable),
            Event::Data(b"telemetry".to_vec(), Channel::Unreliable),
            Event::Error(PeerErrorKind::Decode, "bad frame".to_string()),
            Event::Disconnected,
        ]
    );

    let stats = conn.stats();
    assert_eq!(stats.frames_received, 6);
    assert_eq!(stats.payloads_forwarded, 5);
    assert_eq!(stats.dropped_cookie_mismatch, 1);
}

#[test]
fn engine_raw_send_passes_through_unchanged() {
    let (mut conn, events) = connection();

    conn.handle_raw_input(frame(0x01, 0x1234_5678, b"ping"));

    assert_eq!(
        *events.lock().unwrap(),
        vec![Event::RawSend(b"pong".to_vec())]
    );
}

#[test]
fn noise_never_reaches_the_engine() {
    let (mut conn, events) = connection();

    // Undersized, unknown channel, and spoofed-after-auth frames.
    conn.handle_raw_input(Bytes::from_static(&[0x01, 0x02, 0x03]));
    conn.handle_raw_input(frame(0x09, COOKIE, b"noise"));
    conn.handle_raw_input(frame(0x01, 0x0000_0000, b"hello"));
    conn.handle_raw_input(frame(0xFF, COOKIE, b"noise"));
    conn.handle_raw_input(frame(0x02, 0x4141_4141, b"spoof"));

    let events = events.lock().unwrap();
    // Only the handshake produced application-visible activity.
    assert_eq!(
        *events,
        vec![
            Event::RawSend(vec![0x00, 0xDD, 0xCC, 0xBB, 0xAA]),
            Event::Connected(REMOTE.parse().unwrap()),
        ]
    );
}
