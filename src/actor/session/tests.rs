use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::time::Duration;

use super::{PendingSession, SessionHandle, SessionId, SessionLimits};
use crate::actor::mailbox::{Address, Mailbox, mailbox};
use crate::actor::messages::{CoordinatorMsg, SessionMsg};
use crate::protocol::{Command, Frame, read_frame, write_frame};

const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    session: SessionHandle,
    client: TcpStream,
    coordinator: Mailbox<CoordinatorMsg>,
    // keeps the coordinator mailbox open for the whole test
    _coordinator_addr: Address<CoordinatorMsg>,
}

fn connected_pair() -> (TcpStream, TcpStream) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let client = TcpStream::connect(listener.local_addr().unwrap()).unwrap();
    let (server, _) = listener.accept().unwrap();
    client.set_read_timeout(Some(WAIT)).unwrap();
    (server, client)
}

fn start(limits: SessionLimits) -> Harness {
    let (server, client) = connected_pair();
    let (addr, coordinator) = mailbox();
    let pending = PendingSession::new(server, addr.clone(), limits).unwrap();
    assert_eq!(pending.host(), "127.0.0.1");
    let session = pending.start().unwrap();
    Harness {
        session,
        client,
        coordinator,
        _coordinator_addr: addr,
    }
}

fn expect_reply(mb: &Mailbox<CoordinatorMsg>) -> (SessionId, String) {
    match mb.receive_timeout(WAIT) {
        Some(CoordinatorMsg::MessageFromClient { session, text }) => (session, text),
        Some(other) => panic!("expected message-from-client, got {}", other.kind()),
        None => panic!("timed out waiting for message-from-client"),
    }
}

fn expect_closed(mb: &Mailbox<CoordinatorMsg>) -> SessionId {
    match mb.receive_timeout(WAIT) {
        Some(CoordinatorMsg::SessionClosed(id)) => id,
        Some(other) => panic!("expected session-closed, got {}", other.kind()),
        None => panic!("timed out waiting for session-closed"),
    }
}

fn expect_silence(mb: &Mailbox<CoordinatorMsg>) {
    if let Some(msg) = mb.receive_timeout(Duration::from_millis(200)) {
        panic!("unexpected {}", msg.kind());
    }
}

#[test]
fn test_run_program_frame_and_reply() {
    let mut h = start(SessionLimits::default());

    h.session.post(SessionMsg::RunProgram("print(1)".into()));

    let mut wire = [0u8; 16];
    h.client.read_exact(&mut wire).unwrap();
    assert_eq!(&wire[..8], &[1, 0, 0, 0, 8, 0, 0, 0]);
    assert_eq!(&wire[8..], b"print(1)");

    h.client.write_all(&[3, 0, 0, 0, 1, 0, 0, 0, b'5']).unwrap();

    let (id, text) = expect_reply(&h.coordinator);
    assert_eq!(id, h.session.id());
    assert_eq!(text, "5");
}

#[test]
fn test_reset_frame_is_empty() {
    let mut h = start(SessionLimits::default());

    h.session.post(SessionMsg::Reset);
    let frame = read_frame(&mut h.client, u32::MAX).unwrap();
    assert_eq!(frame.command(), Some(Command::Reset));
    assert!(frame.payload.is_empty());

    write_frame(&mut h.client, &Frame::reply("reset")).unwrap();
    assert_eq!(expect_reply(&h.coordinator).1, "reset");
}

#[test]
fn test_selection_sent_as_latin1() {
    let mut h = start(SessionLimits::default());

    h.session.post(SessionMsg::RunSelection("s = '\u{e9}'".into()));
    let frame = read_frame(&mut h.client, u32::MAX).unwrap();
    assert_eq!(frame.command(), Some(Command::RunScript));
    assert_eq!(frame.payload, vec![b's', b' ', b'=', b' ', b'\'', 0xE9, b'\'']);
}

#[test]
fn test_intents_processed_in_post_order() {
    let mut h = start(SessionLimits::default());

    h.session.post(SessionMsg::RunProgram("a()".into()));
    h.session.post(SessionMsg::Reset);
    h.session.post(SessionMsg::RunSelection("b()".into()));

    let mut seen = Vec::new();
    for i in 0..3 {
        let frame = read_frame(&mut h.client, u32::MAX).unwrap();
        seen.push((frame.code, frame.text()));
        write_frame(&mut h.client, &Frame::reply(&i.to_string())).unwrap();
    }

    assert_eq!(
        seen,
        vec![(1, "a()".to_string()), (2, String::new()), (1, "b()".to_string())]
    );
    for i in 0..3 {
        assert_eq!(expect_reply(&h.coordinator).1, i.to_string());
    }
}

#[test]
fn test_unknown_reply_code_ignored() {
    let mut h = start(SessionLimits::default());

    h.session.post(SessionMsg::Reset);
    read_frame(&mut h.client, u32::MAX).unwrap();
    write_frame(
        &mut h.client,
        &Frame {
            code: 7,
            payload: b"noise".to_vec(),
        },
    )
    .unwrap();
    expect_silence(&h.coordinator);

    // stream is still in sync for the next exchange
    h.session.post(SessionMsg::RunProgram("x()".into()));
    assert_eq!(read_frame(&mut h.client, u32::MAX).unwrap().text(), "x()");
    write_frame(&mut h.client, &Frame::reply("ok")).unwrap();
    assert_eq!(expect_reply(&h.coordinator).1, "ok");
}

#[test]
fn test_read_failure_mid_frame_closes_once() {
    let mut h = start(SessionLimits::default());

    h.session.post(SessionMsg::Reset);
    read_frame(&mut h.client, u32::MAX).unwrap();

    // half a header, then hang up
    h.client.write_all(&[3, 0, 0, 0]).unwrap();
    h.client.shutdown(Shutdown::Both).unwrap();

    assert_eq!(expect_closed(&h.coordinator), h.session.id());
    expect_silence(&h.coordinator);
}

#[test]
fn test_client_gone_before_command_closes() {
    let h = start(SessionLimits::default());
    drop(h.client);

    h.session.post(SessionMsg::RunProgram("print(1)".into()));
    assert_eq!(expect_closed(&h.coordinator), h.session.id());
    expect_silence(&h.coordinator);
}

#[test]
fn test_oversized_reply_closes() {
    let mut h = start(SessionLimits {
        max_payload: 4,
        reply_timeout: None,
    });

    h.session.post(SessionMsg::Reset);
    read_frame(&mut h.client, u32::MAX).unwrap();
    write_frame(&mut h.client, &Frame::reply("far too long")).unwrap();

    assert_eq!(expect_closed(&h.coordinator), h.session.id());
}

#[test]
fn test_reply_timeout_closes() {
    let mut h = start(SessionLimits {
        max_payload: 1024,
        reply_timeout: Some(Duration::from_millis(100)),
    });

    h.session.post(SessionMsg::Reset);
    read_frame(&mut h.client, u32::MAX).unwrap();
    // never reply

    assert_eq!(expect_closed(&h.coordinator), h.session.id());
}

#[test]
fn test_dropping_handle_stops_idle_session() {
    let h = start(SessionLimits::default());
    let id = h.session.id();

    drop(h.session);
    assert_eq!(expect_closed(&h.coordinator), id);
}

#[test]
fn test_session_ids_unique() {
    let a = start(SessionLimits::default());
    let b = start(SessionLimits::default());
    assert_ne!(a.session.id(), b.session.id());
    assert!(b.session.id() > a.session.id());
}
