use seabattle::{
    BoardSnapshot, CellState, Message, MessageKind, Orientation, Phase, Seat, ShotOutcome,
    MAX_TEXT_LEN,
};

#[test]
fn test_wire_codes() {
    assert_eq!(MessageKind::Login.code(), 3);
    assert_eq!(MessageKind::MakeMove.code(), 15);
    assert_eq!(MessageKind::MoveResult.code(), 16);
    assert_eq!(MessageKind::GameStatus.code(), 17);
    assert_eq!(MessageKind::StatsData.code(), 19);
    assert_eq!(MessageKind::Error.code(), 99);
    assert_eq!(MessageKind::from(20), MessageKind::Logout);
    assert_eq!(MessageKind::from(1), MessageKind::Other(1));
    assert_eq!(MessageKind::GameStatus.response(), Some(MessageKind::GameStatus));
    assert_eq!(MessageKind::LoginResponse.response(), None);
}

#[test]
fn test_bincode_keeps_every_field() {
    let mut msg = Message::place_ship("alice", "g1", 3, 4, 2, Orientation::Vertical);
    msg.shot = Some(ShotOutcome::ShipDestroyed);
    msg.phase = Some(Phase::GameOver { winner: Seat::Second });
    msg.snapshot = Some(BoardSnapshot {
        own: vec![CellState::Ship, CellState::Hit],
        target: vec![CellState::Miss],
    });
    msg.set_text("hello");
    let bytes = msg.encode().unwrap();
    let back = Message::decode(&bytes).unwrap();
    assert_eq!(back, msg);
    assert_eq!(back.orientation(), Orientation::Vertical);
}

#[test]
fn test_unknown_kind_survives_decoding() {
    let msg = Message::new(MessageKind::Other(4242), "x");
    let back = Message::decode(&msg.encode().unwrap()).unwrap();
    assert_eq!(back.kind, MessageKind::Other(4242));
}

#[test]
fn test_garbage_does_not_decode() {
    assert!(Message::decode(&[0xff; 4]).is_err());
    assert!(Message::decode(&[]).is_err());
}

#[test]
fn test_text_is_capped_on_char_boundary() {
    let mut msg = Message::default();
    msg.set_text("é".repeat(MAX_TEXT_LEN));
    assert!(msg.text.len() <= MAX_TEXT_LEN);
    assert_eq!(msg.text.len(), MAX_TEXT_LEN);
    assert!(msg.text.chars().all(|c| c == 'é'));

    let mut msg = Message::default();
    msg.set_text("a".repeat(MAX_TEXT_LEN + 1) + "é");
    assert_eq!(msg.text.len(), MAX_TEXT_LEN);
}

#[test]
fn test_reply_keeps_routing_fields() {
    let mut request = Message::make_move("bob", "g7", 2, 8);
    request.text = "stale".to_string();
    request.ok = true;
    let reply = request.into_reply(MessageKind::MoveResult);
    assert_eq!(reply.username, "bob");
    assert_eq!(reply.match_name, "g7");
    assert_eq!((reply.x, reply.y), (2, 8));
    assert!(reply.text.is_empty());
    assert!(!reply.ok);
}
