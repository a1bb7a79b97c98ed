use seabattle::{DirectoryError, Dispatcher, Login, Message, PlayerDirectory, PlayerRecord};

#[test]
fn test_register_then_return() {
    let mut players = PlayerDirectory::new(10);
    assert_eq!(players.login("alice"), Ok(Login::Registered));
    assert_eq!(players.login("alice"), Err(DirectoryError::AlreadyOnline));
    players.logout("alice").unwrap();
    assert_eq!(
        players.login("alice"),
        Ok(Login::Returning { wins: 0, losses: 0 })
    );
    assert!(players.get("alice").unwrap().online);
}

#[test]
fn test_names_validated() {
    let mut players = PlayerDirectory::new(10);
    assert_eq!(players.login(""), Err(DirectoryError::InvalidName));
    assert_eq!(
        players.login(&"n".repeat(64)),
        Err(DirectoryError::InvalidName)
    );
    assert_eq!(players.login(&"n".repeat(63)), Ok(Login::Registered));
}

#[test]
fn test_capacity() {
    let mut players = PlayerDirectory::new(2);
    players.login("a").unwrap();
    players.login("b").unwrap();
    assert_eq!(players.login("c"), Err(DirectoryError::Full));
    // known players still get back in when the table is full
    players.logout("a").unwrap();
    assert!(players.login("a").is_ok());
}

#[test]
fn test_logout_unknown() {
    let mut players = PlayerDirectory::new(2);
    assert_eq!(players.logout("ghost"), Err(DirectoryError::UnknownPlayer));
}

#[test]
fn test_record_result_and_win_rate() {
    let mut players = PlayerDirectory::new(10);
    players.login("alice").unwrap();
    players.login("bob").unwrap();
    players.enter_match("alice", "g1");
    players.enter_match("bob", "g1");
    players.record_result("alice", "bob");
    players.record_result("alice", "bob");
    players.record_result("bob", "alice");

    let alice = players.get("alice").unwrap();
    assert_eq!((alice.wins, alice.losses), (2, 1));
    assert!(!alice.in_match);
    assert!(alice.current_match.is_none());
    assert_eq!(alice.games_played(), 3);
    assert!((alice.win_rate() - 66.666_67).abs() < 0.01);
    assert_eq!(PlayerRecord::new("x").win_rate(), 0.0);
}

#[test]
fn test_from_records_resets_presence() {
    let mut stored = PlayerRecord::with_totals("alice", 4, 2);
    stored.online = true;
    stored.in_match = true;
    let records = vec![
        stored,
        PlayerRecord::with_totals("bob", 0, 1),
        PlayerRecord::with_totals("carol", 1, 1),
    ];
    let players = PlayerDirectory::from_records(records, 2);
    assert_eq!(players.len(), 2);
    let alice = players.get("alice").unwrap();
    assert!(!alice.online && !alice.in_match);
    assert_eq!(alice.wins, 4);
    assert!(players.get("carol").is_none());
}

#[test]
fn test_totals_at_the_limit_do_not_overflow() {
    let records = vec![
        PlayerRecord::with_totals("alice", u32::MAX, 1),
        PlayerRecord::with_totals("bob", 3, u32::MAX),
    ];
    let mut players = PlayerDirectory::from_records(records, 10);
    assert_eq!(
        players.get("alice").unwrap().games_played(),
        u64::from(u32::MAX) + 1
    );

    players.record_result("alice", "bob");
    let alice = players.get("alice").unwrap();
    assert_eq!(alice.wins, u32::MAX);
    assert!(alice.win_rate() > 99.9);
    assert_eq!(players.get("bob").unwrap().losses, u32::MAX);

    let mut d = Dispatcher::with_players(players, 20);
    let reply = d.dispatch(Message::get_stats("alice"));
    assert!(reply.ok);
    assert!(reply.text.contains(&format!("Wins: {}", u32::MAX)));
}
