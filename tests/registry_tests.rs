use seabattle::{MatchRegistry, Phase, PlayerDirectory, RegistryError, Seat};

fn directory(names: &[&str]) -> PlayerDirectory {
    let mut players = PlayerDirectory::default();
    for name in names {
        players.login(name).unwrap();
    }
    players
}

#[test]
fn test_create_and_find() {
    let mut players = directory(&["alice"]);
    let mut registry = MatchRegistry::new(4);
    let id = registry.create("g1", "alice", &mut players).unwrap();
    assert_eq!(registry.find("g1"), Some(id));
    assert_eq!(registry.len(), 1);
    let game = registry.get(id).unwrap();
    assert_eq!(game.creator(), "alice");
    assert_eq!(game.phase(), Phase::WaitingForPlayer);
    let alice = players.get("alice").unwrap();
    assert!(alice.in_match);
    assert_eq!(alice.current_match.as_deref(), Some("g1"));
}

#[test]
fn test_duplicate_and_invalid_names() {
    let mut players = directory(&["alice", "bob"]);
    let mut registry = MatchRegistry::new(4);
    registry.create("g1", "alice", &mut players).unwrap();
    assert_eq!(
        registry.create("g1", "bob", &mut players),
        Err(RegistryError::AlreadyExists)
    );
    assert_eq!(
        registry.create("", "bob", &mut players),
        Err(RegistryError::InvalidName)
    );
    let long = "x".repeat(64);
    assert_eq!(
        registry.create(&long, "bob", &mut players),
        Err(RegistryError::InvalidName)
    );
}

#[test]
fn test_capacity_checked_before_duplicate() {
    let mut players = directory(&["alice"]);
    let mut registry = MatchRegistry::new(2);
    registry.create("g1", "alice", &mut players).unwrap();
    registry.create("g2", "alice", &mut players).unwrap();
    assert!(registry.is_full());
    assert_eq!(
        registry.create("g1", "alice", &mut players),
        Err(RegistryError::CapacityExceeded)
    );
    assert_eq!(
        registry.create("g3", "alice", &mut players),
        Err(RegistryError::CapacityExceeded)
    );
    assert_eq!(registry.len(), 2);
    assert!(registry.find("g3").is_none());
}

#[test]
fn test_join_flow() {
    let mut players = directory(&["alice", "bob", "carol"]);
    let mut registry = MatchRegistry::new(4);
    registry.create("g1", "alice", &mut players).unwrap();

    assert_eq!(
        registry.join("nope", "bob", &mut players),
        Err(RegistryError::NotFound)
    );
    assert_eq!(
        registry.join("g1", "alice", &mut players),
        Err(RegistryError::NotJoinable)
    );

    let joined = registry.join("g1", "bob", &mut players).unwrap();
    assert_eq!(joined.seat, Seat::Second);
    assert_eq!(joined.opponent, "alice");
    assert_eq!(joined.phase, Phase::PlacingShips);
    assert!(players.get("bob").unwrap().in_match);

    assert_eq!(
        registry.join("g1", "carol", &mut players),
        Err(RegistryError::NotJoinable)
    );
    let rejoin = registry.join("g1", "alice", &mut players).unwrap();
    assert_eq!(rejoin.seat, Seat::First);
    assert_eq!(rejoin.opponent, "bob");
}

#[test]
fn test_joinable_excludes_own_and_started() {
    let mut players = directory(&["alice", "bob", "carol"]);
    let mut registry = MatchRegistry::new(4);
    registry.create("a1", "alice", &mut players).unwrap();
    registry.create("b1", "bob", &mut players).unwrap();
    registry.create("a2", "alice", &mut players).unwrap();
    registry.join("b1", "carol", &mut players).unwrap();

    let names: Vec<_> = registry.joinable("carol").map(|g| g.name()).collect();
    assert_eq!(names, vec!["a1", "a2"]);
    let names: Vec<_> = registry.joinable("alice").map(|g| g.name()).collect();
    assert!(names.is_empty());
}

#[test]
fn test_abandon_frees_name_not_slot() {
    let mut players = directory(&["alice", "bob"]);
    let mut registry = MatchRegistry::new(2);
    registry.create("g1", "alice", &mut players).unwrap();
    assert_eq!(registry.abandon_waiting("alice"), 1);
    assert_eq!(registry.find("g1"), None);
    assert!(registry.by_name("g1").is_none());
    assert_eq!(registry.len(), 1);

    registry.create("g1", "bob", &mut players).unwrap();
    assert_eq!(registry.by_name("g1").unwrap().creator(), "bob");
    assert_eq!(
        registry.create("g3", "bob", &mut players),
        Err(RegistryError::CapacityExceeded)
    );
}
