mod common;

use std::time::Duration;

use seabattle::{
    Dispatcher, GameClient, Message, Phase, PollPolicy, Seat, Server, ServerConfig, Stub,
    WaitOutcome,
};

fn quick(max_attempts: u32) -> PollPolicy {
    PollPolicy::new(Duration::from_millis(1), max_attempts)
}

#[test]
fn test_default_policies() {
    assert_eq!(PollPolicy::opponent_join().max_attempts, 600);
    assert_eq!(PollPolicy::opponent_ships().max_attempts, 300);
    assert_eq!(PollPolicy::opponent_move().max_attempts, 300);
    assert_eq!(PollPolicy::opponent_move().interval, Duration::from_secs(1));
}

#[tokio::test]
async fn test_wait_times_out() -> anyhow::Result<()> {
    let mut client = GameClient::new(Dispatcher::default(), "alice");
    client.login().await?;
    client.create_match("g1").await?;
    let outcome = client.wait_for_opponent("g1", quick(3)).await?;
    assert_eq!(outcome, WaitOutcome::TimedOut);
    Ok(())
}

#[tokio::test]
async fn test_wait_on_missing_match_ends() -> anyhow::Result<()> {
    let mut client = GameClient::new(Dispatcher::default(), "alice");
    let outcome = client.wait_for_fleets("nope", quick(3)).await?;
    assert_eq!(outcome, WaitOutcome::Ended(None));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn test_wait_sees_opponent_join() -> anyhow::Result<()> {
    let server = Server::new(ServerConfig::default());
    let mut alice = GameClient::new(Stub::new(server.connect()), "alice");
    let mut bob = GameClient::new(Stub::new(server.connect()), "bob");
    alice.create_match("g1").await?;

    let waiter = tokio::spawn(async move { alice.wait_for_opponent("g1", quick(2_000)).await });
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(bob.join_match("g1").await?.ok);

    let outcome = waiter.await??;
    assert_eq!(outcome, WaitOutcome::Ready(Phase::PlacingShips));
    Ok(())
}

#[tokio::test]
async fn test_wait_for_turn_during_placement() -> anyhow::Result<()> {
    let mut dispatcher = Dispatcher::default();
    dispatcher.dispatch(Message::create_match("alice", "g1"));
    dispatcher.dispatch(Message::join_match("bob", "g1"));
    let mut client = GameClient::new(dispatcher, "bob");
    // placement never finishes, so the turn never comes
    let outcome = client
        .wait_for_turn("g1", Seat::Second, quick(2))
        .await?;
    assert_eq!(outcome, WaitOutcome::TimedOut);

    let outcome = client
        .wait_until("g1", quick(2), |phase| phase == Phase::PlacingShips)
        .await?;
    assert_eq!(outcome, WaitOutcome::Ready(Phase::PlacingShips));
    Ok(())
}

#[tokio::test]
async fn test_wait_for_turn_reports_game_over() -> anyhow::Result<()> {
    let mut dispatcher = Dispatcher::default();
    common::start_match(&mut dispatcher, "alice", "bob", "g1");
    for (x, y) in common::fleet_cells() {
        dispatcher.dispatch(Message::make_move("alice", "g1", x, y));
    }
    let mut client = GameClient::new(dispatcher, "bob");
    let outcome = client
        .wait_for_turn("g1", Seat::Second, quick(2))
        .await?;
    assert_eq!(
        outcome,
        WaitOutcome::Ended(Some(Phase::GameOver { winner: Seat::First }))
    );
    Ok(())
}
