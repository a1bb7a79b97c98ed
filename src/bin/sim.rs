use std::time::Duration;

use rand::{rngs::SmallRng, SeedableRng};
use seabattle::{
    AiPlayer, GameClient, MatchOutcome, PlayerNode, PollPolicy, Server, ServerConfig, Stub,
    WaitPolicies,
};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let mut rng1 = SmallRng::seed_from_u64(seed1);
    let mut rng2 = SmallRng::seed_from_u64(seed2);

    let server = Server::new(ServerConfig::default());
    let policies = WaitPolicies::uniform(PollPolicy::new(Duration::from_millis(2), 50_000));

    let mut p1 = PlayerNode::new(
        Box::new(AiPlayer::new()),
        GameClient::new(Stub::new(server.connect()), "player1"),
    )
    .with_policies(policies);
    let mut p2 = PlayerNode::new(
        Box::new(AiPlayer::new()),
        GameClient::new(Stub::new(server.connect()), "player2"),
    )
    .with_policies(policies);
    p1.client().login().await?;
    p2.client().login().await?;

    // The match has to exist before the second player can join it.
    let created = p1.client().create_match("sim").await?;
    anyhow::ensure!(created.ok, "{}", created.text);

    let f1 = async {
        let outcome = p1.host_created("sim", &mut rng1).await?;
        Ok::<(MatchOutcome, usize), anyhow::Error>((outcome, p1.shots()))
    };
    let f2 = async {
        let outcome = p2.join("sim", &mut rng2).await?;
        Ok::<(MatchOutcome, usize), anyhow::Error>((outcome, p2.shots()))
    };

    let (res1, res2) = tokio::try_join!(f1, f2)?;

    let winner = match (res1.0, res2.0) {
        (MatchOutcome::Won, MatchOutcome::Lost) => Some("player1"),
        (MatchOutcome::Lost, MatchOutcome::Won) => Some("player2"),
        _ => None,
    };

    let result = json!({
        "player1": {"outcome": format!("{:?}", res1.0), "shots": res1.1},
        "player2": {"outcome": format!("{:?}", res2.0), "shots": res2.1},
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
