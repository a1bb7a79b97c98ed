#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use std::path::PathBuf;
#[cfg(feature = "std")]
use std::time::Duration;

#[cfg(feature = "std")]
use clap::{Parser, Subcommand};
#[cfg(feature = "std")]
use log::LevelFilter;
#[cfg(feature = "std")]
use rand::{rngs::SmallRng, SeedableRng};

#[cfg(feature = "std")]
use seabattle::{
    init_logging_with, player::cli::read_line, AiPlayer, CliPlayer, GameApi, GameClient,
    MatchOutcome, Player, PlayerNode, PollPolicy, Server, ServerConfig, Stub, WaitPolicies,
    MAX_MATCHES, MAX_PLAYERS,
};

#[derive(Parser)]
#[command(author, version, about = "Sea battle over shared memory", long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    /// More log output (repeat for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Host matches over the shared-memory segment until Ctrl-C.
    Server {
        #[arg(long, help = "File backing the shared-memory segment")]
        segment: Option<PathBuf>,
        #[arg(long, default_value = seabattle::DEFAULT_STATS_FILE)]
        stats_file: PathBuf,
        #[arg(long, default_value_t = MAX_MATCHES)]
        max_matches: usize,
        #[arg(long, default_value_t = MAX_PLAYERS)]
        max_players: usize,
    },
    /// Connect to a running server and play from the terminal.
    Client {
        #[arg(long, help = "File backing the shared-memory segment")]
        segment: Option<PathBuf>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, help = "Let the computer place ships and pick targets")]
        ai: bool,
        #[arg(long, default_value_t = 1000)]
        poll_ms: u64,
        #[arg(long, help = "Override every poll limit")]
        max_polls: Option<u32>,
        #[arg(long, help = "Fix RNG seed for reproducible placement (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
    /// Two computer players against an in-process server.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[cfg(feature = "std")]
fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(s) => SmallRng::seed_from_u64(s),
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    }
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = match cli.verbose {
        0 => seabattle::logging_env_level(),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    init_logging_with(level);

    match cli.command {
        Commands::Server {
            segment,
            stats_file,
            max_matches,
            max_players,
        } => {
            let defaults = ServerConfig::default();
            let config = ServerConfig {
                segment: segment.unwrap_or(defaults.segment),
                stats_file,
                max_matches,
                max_players,
            };
            let server = Server::load(config)?;
            serve(&server).await?;
        }
        Commands::Client {
            segment,
            name,
            ai,
            poll_ms,
            max_polls,
            seed,
        } => {
            let segment = segment.unwrap_or_else(|| ServerConfig::default().segment);
            let transport = open_segment(&segment)?;
            let mut policies = WaitPolicies::default();
            for policy in [&mut policies.join, &mut policies.ships, &mut policies.moves] {
                policy.interval = Duration::from_millis(poll_ms);
                if let Some(max) = max_polls {
                    policy.max_attempts = max;
                }
            }
            run_client(Stub::new(transport), name, ai, policies, make_rng(seed)).await?;
        }
        Commands::Local { seed } => {
            println!("Starting local AI vs AI game...");
            let server = Server::new(ServerConfig::default());
            let mut rng1 = make_rng(seed);
            let mut rng2 = make_rng(seed.map(|s| s.wrapping_add(1)));
            let fast = WaitPolicies::uniform(PollPolicy::new(Duration::from_millis(5), 20_000));

            let mut host = PlayerNode::new(
                Box::new(AiPlayer::new()),
                GameClient::new(Stub::new(server.connect()), "ai-one"),
            )
            .with_policies(fast);
            let mut guest = PlayerNode::new(
                Box::new(AiPlayer::new()),
                GameClient::new(Stub::new(server.connect()), "ai-two"),
            )
            .with_policies(fast);
            host.client().login().await?;
            guest.client().login().await?;
            let created = host.client().create_match("local").await?;
            anyhow::ensure!(created.ok, "{}", created.text);

            let (first, second) = tokio::try_join!(
                host.host_created("local", &mut rng1),
                guest.join("local", &mut rng2)
            )?;
            println!("ai-one: {:?}, ai-two: {:?}", first, second);
        }
    }
    Ok(())
}

#[cfg(all(feature = "std", unix))]
async fn serve(server: &Server) -> anyhow::Result<()> {
    println!("Server started. Press Ctrl+C to stop.");
    server
        .serve_shared_memory(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;
    println!("Server stopped.");
    Ok(())
}

#[cfg(all(feature = "std", not(unix)))]
async fn serve(_server: &Server) -> anyhow::Result<()> {
    anyhow::bail!("shared memory segments are only supported on unix")
}

#[cfg(all(feature = "std", unix))]
fn open_segment(path: &std::path::Path) -> anyhow::Result<seabattle::transport::shm::ShmTransport> {
    seabattle::transport::shm::ShmTransport::open(path)
}

#[cfg(all(feature = "std", not(unix)))]
fn open_segment(_path: &std::path::Path) -> anyhow::Result<seabattle::transport::in_memory::InMemoryTransport> {
    anyhow::bail!("shared memory segments are only supported on unix")
}

#[cfg(feature = "std")]
async fn run_client<A: GameApi>(
    api: A,
    name: Option<String>,
    ai: bool,
    policies: WaitPolicies,
    mut rng: SmallRng,
) -> anyhow::Result<()> {
    let name = match name {
        Some(name) => name,
        None => read_line("Enter your username: ").unwrap_or_default(),
    };
    let mut client = GameClient::new(api, &name);
    let login = client.login().await?;
    println!("{}", login.text);
    if !login.ok {
        anyhow::bail!("login failed");
    }

    let player: Box<dyn Player> = if ai {
        Box::new(AiPlayer::new())
    } else {
        Box::new(CliPlayer::new())
    };
    let mut node = PlayerNode::new(player, client).with_policies(policies);

    loop {
        println!("\n1. Create game\n2. Join game\n3. My statistics\n4. Exit");
        let Some(choice) = read_line("Choice > ") else {
            break;
        };
        let outcome = match choice.as_str() {
            "1" => {
                let game = read_line("Game name: ").unwrap_or_default();
                node.host(&game, &mut rng).await
            }
            "2" => {
                let list = node.client().list_matches().await?;
                print!("{}", list.text);
                let game = read_line("Game name: ").unwrap_or_default();
                node.join(&game, &mut rng).await
            }
            "3" => {
                println!("{}", node.client().stats().await?.text);
                continue;
            }
            "4" => break,
            _ => {
                println!("Invalid choice.");
                continue;
            }
        };
        match outcome {
            Ok(MatchOutcome::Won) => println!("You won!"),
            Ok(MatchOutcome::Lost) => println!("You lost."),
            Ok(MatchOutcome::Abandoned) => println!("Match abandoned."),
            Err(e) => println!("{}", e),
        }
    }

    let bye = node.client().logout().await?;
    println!("{}", bye.text);
    Ok(())
}
