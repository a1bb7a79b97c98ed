#![cfg(feature = "std")]

use anyhow::bail;
use rand::rngs::SmallRng;

use crate::{
    ai::TargetView,
    board::Board,
    client::{GameClient, PollPolicy, WaitOutcome},
    common::ShotOutcome,
    game::{Phase, Seat},
    player::Player,
    protocol::GameApi,
};

/// Invalid shots tolerated in a row before the node gives up on a player.
const MAX_REJECTED_SHOTS: usize = 3;

/// How a match ended from this node's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    Won,
    Lost,
    /// Gave up waiting on the opponent, or the match went away.
    Abandoned,
}

/// Poll limits for the three waits of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitPolicies {
    pub join: PollPolicy,
    pub ships: PollPolicy,
    pub moves: PollPolicy,
}

impl Default for WaitPolicies {
    fn default() -> Self {
        Self {
            join: PollPolicy::opponent_join(),
            ships: PollPolicy::opponent_ships(),
            moves: PollPolicy::opponent_move(),
        }
    }
}

impl WaitPolicies {
    /// Same policy for every wait.
    pub fn uniform(policy: PollPolicy) -> Self {
        Self {
            join: policy,
            ships: policy,
            moves: policy,
        }
    }
}

/// Drives one player through a whole match against the server.
pub struct PlayerNode<A: GameApi> {
    player: Box<dyn Player>,
    client: GameClient<A>,
    policies: WaitPolicies,
    shots: usize,
}

impl<A: GameApi> PlayerNode<A> {
    pub fn new(player: Box<dyn Player>, client: GameClient<A>) -> Self {
        Self {
            player,
            client,
            policies: WaitPolicies::default(),
            shots: 0,
        }
    }

    pub fn with_policies(mut self, policies: WaitPolicies) -> Self {
        self.policies = policies;
        self
    }

    pub fn client(&mut self) -> &mut GameClient<A> {
        &mut self.client
    }

    pub fn into_client(self) -> GameClient<A> {
        self.client
    }

    /// Shots fired in the last match.
    pub fn shots(&self) -> usize {
        self.shots
    }

    /// Create `name`, wait for a challenger, then play as the first seat.
    pub async fn host(&mut self, name: &str, rng: &mut SmallRng) -> anyhow::Result<MatchOutcome> {
        let created = self.client.create_match(name).await?;
        if !created.ok {
            bail!("{}", created.text);
        }
        self.player.notify(&created.text);
        self.host_created(name, rng).await
    }

    /// Like [`host`](Self::host) for a match this player already created.
    pub async fn host_created(
        &mut self,
        name: &str,
        rng: &mut SmallRng,
    ) -> anyhow::Result<MatchOutcome> {
        match self.client.wait_for_opponent(name, self.policies.join).await? {
            WaitOutcome::Ready(_) => {}
            WaitOutcome::Ended(_) => return Ok(MatchOutcome::Abandoned),
            WaitOutcome::TimedOut => {
                self.player
                    .notify("Waited too long for an opponent. Returning to main menu.");
                return Ok(MatchOutcome::Abandoned);
            }
        }

        // The creator re-joins to move from waiting into placement.
        let joined = self.client.join_match(name).await?;
        if !joined.ok {
            bail!("{}", joined.text);
        }
        self.player
            .notify(&format!("{} joined your game.", joined.opponent));
        self.play(name, Seat::First, rng).await
    }

    /// Join `name` as the second seat and play it out.
    pub async fn join(&mut self, name: &str, rng: &mut SmallRng) -> anyhow::Result<MatchOutcome> {
        let joined = self.client.join_match(name).await?;
        if !joined.ok {
            bail!("{}", joined.text);
        }
        self.player.notify(&joined.text);
        self.play(name, Seat::Second, rng).await
    }

    async fn play(&mut self, name: &str, seat: Seat, rng: &mut SmallRng) -> anyhow::Result<MatchOutcome> {
        self.shots = 0;
        self.place_fleet(name, rng).await?;

        let ready = self.client.ships_ready(name).await?;
        self.player.notify(&ready.text);
        if !ready.ok && !matches!(ready.phase, Some(Phase::Turn(_))) {
            bail!("{}", ready.text);
        }
        match self.client.wait_for_fleets(name, self.policies.ships).await? {
            WaitOutcome::Ready(_) => {}
            WaitOutcome::Ended(phase) => return Ok(Self::verdict(phase, seat)),
            WaitOutcome::TimedOut => {
                self.player.notify("Waited too long for opponent...");
                return Ok(MatchOutcome::Abandoned);
            }
        }

        loop {
            match self.client.wait_for_turn(name, seat, self.policies.moves).await? {
                WaitOutcome::Ready(_) => {}
                WaitOutcome::Ended(phase) => {
                    self.refresh(name).await?;
                    return Ok(Self::verdict(phase, seat));
                }
                WaitOutcome::TimedOut => {
                    self.player.notify("Waited too long for opponent's move...");
                    return Ok(MatchOutcome::Abandoned);
                }
            }
            if let Some(outcome) = self.take_turn(name, seat, rng).await? {
                return Ok(outcome);
            }
        }
    }

    /// Fire until the turn passes. Returns the outcome if the match ended.
    async fn take_turn(
        &mut self,
        name: &str,
        seat: Seat,
        rng: &mut SmallRng,
    ) -> anyhow::Result<Option<MatchOutcome>> {
        let mut rejected = 0;
        loop {
            let view = self.refresh(name).await?;
            let (x, y) = self.player.select_target(rng, &view);
            let result = self.client.make_move(name, x as i32, y as i32).await?;
            let Some(outcome) = result.shot.filter(|_| result.ok) else {
                self.player.notify(&result.text);
                if result.phase != Some(Phase::Turn(seat)) {
                    return Ok(None);
                }
                rejected += 1;
                if rejected >= MAX_REJECTED_SHOTS {
                    bail!("too many rejected shots: {}", result.text);
                }
                continue;
            };
            rejected = 0;
            self.shots += 1;
            self.player.handle_shot_result((x, y), outcome);
            match outcome {
                ShotOutcome::Victory => {
                    if let Some(snapshot) = &result.snapshot {
                        self.player.show_boards(snapshot);
                    }
                    return Ok(Some(MatchOutcome::Won));
                }
                ShotOutcome::Miss => return Ok(None),
                ShotOutcome::Hit | ShotOutcome::ShipDestroyed => {}
            }
        }
    }

    /// Fetch the current boards, show them, and return the target view.
    async fn refresh(&mut self, name: &str) -> anyhow::Result<TargetView> {
        let status = self.client.game_status(name).await?;
        Ok(match &status.snapshot {
            Some(snapshot) => {
                self.player.show_boards(snapshot);
                TargetView::from_cells(&snapshot.target)
            }
            None => TargetView::default(),
        })
    }

    async fn place_fleet(&mut self, name: &str, rng: &mut SmallRng) -> anyhow::Result<()> {
        let mut board = Board::new();
        self.player
            .place_fleet(rng, &mut board)
            .map_err(|e| anyhow::anyhow!(e))?;
        let ships: Vec<_> = board.ships().copied().collect();
        let mut last = String::new();
        for ship in ships {
            let (x, y) = ship.origin();
            let placed = self
                .client
                .place_ship(name, x as i32, y as i32, ship.length(), ship.orientation())
                .await?;
            if !placed.ok {
                bail!("{}", placed.text);
            }
            last = placed.text;
        }
        self.player.notify(&last);
        Ok(())
    }

    fn verdict(phase: Option<Phase>, seat: Seat) -> MatchOutcome {
        match phase {
            Some(Phase::GameOver { winner }) if winner == seat => MatchOutcome::Won,
            Some(Phase::GameOver { .. }) => MatchOutcome::Lost,
            _ => MatchOutcome::Abandoned,
        }
    }
}
