#![cfg(feature = "std")]

//! Typed client operations and the bounded waits built on top of them.

use std::time::Duration;

use anyhow::bail;

use crate::game::{Phase, Seat};
use crate::protocol::{GameApi, Message};
use crate::ship::Orientation;

/// How often and how long to poll for an event the client does not drive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    pub const fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    /// Waiting for someone to join a freshly created match.
    pub const fn opponent_join() -> Self {
        Self::new(Duration::from_secs(1), 600)
    }

    /// Waiting for the opponent to finish placing ships.
    pub const fn opponent_ships() -> Self {
        Self::new(Duration::from_secs(1), 300)
    }

    /// Waiting for the opponent to take their turn.
    pub const fn opponent_move() -> Self {
        Self::new(Duration::from_secs(1), 300)
    }
}

/// How a bounded wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The awaited phase was reached.
    Ready(Phase),
    /// The match finished or disappeared while waiting.
    Ended(Option<Phase>),
    /// Gave up after the configured number of polls.
    TimedOut,
}

/// A logged-in player's view of the server.
pub struct GameClient<A: GameApi> {
    api: A,
    username: String,
}

impl<A: GameApi> GameClient<A> {
    pub fn new(api: A, username: &str) -> Self {
        Self {
            api,
            username: username.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn into_inner(self) -> A {
        self.api
    }

    async fn request(&mut self, request: Message) -> anyhow::Result<Message> {
        let Some(expected) = request.kind.response() else {
            bail!("{:?} is not a request", request.kind);
        };
        let reply = self.api.call(request).await?;
        if reply.kind != expected {
            bail!("Unexpected server response {:?}: {}", reply.kind, reply.text);
        }
        Ok(reply)
    }

    pub async fn login(&mut self) -> anyhow::Result<Message> {
        let request = Message::login(&self.username);
        self.request(request).await
    }

    pub async fn logout(&mut self) -> anyhow::Result<Message> {
        let request = Message::logout(&self.username);
        self.request(request).await
    }

    pub async fn create_match(&mut self, name: &str) -> anyhow::Result<Message> {
        let request = Message::create_match(&self.username, name);
        self.request(request).await
    }

    pub async fn list_matches(&mut self) -> anyhow::Result<Message> {
        let request = Message::list_matches(&self.username);
        self.request(request).await
    }

    pub async fn join_match(&mut self, name: &str) -> anyhow::Result<Message> {
        let request = Message::join_match(&self.username, name);
        self.request(request).await
    }

    pub async fn place_ship(
        &mut self,
        name: &str,
        x: i32,
        y: i32,
        length: usize,
        orientation: Orientation,
    ) -> anyhow::Result<Message> {
        let request = Message::place_ship(&self.username, name, x, y, length, orientation);
        self.request(request).await
    }

    pub async fn ships_ready(&mut self, name: &str) -> anyhow::Result<Message> {
        let request = Message::ships_ready(&self.username, name);
        self.request(request).await
    }

    pub async fn make_move(&mut self, name: &str, x: i32, y: i32) -> anyhow::Result<Message> {
        let request = Message::make_move(&self.username, name, x, y);
        self.request(request).await
    }

    pub async fn game_status(&mut self, name: &str) -> anyhow::Result<Message> {
        let request = Message::game_status(&self.username, name);
        self.request(request).await
    }

    pub async fn stats(&mut self) -> anyhow::Result<Message> {
        let request = Message::get_stats(&self.username);
        self.request(request).await
    }

    /// Poll the match status until `ready` accepts the phase, the match ends
    /// or vanishes, or the policy runs out.
    pub async fn wait_until<F>(
        &mut self,
        name: &str,
        policy: PollPolicy,
        ready: F,
    ) -> anyhow::Result<WaitOutcome>
    where
        F: Fn(Phase) -> bool + Send,
    {
        for attempt in 0..policy.max_attempts {
            let status = self.game_status(name).await?;
            match status.phase {
                Some(phase @ Phase::GameOver { .. }) => return Ok(WaitOutcome::Ended(Some(phase))),
                Some(phase) if ready(phase) => return Ok(WaitOutcome::Ready(phase)),
                None => return Ok(WaitOutcome::Ended(None)),
                Some(_) => {}
            }
            log::trace!("{} polling {} ({}/{})", self.username, name, attempt + 1, policy.max_attempts);
            tokio::time::sleep(policy.interval).await;
        }
        log::info!("{} waited too long on match {}", self.username, name);
        Ok(WaitOutcome::TimedOut)
    }

    /// Wait until a second player has joined a match we created.
    pub async fn wait_for_opponent(&mut self, name: &str, policy: PollPolicy) -> anyhow::Result<WaitOutcome> {
        self.wait_until(name, policy, |phase| phase != Phase::WaitingForPlayer)
            .await
    }

    /// Wait until both fleets are ready and the battle has begun.
    pub async fn wait_for_fleets(&mut self, name: &str, policy: PollPolicy) -> anyhow::Result<WaitOutcome> {
        self.wait_until(name, policy, |phase| matches!(phase, Phase::Turn(_)))
            .await
    }

    /// Wait until it is `seat`'s turn.
    pub async fn wait_for_turn(
        &mut self,
        name: &str,
        seat: Seat,
        policy: PollPolicy,
    ) -> anyhow::Result<WaitOutcome> {
        self.wait_until(name, policy, move |phase| phase == Phase::Turn(seat))
            .await
    }
}
