//! Routes requests to the match registry, the player directory and the turn
//! engine, and turns every outcome into a response.

use crate::common::{BoardError, ShotOutcome};
use crate::config::MAX_NAME_LEN;
use crate::directory::{DirectoryError, Login, PlayerDirectory};
use crate::game::{Match, Phase, Readiness, Seat, TurnError};
use crate::protocol::{BoardSnapshot, Message, MessageKind, UNKNOWN_COMMAND};
use crate::registry::{MatchRegistry, RegistryError};
use alloc::format;
use alloc::string::String;
use core::fmt::Write;

const GAME_NOT_FOUND: &str = "Game not found!";
const BAD_USERNAME: &str = "Invalid username! Use 1 to 63 characters.";
const BAD_GAME_NAME: &str = "Invalid game name! Use 1 to 63 characters.";
const NOT_PARTICIPANT: &str = "You are not a participant in this game!";

/// Owner of all authoritative server state.
#[derive(Debug, Default)]
pub struct Dispatcher {
    registry: MatchRegistry,
    players: PlayerDirectory,
}

/// Names past the limit are never stored, so they are not echoed either.
fn too_long(name: &str) -> bool {
    name.chars().count() > MAX_NAME_LEN
}

impl Dispatcher {
    pub fn new(max_matches: usize, max_players: usize) -> Self {
        Self::with_players(PlayerDirectory::new(max_players), max_matches)
    }

    pub fn with_players(players: PlayerDirectory, max_matches: usize) -> Self {
        Self {
            registry: MatchRegistry::new(max_matches),
            players,
        }
    }

    pub fn registry(&self) -> &MatchRegistry {
        &self.registry
    }

    pub fn players(&self) -> &PlayerDirectory {
        &self.players
    }

    /// Handle one request to completion.
    pub fn dispatch(&mut self, request: Message) -> Message {
        let long_user = too_long(&request.username);
        if long_user || too_long(&request.match_name) {
            log::warn!(
                "rejecting {:?} with a {} byte username and a {} byte match name",
                request.kind,
                request.username.len(),
                request.match_name.len()
            );
            let kind = request.kind.response().unwrap_or(MessageKind::Error);
            let mut reply = request.into_reply(kind);
            reply.username.clear();
            reply.match_name.clear();
            reply.set_text(if long_user { BAD_USERNAME } else { BAD_GAME_NAME });
            return reply;
        }
        log::debug!(
            "request {:?} from {:?} (match {:?})",
            request.kind,
            request.username,
            request.match_name
        );
        let Some(kind) = request.kind.response() else {
            log::warn!("unknown request kind {}", request.kind.code());
            return request
                .into_reply(MessageKind::Error)
                .with_text(UNKNOWN_COMMAND);
        };
        let mut reply = request.into_reply(kind);
        match reply.kind {
            MessageKind::LoginResponse => self.login(&mut reply),
            MessageKind::CreateMatchResponse => self.create_match(&mut reply),
            MessageKind::MatchesList => self.list_matches(&mut reply),
            MessageKind::JoinMatchResponse => self.join_match(&mut reply),
            MessageKind::PlaceShipResponse => self.place_ship(&mut reply),
            MessageKind::ShipsReadyResponse => self.ships_ready(&mut reply),
            MessageKind::MoveResult => self.make_move(&mut reply),
            MessageKind::GameStatus => self.game_status(&mut reply),
            MessageKind::StatsData => self.stats(&mut reply),
            MessageKind::LogoutResponse => self.logout(&mut reply),
            _ => reply.set_text(UNKNOWN_COMMAND),
        }
        reply
    }

    fn login(&mut self, reply: &mut Message) {
        match self.players.login(&reply.username) {
            Ok(Login::Registered) => {
                log::info!("registered player {}", reply.username);
                reply.ok = true;
                reply.new_user = true;
                reply.set_text("Registration successful!");
            }
            Ok(Login::Returning { wins, losses }) => {
                reply.ok = true;
                reply.set_text(format!(
                    "Welcome back, {}! Your stats: {} wins, {} losses",
                    reply.username, wins, losses
                ));
            }
            Err(DirectoryError::AlreadyOnline) => reply.set_text("Already online"),
            Err(DirectoryError::Full) => reply.set_text("Player limit reached!"),
            Err(_) => reply.set_text(BAD_USERNAME),
        }
    }

    fn logout(&mut self, reply: &mut Message) {
        let name = reply.username.clone();
        self.registry.abandon_waiting(&name);
        match self.players.logout(&name) {
            Ok(()) => {
                reply.ok = true;
                reply.set_text(format!("Goodbye, {}!", name));
            }
            Err(_) => reply.set_text("Player not found!"),
        }
    }

    fn create_match(&mut self, reply: &mut Message) {
        let result = self
            .registry
            .create(&reply.match_name, &reply.username, &mut self.players);
        match result {
            Ok(_) => {
                reply.ok = true;
                reply.phase = Some(Phase::WaitingForPlayer);
                reply.set_text(format!(
                    "Game '{}' created successfully! Waiting for opponent...",
                    reply.match_name
                ));
            }
            Err(RegistryError::CapacityExceeded) => {
                reply.set_text("Maximum number of games reached!")
            }
            Err(RegistryError::AlreadyExists) => {
                reply.set_text("Game with this name already exists!")
            }
            Err(_) => reply.set_text(BAD_GAME_NAME),
        }
    }

    fn list_matches(&mut self, reply: &mut Message) {
        let mut text = String::from("Available games:\n");
        let mut any = false;
        for game in self.registry.joinable(&reply.username) {
            any = true;
            let _ = writeln!(text, "- {} (created by {})", game.name(), game.creator());
        }
        if !any {
            text.push_str("No games available. Create your own game!\n");
        }
        reply.ok = true;
        reply.set_text(text);
    }

    fn join_match(&mut self, reply: &mut Message) {
        match self
            .registry
            .join(&reply.match_name, &reply.username, &mut self.players)
        {
            Ok(joined) => {
                reply.ok = true;
                reply.phase = Some(joined.phase);
                reply.opponent = joined.opponent;
                reply.set_text(format!(
                    "Successfully joined game '{}'! Place your ships.",
                    reply.match_name
                ));
            }
            Err(_) => reply.set_text(
                "Could not join game. It may not exist, already started, or you created it.",
            ),
        }
    }

    fn place_ship(&mut self, reply: &mut Message) {
        let Some(game) = self.registry.by_name_mut(&reply.match_name) else {
            return reply.set_text(GAME_NOT_FOUND);
        };
        let length = usize::try_from(reply.ship_length).unwrap_or(0);
        let result = game.place_ship(&reply.username, reply.x, reply.y, length, reply.orientation());
        reply.phase = Some(game.phase());
        match result {
            Ok(placement) => {
                reply.ok = true;
                reply.ship_length = placement.placed as i32;
                let mut text = format!("Ship of length {} placed successfully!", length);
                if placement.fleet_complete {
                    text.push_str(" All ships are now placed!");
                }
                reply.set_text(text);
            }
            Err(TurnError::NotParticipant) => reply.set_text(NOT_PARTICIPANT),
            Err(TurnError::NotPlacementPhase) => {
                reply.set_text("Game is not in the ship placement phase!")
            }
            Err(TurnError::Board(BoardError::QuotaExhausted(_))) => {
                reply.set_text("You have placed all ships of this type!")
            }
            Err(TurnError::Board(BoardError::InvalidLength(_))) => {
                reply.set_text("Invalid ship length!")
            }
            Err(_) => reply.set_text("Cannot place ship at this position!"),
        }
    }

    fn ships_ready(&mut self, reply: &mut Message) {
        let Some(game) = self.registry.by_name_mut(&reply.match_name) else {
            return reply.set_text(GAME_NOT_FOUND);
        };
        let result = game.declare_ready(&reply.username);
        reply.phase = Some(game.phase());
        match result {
            Ok(readiness) => {
                reply.ok = true;
                if let Some(seat) = game.seat_of(&reply.username) {
                    reply.opponent = game.opponent_of(seat).into();
                }
                match readiness {
                    Readiness::Started => {
                        let your_turn = game.phase() == Phase::Turn(Seat::First)
                            && game.creator() == reply.username;
                        let tail = if your_turn {
                            " It's your turn!"
                        } else {
                            " Waiting for opponent's move."
                        };
                        reply.set_text(format!("Both players are ready! Game starts now.{}", tail));
                    }
                    Readiness::AwaitingOpponent => {
                        reply.set_text("Your ships are ready! Waiting for your opponent...")
                    }
                }
            }
            Err(TurnError::NotParticipant) => reply.set_text(NOT_PARTICIPANT),
            Err(TurnError::FleetIncomplete) => {
                reply.set_text("You haven't placed all your ships yet!")
            }
            Err(_) => reply.set_text("Game is not in the ship placement phase!"),
        }
    }

    fn make_move(&mut self, reply: &mut Message) {
        let Some(game) = self.registry.by_name_mut(&reply.match_name) else {
            return reply.set_text(GAME_NOT_FOUND);
        };
        let result = game.fire(&reply.username, reply.x, reply.y, &mut self.players);
        reply.phase = Some(game.phase());
        match result {
            Ok(volley) => {
                reply.ok = true;
                reply.shot = Some(volley.outcome);
                reply.set_text(match volley.outcome {
                    ShotOutcome::Miss => "Miss!",
                    ShotOutcome::Hit => "Hit!",
                    ShotOutcome::ShipDestroyed => "Ship destroyed!",
                    ShotOutcome::Victory => "Victory! All enemy ships destroyed!",
                });
                if let Some(seat) = game.seat_of(&reply.username) {
                    reply.opponent = game.opponent_of(seat).into();
                    reply.snapshot = Some(snapshot(game, seat));
                }
            }
            Err(TurnError::NotParticipant) => reply.set_text(NOT_PARTICIPANT),
            Err(TurnError::NotYourTurn) => reply.set_text("It's not your turn!"),
            Err(TurnError::Board(BoardError::OutOfBounds)) => {
                reply.set_text("Invalid coordinates!")
            }
            Err(TurnError::Board(BoardError::AlreadyTargeted)) => {
                reply.set_text("You already fired at this position!")
            }
            Err(_) => reply.set_text("The game is not in progress!"),
        }
    }

    fn game_status(&mut self, reply: &mut Message) {
        let Some(game) = self.registry.by_name(&reply.match_name) else {
            return reply.set_text(GAME_NOT_FOUND);
        };
        reply.phase = Some(game.phase());
        let Some(seat) = game.seat_of(&reply.username) else {
            return reply.set_text(NOT_PARTICIPANT);
        };
        reply.ok = true;
        reply.opponent = game.opponent_of(seat).into();
        reply.snapshot = Some(snapshot(game, seat));
        let text = match game.phase() {
            Phase::WaitingForPlayer => String::from("Waiting for an opponent to join"),
            Phase::PlacingShips => String::from("Players are placing their ships"),
            Phase::Turn(current) if current == seat => {
                format!("It's your turn in game {}", game.name())
            }
            Phase::Turn(_) => String::from("Waiting for opponent's move"),
            Phase::GameOver { winner } => format!(
                "Game over! Winner: {}",
                game.player(winner).unwrap_or_default()
            ),
        };
        reply.set_text(text);
    }

    fn stats(&mut self, reply: &mut Message) {
        match self.players.get(&reply.username) {
            Some(record) => {
                reply.ok = true;
                reply.set_text(format!(
                    "Statistics for {}:\nWins: {}\nLosses: {}\nWin rate: {:.1}%",
                    record.name,
                    record.wins,
                    record.losses,
                    record.win_rate()
                ));
            }
            None => reply.set_text("Player not found!"),
        }
    }
}

fn snapshot(game: &Match, seat: Seat) -> BoardSnapshot {
    BoardSnapshot {
        own: game.board(seat).snapshot(false),
        target: game.board(seat.opponent()).snapshot(true),
    }
}

#[cfg(feature = "std")]
#[async_trait::async_trait]
impl crate::protocol::GameApi for Dispatcher {
    async fn call(&mut self, request: Message) -> anyhow::Result<Message> {
        Ok(self.dispatch(request))
    }
}
