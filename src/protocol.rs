//! Request/response envelope shared by every transport.

use crate::common::{CellState, ShotOutcome};
use crate::game::Phase;
use crate::ship::Orientation;
use alloc::string::{String, ToString};
use alloc::vec::Vec;

/// Longest free-form text carried in a message, in bytes.
pub const MAX_TEXT_LEN: usize = 4096;

/// Text sent back for any request kind the server does not handle.
pub const UNKNOWN_COMMAND: &str = "Unknown command";

/// Kind tag of a message, with the numeric codes used on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "std",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "u16", into = "u16")
)]
pub enum MessageKind {
    Login,
    LoginResponse,
    CreateMatch,
    CreateMatchResponse,
    ListMatches,
    MatchesList,
    JoinMatch,
    JoinMatchResponse,
    PlaceShip,
    PlaceShipResponse,
    ShipsReady,
    ShipsReadyResponse,
    MakeMove,
    MoveResult,
    /// Used for both the status query and its answer.
    GameStatus,
    GetStats,
    StatsData,
    Logout,
    LogoutResponse,
    #[default]
    Error,
    /// Any code this build does not know.
    Other(u16),
}

impl MessageKind {
    pub fn code(self) -> u16 {
        match self {
            MessageKind::Login => 3,
            MessageKind::LoginResponse => 4,
            MessageKind::CreateMatch => 5,
            MessageKind::CreateMatchResponse => 6,
            MessageKind::ListMatches => 7,
            MessageKind::MatchesList => 8,
            MessageKind::JoinMatch => 9,
            MessageKind::JoinMatchResponse => 10,
            MessageKind::PlaceShip => 11,
            MessageKind::PlaceShipResponse => 12,
            MessageKind::ShipsReady => 13,
            MessageKind::ShipsReadyResponse => 14,
            MessageKind::MakeMove => 15,
            MessageKind::MoveResult => 16,
            MessageKind::GameStatus => 17,
            MessageKind::GetStats => 18,
            MessageKind::StatsData => 19,
            MessageKind::Logout => 20,
            MessageKind::LogoutResponse => 21,
            MessageKind::Error => 99,
            MessageKind::Other(code) => code,
        }
    }

    /// Response kind the server answers this request kind with, if it is a
    /// request at all.
    pub fn response(self) -> Option<MessageKind> {
        Some(match self {
            MessageKind::Login => MessageKind::LoginResponse,
            MessageKind::CreateMatch => MessageKind::CreateMatchResponse,
            MessageKind::ListMatches => MessageKind::MatchesList,
            MessageKind::JoinMatch => MessageKind::JoinMatchResponse,
            MessageKind::PlaceShip => MessageKind::PlaceShipResponse,
            MessageKind::ShipsReady => MessageKind::ShipsReadyResponse,
            MessageKind::MakeMove => MessageKind::MoveResult,
            MessageKind::GameStatus => MessageKind::GameStatus,
            MessageKind::GetStats => MessageKind::StatsData,
            MessageKind::Logout => MessageKind::LogoutResponse,
            _ => return None,
        })
    }
}

impl From<u16> for MessageKind {
    fn from(code: u16) -> Self {
        match code {
            3 => MessageKind::Login,
            4 => MessageKind::LoginResponse,
            5 => MessageKind::CreateMatch,
            6 => MessageKind::CreateMatchResponse,
            7 => MessageKind::ListMatches,
            8 => MessageKind::MatchesList,
            9 => MessageKind::JoinMatch,
            10 => MessageKind::JoinMatchResponse,
            11 => MessageKind::PlaceShip,
            12 => MessageKind::PlaceShipResponse,
            13 => MessageKind::ShipsReady,
            14 => MessageKind::ShipsReadyResponse,
            15 => MessageKind::MakeMove,
            16 => MessageKind::MoveResult,
            17 => MessageKind::GameStatus,
            18 => MessageKind::GetStats,
            19 => MessageKind::StatsData,
            20 => MessageKind::Logout,
            21 => MessageKind::LogoutResponse,
            99 => MessageKind::Error,
            other => MessageKind::Other(other),
        }
    }
}

impl From<MessageKind> for u16 {
    fn from(kind: MessageKind) -> Self {
        kind.code()
    }
}

/// Both boards of a match as seen by one participant.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct BoardSnapshot {
    /// The requester's own board, ships visible.
    pub own: Vec<CellState>,
    /// The opponent's board with untouched ships hidden.
    pub target: Vec<CellState>,
}

/// The single envelope every request and response travels in.
///
/// A response starts out as a copy of its request; handlers overwrite the
/// fields they answer with.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "std", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub kind: MessageKind,
    pub username: String,
    pub match_name: String,
    pub text: String,
    /// Whether the request was accepted.
    pub ok: bool,
    pub new_user: bool,
    pub x: i32,
    pub y: i32,
    /// Ship length on requests; number of ships placed on responses.
    pub ship_length: i32,
    pub horizontal: bool,
    pub shot: Option<ShotOutcome>,
    pub phase: Option<Phase>,
    pub opponent: String,
    pub snapshot: Option<BoardSnapshot>,
}

impl Message {
    pub fn new(kind: MessageKind, username: &str) -> Self {
        Self {
            kind,
            username: username.to_string(),
            ..Self::default()
        }
    }

    fn for_match(kind: MessageKind, username: &str, match_name: &str) -> Self {
        Self {
            match_name: match_name.to_string(),
            ..Self::new(kind, username)
        }
    }

    pub fn login(username: &str) -> Self {
        Self::new(MessageKind::Login, username)
    }

    pub fn create_match(username: &str, match_name: &str) -> Self {
        Self::for_match(MessageKind::CreateMatch, username, match_name)
    }

    pub fn list_matches(username: &str) -> Self {
        Self::new(MessageKind::ListMatches, username)
    }

    pub fn join_match(username: &str, match_name: &str) -> Self {
        Self::for_match(MessageKind::JoinMatch, username, match_name)
    }

    pub fn place_ship(
        username: &str,
        match_name: &str,
        x: i32,
        y: i32,
        length: usize,
        orientation: Orientation,
    ) -> Self {
        Self {
            x,
            y,
            ship_length: length as i32,
            horizontal: orientation.is_horizontal(),
            ..Self::for_match(MessageKind::PlaceShip, username, match_name)
        }
    }

    pub fn ships_ready(username: &str, match_name: &str) -> Self {
        Self::for_match(MessageKind::ShipsReady, username, match_name)
    }

    pub fn make_move(username: &str, match_name: &str, x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            ..Self::for_match(MessageKind::MakeMove, username, match_name)
        }
    }

    pub fn game_status(username: &str, match_name: &str) -> Self {
        Self::for_match(MessageKind::GameStatus, username, match_name)
    }

    pub fn get_stats(username: &str) -> Self {
        Self::new(MessageKind::GetStats, username)
    }

    pub fn logout(username: &str) -> Self {
        Self::new(MessageKind::Logout, username)
    }

    /// Turn a request into the skeleton of its response: routing fields are
    /// kept, result fields are reset.
    pub fn into_reply(self, kind: MessageKind) -> Self {
        Self {
            kind,
            text: String::new(),
            ok: false,
            new_user: false,
            shot: None,
            phase: None,
            opponent: String::new(),
            snapshot: None,
            ..self
        }
    }

    /// Set the text payload, cut to [`MAX_TEXT_LEN`] on a char boundary.
    pub fn set_text(&mut self, text: impl Into<String>) {
        let mut text = text.into();
        if text.len() > MAX_TEXT_LEN {
            let mut cut = MAX_TEXT_LEN;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
        }
        self.text = text;
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn orientation(&self) -> Orientation {
        Orientation::from_horizontal(self.horizontal)
    }
}

#[cfg(feature = "std")]
impl Message {
    /// Encode with bincode.
    pub fn encode(&self) -> anyhow::Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

/// Anything that answers requests: a remote server behind a transport, or
/// the dispatcher itself in-process.
#[cfg(feature = "std")]
#[async_trait::async_trait]
pub trait GameApi: Send {
    /// Issue one request and wait for its response.
    async fn call(&mut self, request: Message) -> anyhow::Result<Message>;
}
