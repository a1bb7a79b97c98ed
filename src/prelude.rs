//! Commonly used types and utilities for ease of import.

pub use crate::{
    AiPlayer, Board, Dispatcher, Message, MessageKind, Orientation, Phase, Player, Seat,
    ShotOutcome,
};

#[cfg(feature = "std")]
pub use crate::{CliPlayer, GameClient, MatchOutcome, PlayerNode, PollPolicy, Server, Stub};

#[cfg(feature = "std")]
pub use crate::transport::{in_memory::InMemoryTransport, Transport};

#[cfg(all(feature = "std", unix))]
pub use crate::transport::shm::ShmTransport;
