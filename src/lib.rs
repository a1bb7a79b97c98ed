#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod ai;
mod bitboard;
mod board;
#[cfg(feature = "std")]
pub mod client;
mod common;
mod config;
mod directory;
pub mod dispatcher;
mod game;
#[cfg(feature = "std")]
mod logging;
pub mod player;
#[cfg(feature = "std")]
pub mod player_node;
pub mod prelude;
pub mod protocol;
mod registry;
mod ship;
#[cfg(feature = "std")]
pub mod server;
#[cfg(feature = "std")]
pub mod skeleton;
#[cfg(feature = "std")]
pub mod stats_store;
#[cfg(feature = "std")]
pub mod stub;
#[cfg(feature = "std")]
pub mod transport;
pub mod ui;

pub use ai::{calc_pdf, choose_target, TargetView};
pub use bitboard::{BitBoard, BitBoardError};
pub use board::*;
pub use common::*;
pub use config::*;
pub use directory::*;
pub use dispatcher::Dispatcher;
pub use game::*;
pub use player::*;
pub use protocol::*;
pub use registry::*;
pub use ship::*;
#[cfg(feature = "std")]
pub use client::{GameClient, PollPolicy, WaitOutcome};
#[cfg(feature = "std")]
pub use logging::{env_level as logging_env_level, init_logging, init_logging_with};
#[cfg(feature = "std")]
pub use player_node::*;
#[cfg(feature = "std")]
pub use server::{Server, ServerConfig};
#[cfg(feature = "std")]
pub use skeleton::*;
#[cfg(feature = "std")]
pub use stub::*;
