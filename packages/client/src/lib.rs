//! Chalkboard command-line client.
//!
//! Connects to the relay, creates or joins a room, and turns typed lines into
//! relay events. Reconnects automatically and lands back in the same room.

pub mod command;
pub mod domain;
pub mod error;
pub mod formatter;
mod runner;
mod session;
mod ui;

pub use domain::RoomIntent;
pub use runner::run_client;
