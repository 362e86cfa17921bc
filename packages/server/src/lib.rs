//! Chalkboard relay server.
//!
//! Routes real-time whiteboard events between WebSocket clients grouped in
//! rooms, and keeps the last published game / pomodoro state of each room so
//! late joiners can restore it.

pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
