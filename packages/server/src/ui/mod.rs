//! WebSocket relay server and diagnostics HTTP API.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
