//! Chalkboard command-line client with reconnection support.
//!
//! Creates or joins a room, then sends typed lines as chat messages and
//! `/commands` as board, game, timer and ghost events.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second
//! interval) and returns to the same room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chalkboard-client -- --create Retro --code ABC123
//! cargo run --bin chalkboard-client -- --join ABC123
//! ```

use clap::Parser;

use chalkboard_client::{RoomIntent, run_client};
use chalkboard_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "chalkboard-client")]
#[command(about = "Command-line client for the Chalkboard room relay", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:8080/ws")]
    url: String,

    /// Create a room with this display name
    #[arg(short = 'c', long, conflicts_with = "join", required_unless_present = "join")]
    create: Option<String>,

    /// Custom code for the created room (generated when omitted)
    #[arg(long, requires = "create")]
    code: Option<String>,

    /// Join an existing room by code
    #[arg(short = 'j', long)]
    join: Option<String>,

    /// Default log level when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn intent(&self) -> RoomIntent {
        match &self.join {
            Some(code) => RoomIntent::Join(code.clone()),
            None => RoomIntent::Create {
                name: self.create.clone(),
                code: self.code.clone(),
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    if let Err(e) = run_client(args.url.clone(), args.intent()).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
