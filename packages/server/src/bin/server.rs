//! Chalkboard relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chalkboard-server
//! cargo run --bin chalkboard-server -- --host 0.0.0.0 --port 3000 --purge-state-on-empty
//! ```

use chalkboard_server::{bootstrap::build_app_state, config::RelayConfig, ui::Server};
use chalkboard_shared::logger::setup_logger;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "chalkboard-server")]
#[command(about = "Real-time room relay for the Chalkboard whiteboard", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "CHALKBOARD_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "CHALKBOARD_PORT", default_value = "8080")]
    port: u16,

    /// Default log level when RUST_LOG is not set
    #[arg(long, env = "CHALKBOARD_LOG_LEVEL", default_value = "debug")]
    log_level: String,

    /// Drop a room's cached game / pomodoro state when its last member leaves
    #[arg(long, env = "CHALKBOARD_PURGE_STATE_ON_EMPTY")]
    purge_state_on_empty: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logger(env!("CARGO_BIN_NAME"), &args.log_level);

    let config = RelayConfig {
        purge_state_on_empty: args.purge_state_on_empty,
    };
    tracing::info!("Relay configuration: {:?}", config);

    let server = Server::new(build_app_state(&config));
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
