//! # Mildar Storefront
//!
//! Runtime for the dairy storefront: configuration, shared state, the command
//! layer and a line shell that drives it.
//!
//! ## Module Organization
//! ```text
//! storefront/
//! ├── lib.rs          ◄─── You are here (startup & shell loop)
//! ├── config.rs       ◄─── TOML config + env overrides
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── cart.rs     ◄─── Shared cart + change notifications
//! │   ├── checkout.rs ◄─── Drawer flow + payment timer
//! │   └── snapshot.rs ◄─── Optional cart persistence
//! ├── commands/
//! │   ├── catalog.rs  ◄─── Product listing
//! │   ├── cart.rs     ◄─── Cart manipulation
//! │   └── checkout.rs ◄─── Drawer + Buy Now
//! ├── shell.rs        ◄─── stdin line parser
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod shell;
pub mod state;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use config::StorefrontConfig;
use error::{ApiError, StorefrontResult};
use shell::ShellCommand;
use state::AppState;

/// Runs the storefront until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Storefront Startup                                │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: INFO, can be overridden with RUST_LOG                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • storefront.toml in the config dir, then MILDAR_* overrides        │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • Catalog (built-in or catalog_path)                                │
/// │     • Cart (restored from snapshot when persistence is on)              │
/// │     • Checkout service                                                  │
/// │                                                                         │
/// │  4. Read Commands ────────────────────────────────────────────────────► │
/// │     • One per stdin line, JSON response per stdout line                 │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> StorefrontResult<()> {
    init_tracing();

    let config = StorefrontConfig::load_or_default(None);
    info!(store = %config.store.name, "Starting storefront");

    let state = AppState::from_config(&config)?;

    let autosave = state
        .snapshots
        .clone()
        .map(|file| file.spawn_autosave(&state.cart));

    println!("{} - type `help` for commands", config.store.name);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShellCommand>() {
            Ok(command) => command,
            Err(e) => {
                print_error(&e);
                continue;
            }
        };

        if command == ShellCommand::Quit {
            break;
        }

        debug!(?command, "Shell command");
        match shell::execute(&state, command) {
            Ok(value) => print_json(&value),
            Err(e) => print_error(&e),
        }
    }

    if state.checkout.view().pending.is_some() {
        warn!("Exiting with a payment still pending; the cart is not cleared");
    }
    if let Some(autosave) = autosave {
        if let Err(e) = autosave.shutdown().await {
            warn!("Cart autosave did not stop cleanly: {}", e);
        }
    }

    info!("Storefront stopped");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show trace for the storefront only
/// - Default: INFO, DEBUG for this workspace
///
/// Logs go to stderr so stdout carries only shell responses.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,mildar=debug,storefront=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{}", text),
        Err(e) => warn!("Failed to render response: {}", e),
    }
}

fn print_error(error: &ApiError) {
    match serde_json::to_string(&serde_json::json!({ "error": error })) {
        Ok(text) => println!("{}", text),
        Err(_) => println!("{}", error),
    }
}
