//! # Mildar Storefront Entry Point
//!
//! ```text
//! stdin ──► shell parser ──► commands ──► CartStore / CheckoutService
//!                                                 │
//! stdout ◄── JSON response ◄──────────────────────┘
//! ```
//!
//! The actual setup is in lib.rs for better testability.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match storefront::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("storefront: {}", e);
            ExitCode::FAILURE
        }
    }
}
