//! delivery-locator CLI entry point
//!
//! Location resolution and delivery eligibility - CLI + web app

use delivery_locator::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
