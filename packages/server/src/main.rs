#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Services API server binary.

use service_map_server::{ServerConfig, run_server};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = dotenvy::dotenv();
    pretty_env_logger::init_custom_env("RUST_LOG");

    if let Err(e) = dotenv
        && !e.not_found()
    {
        log::warn!("Failed to load .env: {e}");
    }

    let config = ServerConfig::from_env();
    run_server(config).await?;

    Ok(())
}
