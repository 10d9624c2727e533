mod config;
mod error;
mod handlers;
mod models;
mod store;
mod users;
mod voting;

use handlers::AppState;
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let state = Arc::new(AppState::new());
    let app = handlers::setup(state);

    info!("Starting rank-poll on {}", *config::SRV_ADDRESS);
    if let Err(e) = handlers::run(app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
