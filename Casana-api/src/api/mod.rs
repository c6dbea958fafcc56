pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;

use crate::config::{AppConfig, ConfigError};

pub use state::AppState;

/// Create the application router from configuration
pub fn create_application(config: AppConfig) -> Result<Router, ConfigError> {
    let state = AppState::from_config(config)?;
    handlers::health::initialize_server_start_time();
    Ok(routes::create_app(state))
}
