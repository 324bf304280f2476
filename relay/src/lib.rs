pub mod config;
pub mod errors;
pub mod headers;
pub mod metrics_defs;
pub mod service;

pub use config::Config;
pub use errors::RelayError;
pub use service::RelayService;

use shared::http::run_http_service;

/// Runs the relay in the foreground until the listener fails.
pub async fn run(config: Config) -> Result<(), RelayError> {
    let service = RelayService::from_config(&config);
    run_http_service(&config.listener.host, config.listener.port, service).await?;
    Ok(())
}
