use std::process::ExitCode;

use routekit_demo::{ServerConfig, demo_router};
use routekit_web::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(cause = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::builder()
        .router(demo_router(true))
        .bind(config.address())
        .max_body_size(config.max_body_size)
        .build()
    {
        Ok(server) => server,
        Err(e) => {
            error!(cause = %e, "can't build server");
            return ExitCode::FAILURE;
        }
    };

    info!(address = server.address(), "starting demo service");
    match server.start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}
