use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use translate_bridge::build_app;
use translate_bridge::config_manager::Config;
use translate_bridge::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("translate_bridge=debug,tower_http=debug")),
        )
        .init();

    let config = Config::discover()?;
    let addr = config.system_config.socket_addr()?;

    info!(
        "Expecting languages: {}",
        config
            .translation_config
            .expected_languages
            .iter()
            .map(|l| l.code.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let app_state = AppState::new(config)?;
    let app = build_app(app_state);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
