use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;

use collab_align::config::AppConfig;
use collab_align::llm::{LlmConfig, create_provider};
use collab_align::session::{
    AlignmentRequester, ManagerOptions, SessionManager, SessionRouteState, session_routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = AppConfig::from_env();
    config.validate()?;

    eprintln!("🤝 CollabAlign v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.model);
    eprintln!("   API: http://0.0.0.0:{}/api/sessions", config.port);

    let llm = create_provider(&LlmConfig::from(&config))?;
    let requester = AlignmentRequester::new(llm, config.temperature);
    let manager = Arc::new(SessionManager::new(
        requester,
        ManagerOptions {
            share_base_url: config.share_base_url.clone(),
            credentials_configured: config.credentials_configured(),
        },
    ));

    let app = session_routes(SessionRouteState { manager }).layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    tracing::info!(port = config.port, "Session API started");

    axum::serve(listener, app).await?;
    Ok(())
}
