use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;

use ragchat::core::logging;
use ragchat::server::router;
use ragchat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let state = AppState::initialize()?;
    logging::init(&state.paths);

    let bind_addr = format!(
        "{}:{}",
        state.config.server.host, state.config.server.port
    );
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!(
        "Listening on {} ({} documents indexed)",
        addr,
        state.chat.index().len()
    );

    let app: Router = router::router(state);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
