use ragchat::core::logging;
use ragchat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let state = AppState::initialize()?;
    logging::init(&state.paths);

    ragchat::repl::run(state).await
}
