// Draft calculator server entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config (seeding config/ from defaults/ on first run)
// 3. Load players from the configured CSV, or the built-in list
// 4. Build the engine
// 5. Bind the WebSocket listener and serve until Ctrl+C

use anyhow::Context;
use draftcalc_core::engine::DraftEngine;
use draftcalc_core::sources;
use draftcalc_server::{config, handler, ws_server};
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Draft calculator starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: {} teams, draft position {}, snake={}, {}",
        config.league.number_of_teams(),
        config.league.draft_position(),
        config.league.snake_draft(),
        config.league.league_type()
    );

    // 3. Load players
    let players = match &config.players_csv {
        Some(path) => sources::load_players_csv(path)
            .with_context(|| format!("failed to load players from {}", path.display()))?,
        None => {
            info!("No players file configured; using built-in sample players");
            sources::default_players()
        }
    };

    // 4. Build the engine
    let engine = DraftEngine::with_players(players, config.league.clone())
        .context("player list failed validation")?;
    let engine = handler::shared(engine);

    // 5. Serve
    let listener = ws_server::bind(config.ws_port)
        .await
        .with_context(|| format!("failed to bind WebSocket server on port {}", config.ws_port))?;

    tokio::select! {
        result = ws_server::run(listener, engine) => {
            if let Err(e) = &result {
                error!("WebSocket server error: {e}");
            }
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Ctrl+C received, shutting down");
        }
    }

    info!("Draft calculator shut down cleanly");
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("draftcalc_server=info,draftcalc_core=info,warn")
        }))
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
