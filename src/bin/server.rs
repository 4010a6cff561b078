//! Persona engine HTTP server binary.
//!
//! Serves one persona session over HTTP and runs its affect decay driver.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8080)
//! - `PERSONA_GENOME` — Genome YAML/JSON path (default: built-in `pioneer_v2`)
//! - `PERSONA_CONFIG` — Engine config YAML path (default: built-in tunables)
//! - `PERSONA_SEED` — Fixed RNG seed for reproducible projections
//! - `RUST_LOG` — Tracing filter (default: "info,persona_engine=debug")
//!
//! # Usage
//!
//! ```bash
//! PERSONA_SEED=42 cargo run --bin server
//! ```

use anyhow::Context;
use persona_engine::server::{app_router, AppState};
use persona_engine::{EngineConfig, GenomeDef, PersonaSession, SharedSession};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,persona_engine=debug".into()),
        )
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let bind_addr = format!("0.0.0.0:{}", port);

    let def = match std::env::var("PERSONA_GENOME") {
        Ok(path) => GenomeDef::from_file(&path).with_context(|| format!("loading genome {}", path))?,
        Err(_) => GenomeDef::builtin()?,
    };
    let config = match std::env::var("PERSONA_CONFIG") {
        Ok(path) => EngineConfig::from_yaml_file(&path).with_context(|| format!("loading config {}", path))?,
        Err(_) => EngineConfig::default(),
    };
    let session = match std::env::var("PERSONA_SEED") {
        Ok(seed) => {
            let seed: u64 = seed.parse().context("PERSONA_SEED must be an unsigned integer")?;
            PersonaSession::with_seed(def, config, seed)?
        }
        Err(_) => PersonaSession::new(def, config)?,
    };

    let shared = SharedSession::new(session);
    let _decay = shared.spawn_decay_driver();
    let app = app_router(AppState::new(shared.clone()));

    tracing::info!("persona-engine server starting on {}", bind_addr);
    tracing::info!("persona: {}", shared.lock().persona_id());
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health, /status, /loci, /history, /history/:index, /inspect");
    tracing::info!("  POST /stance, /stance/preset/:name, /drift, /project, /tick, /reset");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding {}", bind_addr))?;

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
