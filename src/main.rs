// Draft board entry point.
//
// Startup sequence:
// 1. Initialize tracing
// 2. Load config (config/engine.toml if present, built-in defaults otherwise)
// 3. Load the player pool (CLI arg overrides config pool_path)
// 4. Build the engine and log the opening scarcity picture
//
// Rendering lives elsewhere; this binary is a smoke boot that proves the
// engine comes up against real data.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::info;

use draft_board::config::EngineConfig;
use draft_board::engine::DraftEngine;
use draft_board::pool::PlayerPool;

fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("draft board starting up");

    let config = EngineConfig::load_or_default(Path::new("config/engine.toml"))
        .context("failed to load configuration")?;

    let pool_path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.pool_path.clone())
        .context("no pool file given (pass a path or set pool_path in config/engine.toml)")?;

    let pool = PlayerPool::load(&pool_path)
        .with_context(|| format!("failed to load player pool from {}", pool_path.display()))?;
    info!("loaded {} players from {}", pool.len(), pool_path.display());

    let mut engine = DraftEngine::new(config, pool);

    // Copy the flags out so the report borrow doesn't pin the engine.
    let flags: Vec<_> = engine
        .scarcity()
        .flags()
        .iter()
        .map(|(id, flag)| (*id, *flag))
        .collect();
    if flags.is_empty() {
        info!("no positional cliffs at pick 1");
    } else {
        for (id, flag) in flags {
            let name = engine
                .pool()
                .player(id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            info!(
                "cliff at {}: {} (drop {:.1} VOR inside the window)",
                flag.position, name, flag.drop
            );
        }
    }

    Ok(())
}

/// Initialize tracing to stderr, honoring RUST_LOG.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("draft_board=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
