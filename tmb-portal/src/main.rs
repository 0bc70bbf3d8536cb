//! tmb-portal - TeamBoard branch team performance portal
//!
//! Records per-employee achievement entries against configurable
//! products, compares them to per-employee per-product targets, and
//! serves dashboard data and monthly CSV exports.

use anyhow::Result;
use clap::Parser;
use tmb_common::api::auth::load_shared_secret;
use tmb_common::config::{prepare_root_folder, resolve_root_folder};
use tmb_portal::{build_router, AppState};
use tracing::info;

/// Default portal port
const DEFAULT_PORT: u16 = 5730;

#[derive(Debug, Parser)]
#[command(name = "tmb-portal", about = "TeamBoard portal service")]
struct Args {
    /// Data root folder (overrides TEAMBOARD_ROOT and the config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port
    #[arg(long, env = "TEAMBOARD_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting TeamBoard portal (tmb-portal) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref());
    let db_path = prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = tmb_common::db::init_database(&db_path).await?;
    info!("✓ Database ready");

    let shared_secret = load_shared_secret(&pool).await?;
    if shared_secret == 0 {
        info!("Operator authentication disabled (shared_secret = 0)");
    } else {
        info!("✓ Loaded shared secret for operator authentication");
    }

    let state = AppState::new(pool, shared_secret);
    let app = build_router(state).layer(tower_http::trace::TraceLayer::new_for_http());

    let port = args.port.unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("tmb-portal listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
