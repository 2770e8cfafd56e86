mod analysis;
mod config;
mod errors;
mod extraction;
mod matching;
mod models;
mod posting;
mod routes;
mod state;
mod suggestions;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::{spawn_session_sweeper, AnalysisPipeline, SessionStore};
use crate::config::Config;
use crate::extraction::FileTextExtractor;
use crate::matching::{KeywordMatcher, Matcher, SkillsTaxonomy};
use crate::posting::HttpPostingFetcher;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resumatch API v{}", env!("CARGO_PKG_VERSION"));

    // Skills taxonomy, shared by the matcher and the posting parser
    let taxonomy = Arc::new(SkillsTaxonomy::builtin().with_extra_skills(&config.extra_skills));
    info!("Skills taxonomy loaded ({} terms)", taxonomy.len());

    let fetcher = HttpPostingFetcher::new(
        config.fetch_timeout,
        &config.fetch_user_agent,
        Arc::clone(&taxonomy),
    )
    .context("failed to build HTTP client for job postings")?;
    info!("Posting fetcher initialized (timeout: {:?})", config.fetch_timeout);

    let matcher = KeywordMatcher::new(Arc::clone(&taxonomy));
    info!("Matcher initialized (backend: {})", matcher.backend());

    let pipeline = AnalysisPipeline::new(
        Arc::new(FileTextExtractor),
        Arc::new(fetcher),
        Arc::new(matcher),
        Arc::clone(&taxonomy),
    );

    let sessions = SessionStore::new();
    let sweep_period = (config.session_ttl / 4).max(Duration::from_secs(1));
    spawn_session_sweeper(sessions.clone(), config.session_ttl, sweep_period);
    info!("Session sweeper started (ttl: {:?}, every {:?})", config.session_ttl, sweep_period);

    // Build app state
    let state = AppState {
        config: config.clone(),
        pipeline,
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
