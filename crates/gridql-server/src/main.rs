//! GridQL server binary.
//!
//! Loads configuration, declares the grid's regions on the in-memory
//! backend, synthesizes the GraphQL schema, and serves the API.

mod config;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use gridql_db_memory::MemoryGrid;
use gridql_graphql::QueryExecutor;
use gridql_store::DynStore;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() {
    init_tracing();

    let (config_path, source) = config::resolve_config_path();
    let cfg = match config::load_config(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!(
        path = %config_path.display(),
        source = %source,
        "Configuration loaded"
    );

    if let Err(e) = cfg.validate() {
        eprintln!("Configuration error: {e}");
        std::process::exit(2);
    }

    let mut grid = MemoryGrid::new();
    for region in &cfg.regions {
        grid = grid.with_region(region.descriptor(), region.indexed.clone());
    }
    tracing::info!(regions = cfg.regions.len(), "Grid regions declared");

    let store: DynStore = Arc::new(grid);
    let executor = match QueryExecutor::new(store, cfg.graphql.to_schema_builder_config()).await {
        Ok(executor) => Arc::new(executor),
        Err(e) => {
            eprintln!("Schema build failed: {e}");
            std::process::exit(2);
        }
    };

    let mut app = Router::new().route("/health", get(|| async { "ok" }));
    if cfg.graphql.enabled {
        app = app.merge(gridql_graphql::routes(executor));
    } else {
        tracing::warn!("GraphQL endpoints disabled by configuration");
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = format!("{}:{}", cfg.server.host, cfg.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(2);
        }
    };
    tracing::info!(addr = %addr, "GridQL server listening");

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {e}");
    }
}

fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer())
        .init();
}
