//! Joke API server: loads settings, opens the store, mounts the router and serves.

use joke_api::{
    app, ensure_database_exists, AppContext, ExampleStore, MemoryExampleStore, PgExampleStore, ServerConfig,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("joke_api=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let store: Arc<dyn ExampleStore> = match config.database_url.as_deref() {
        Some(database_url) => {
            ensure_database_exists(database_url).await?;
            let store = PgExampleStore::connect(database_url, config.max_connections).await?;
            store.ensure_schema().await?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; records are kept in memory and lost on exit");
            Arc::new(MemoryExampleStore::new())
        }
    };

    let addr = config.listen_addr();
    let router = app::router(AppContext::new(store, config))?;

    let listener = TcpListener::bind(addr).await?;
    let port = listener.local_addr()?.port();
    tracing::info!("server has started on port {}. Open http://localhost:{}/examples to see results", port, port);
    axum::serve(listener, router).await?;
    Ok(())
}
