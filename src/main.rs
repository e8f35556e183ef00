use emoweb::{journal::JournalStore, router, storage::FileStorage, AppState, Config};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    let storage = FileStorage::open(&config.data_dir).await?;
    info!(dir = %storage.dir().display(), "journal storage ready");

    let journal = JournalStore::load(storage).await;
    info!(entries = journal.entries().len(), "journal loaded");

    let addr = config.addr();
    let app = router(AppState::new(journal, config.chat));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
