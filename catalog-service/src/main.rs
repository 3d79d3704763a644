use catalog_service::cli::{self, Cli, Command};
use catalog_service::config::Config;
use catalog_service::models::storage::{MemoryBackend, SqliteBackend, StorageError};
use catalog_service::routes::router;
use catalog_service::services::catalog::{BookService, Store};
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

async fn connect_store(config: &Config) -> Result<Store, StorageError> {
    let store: Store = match config.backend_type.to_lowercase().as_str() {
        "memory" => {
            info!("Using in-memory backend");
            Arc::new(MemoryBackend::new())
        }
        "sqlite" | _ => {
            info!("Using SQLite backend at {}", config.database_url);
            Arc::new(SqliteBackend::new(&config.database_url).await?)
        }
    };

    store.test_connection().await?;
    info!("Storage backend connection successful");
    Ok(store)
}

async fn serve(service: Arc<BookService>, port: u16) -> Result<(), BoxError> {
    let app = router(service);
    let addr = format!("0.0.0.0:{}", port);

    info!("Catalog service starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("catalog_service=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let store = match connect_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to connect to storage backend: {}", e);
            std::process::exit(1);
        }
    };
    let service = Arc::new(BookService::from_config(store, &config));
    let mut stdout = std::io::stdout();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(service, config.port).await?,
        Command::List => cli::list_books(&service, &mut stdout).await?,
        Command::Search { title } => cli::search_books(&service, &title, &mut stdout).await?,
        Command::Simulate {
            book_ids,
            budget_ms,
        } => cli::simulate_reading(&service, &book_ids, budget_ms, &mut stdout).await?,
    }

    Ok(())
}
