use cosmledger::orchestration::{Dispatcher, Indexer};
use cosmledger::{api, config::Config, db::init_db, EntityStore, JsonlSource, Repository};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let pool = match init_db(&config.database_path).await {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let repo = Arc::new(Repository::new(pool));

    if let Some(feed_path) = config.feed_path.clone() {
        let store: Arc<dyn EntityStore> = repo.clone();
        let indexer = Indexer::new(Dispatcher::new(store, &config));
        tokio::spawn(async move {
            let mut source = match JsonlSource::open(&feed_path).await {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(path = %feed_path, error = %e, "Failed to open feed");
                    return;
                }
            };
            if let Err(e) = indexer.run(&mut source).await {
                tracing::error!(path = %feed_path, error = %e, "Feed processing stopped");
            }
        });
    } else {
        tracing::info!("FEED_PATH not set, serving existing state only");
    }

    let app = api::create_router(api::AppState::new(repo));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Server listening on {}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("Server error: {}", e);
        std::process::exit(1);
    }
}
