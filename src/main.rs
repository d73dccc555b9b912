use anyhow::Result;
use devcamper::config::AppConfig;
use devcamper::core::store::DocumentStore;
use devcamper::observability::init_tracing;
use devcamper::server::ServerBuilder;
use devcamper::storage::InMemoryDocumentStore;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // .env is optional
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    tracing::info!(
        port = config.server.port,
        upload_path = %config.upload.file_upload_path.display(),
        count_scope = ?config.listing.count_scope,
        "configuration loaded"
    );

    let store = open_store(&config).await?;

    ServerBuilder::new()
        .with_config(config)
        .with_shared_store(store)
        .with_default_entities()
        .serve()
        .await
}

/// MongoDB when `MONGO_URI` is configured and the backend is compiled in,
/// the in-memory store otherwise
#[cfg(feature = "mongodb_backend")]
async fn open_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    use devcamper::storage::MongoDocumentStore;

    match &config.database.mongo_uri {
        Some(uri) => {
            let name = config.database.name.as_deref().unwrap_or("devcamper");
            let store = MongoDocumentStore::connect(uri, name).await?;
            tracing::info!(database = name, "using MongoDB store");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("MONGO_URI not set, using in-memory store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
    }
}

#[cfg(not(feature = "mongodb_backend"))]
async fn open_store(config: &AppConfig) -> Result<Arc<dyn DocumentStore>> {
    if config.database.mongo_uri.is_some() {
        tracing::warn!("MONGO_URI is set but the mongodb_backend feature is disabled");
    }
    tracing::info!("using in-memory store");
    Ok(Arc::new(InMemoryDocumentStore::new()))
}
