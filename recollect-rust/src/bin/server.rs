use recollect::{
    config::Config,
    server::{cors_layer, router, AppState},
    storage::{JsonFileStorage, MemoryStorage, StateStorage},
    store::CardStore,
    unlock::UnlockGate,
};
use recollect_genai::{
    google::{GoogleModel, GoogleModelOptions},
    LanguageModel,
};
use std::{error::Error, sync::Arc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

type BoxedError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxedError> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("recollect=info,recollect_genai=info")),
        )
        .init();

    let model: Option<Arc<dyn LanguageModel>> = match &config.gemini_api_key {
        Some(api_key) => Some(Arc::new(GoogleModel::new(
            config.gemini_model.clone(),
            GoogleModelOptions {
                api_key: api_key.clone(),
                base_url: config.gemini_base_url.clone(),
                ..Default::default()
            },
        ))),
        None => {
            warn!("GEMINI_API_KEY is not set; AI enrichment is disabled");
            None
        }
    };

    let storage: Box<dyn StateStorage> = match &config.storage_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let storage = JsonFileStorage::new(dir);
            info!(path = %storage.path().display(), "persisting cards to disk");
            Box::new(storage)
        }
        None => {
            info!("RECOLLECT_STORAGE_DIR is not set; cards are kept in memory");
            Box::new(MemoryStorage::new())
        }
    };

    let store = CardStore::open(storage)?;
    let gate = UnlockGate::new(config.unlock_code.clone())?;
    let app = router(AppState::new(store, gate, model)).layer(cors_layer(&config.app_url)?);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!(model = %config.gemini_model, "server listening on http://localhost:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
