pub mod config;
pub mod db;
pub mod models;
pub mod pipeline;

use tracing_subscriber::EnvFilter;

use config::{AppConfig, StoreBackend};
use pipeline::summarize::{
    run_batch, BatchResult, FixedDelay, GeminiClient, LlmClient, SqliteTenderStore,
    SummarizeError,
};

/// Install the global fmt subscriber; `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Run one batch to completion using configuration from the environment.
///
/// Only configuration, client construction and store connectivity errors
/// are returned; per-tender failures are reported inside `BatchResult`.
pub fn run() -> Result<BatchResult, SummarizeError> {
    init_tracing();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let app_config = AppConfig::from_env().map_err(|e| SummarizeError::Config(e.to_string()))?;
    let llm = GeminiClient::new(
        &app_config.gemini_base_url,
        &app_config.api_key,
        app_config.request_timeout_secs,
    )?;

    match llm.is_model_available(&app_config.model_name) {
        Ok(true) => {}
        Ok(false) => tracing::warn!(
            model = %app_config.model_name,
            "Configured model is not listed by the service"
        ),
        Err(e) => tracing::warn!(error = %e, "Could not list models, continuing"),
    }

    let summarize_config = app_config.summarize_config();
    let pacer = FixedDelay::from_config(&summarize_config);
    tracing::info!(
        model = %summarize_config.model_name,
        chunk_chars = summarize_config.max_chunk_chars,
        pacing_secs = pacer.delay().as_secs(),
        "Starting tender processing"
    );

    let result = match &app_config.store {
        StoreBackend::Sqlite { path } => {
            let conn = db::open_database(path)?;
            let store = SqliteTenderStore::new(conn);
            run_batch(&store, &llm, &pacer, &summarize_config, None)?
        }
        #[cfg(feature = "redis-store")]
        StoreBackend::Redis { url, prefix } => {
            let store = pipeline::summarize::RedisTenderStore::connect(url, prefix)?;
            run_batch(&store, &llm, &pacer, &summarize_config, None)?
        }
        #[cfg(not(feature = "redis-store"))]
        StoreBackend::Redis { .. } => {
            return Err(SummarizeError::Config(
                "TENDER_STORE=redis requires the redis-store feature".into(),
            ));
        }
    };

    tracing::info!("Completed tender processing");
    Ok(result)
}
