//! Server binary: build the pipeline once, then serve.

use std::sync::Arc;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use docqa_core::SpanScorer;
use docqa_server::config::ServerConfig;
use docqa_server::state::AppState;
use docqa_server::ApiServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "docqa_server=info,docqa_core=info,tower_http=debug".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!(address = %config.address(), "configuration loaded");

    let scorer = build_scorer()?;
    let state = AppState::new(config.clone(), scorer)?;

    ApiServer::new(config, state).start().await?;
    Ok(())
}

#[cfg(feature = "onnx")]
fn build_scorer() -> anyhow::Result<Arc<dyn SpanScorer>> {
    use docqa_core::{OnnxScorer, OnnxScorerConfig};

    let model_path =
        std::env::var("DOCQA_MODEL_PATH").unwrap_or_else(|_| "models/model.onnx".to_string());
    let tokenizer_path = std::env::var("DOCQA_TOKENIZER_PATH")
        .unwrap_or_else(|_| "models/tokenizer.json".to_string());

    let scorer = OnnxScorer::new(&OnnxScorerConfig {
        model_path: model_path.into(),
        tokenizer_path: tokenizer_path.into(),
        ..OnnxScorerConfig::default()
    })?;
    tracing::info!("span scorer initialized");
    Ok(Arc::new(scorer))
}

#[cfg(not(feature = "onnx"))]
fn build_scorer() -> anyhow::Result<Arc<dyn SpanScorer>> {
    anyhow::bail!(
        "no span scorer available: rebuild with `--features onnx` and point \
         DOCQA_MODEL_PATH / DOCQA_TOKENIZER_PATH at an extractive QA model"
    )
}
