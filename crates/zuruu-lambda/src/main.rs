use std::sync::Arc;

use tracing_subscriber::EnvFilter;
use zuruu_bedrock::invoker::FlowInvoker;
use zuruu_bedrock::provider::BedrockProvider;
use zuruu_lambda::config::AppConfig;
use zuruu_lambda::state::AppState;
use zuruu_session::registry::SessionRegistry;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::from_env();
    let policy = config.load_redaction_policy()?;

    let client = zuruu_bedrock::client::build_client_with_region(&config.region).await;
    let provider = BedrockProvider::new(client, &config.model_id);
    tracing::info!(
        model_id = %config.model_id,
        region = %config.region,
        max_sessions = config.max_sessions,
        "starting"
    );

    let state = AppState {
        invoker: FlowInvoker::new(Arc::new(provider)),
        sessions: Arc::new(SessionRegistry::with_max_sessions(config.max_sessions)),
        policy: Arc::new(policy),
    };

    let app = zuruu_lambda::router(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
