//! interview-guard server binary.
//!
//! Loads configuration from the environment, selects adapters (Postgres and
//! Redis when URLs are configured, in-memory otherwise) and serves the API.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use interview_guard::adapters::ai::{
    AnthropicConfig, AnthropicTextGenerator, MockTextGenerator, RetryingTextGenerator,
    TimeoutTextGenerator,
};
use interview_guard::adapters::auth::{JwtConfig, JwtSessionValidator};
use interview_guard::adapters::http::{app_router, HttpLimits, InterviewAppState};
use interview_guard::adapters::postgres::{PostgresAnswerRepository, PostgresInterviewRepository};
use interview_guard::adapters::rate_limiter::{InMemoryRateLimitStore, RedisRateLimitStore};
use interview_guard::adapters::storage::{InMemoryAnswerRepository, InMemoryInterviewRepository};
use interview_guard::application::{
    GenerateFeedbackHandler, GenerateQuestionsHandler, GenerationClient, ListAnswersHandler,
    RatePolicies, RequestGate,
};
use interview_guard::config::AppConfig;
use interview_guard::domain::security::FixedWindowRateLimiter;
use interview_guard::ports::{AnswerRepository, InterviewRepository, RateLimitStore, TextGenerator};

type BoxError = Box<dyn Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let addr = config.server.socket_addr()?;
    let state = build_state(&config).await?;
    let limits = HttpLimits::new(config.server.request_timeout(), config.server.max_body_bytes);
    let router = app_router(state, limits);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        environment = ?config.server.environment,
        "interview-guard listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("interview-guard stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.server.json_logs() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(false)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn build_state(config: &AppConfig) -> Result<InterviewAppState, BoxError> {
    let sessions = Arc::new(JwtSessionValidator::new(&JwtConfig::new(
        config.auth.secret(),
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
    )));

    let store = rate_limit_store(config).await?;
    let policies = RatePolicies::new(
        config.rate_limit.questions(),
        config.rate_limit.feedback(),
        config.rate_limit.reads(),
    );
    let gate = RequestGate::new(sessions, FixedWindowRateLimiter::new(store), policies);

    let client = GenerationClient::new(text_generator(config)?);
    let (interviews, answers) = repositories(config).await?;

    Ok(InterviewAppState::new(
        GenerateQuestionsHandler::new(gate.clone(), client.clone(), interviews.clone()),
        GenerateFeedbackHandler::new(gate.clone(), client, interviews, answers.clone()),
        ListAnswersHandler::new(gate, answers),
    ))
}

async fn rate_limit_store(config: &AppConfig) -> Result<Arc<dyn RateLimitStore>, BoxError> {
    match config.redis.url() {
        Some(url) => {
            let conn = redis::Client::open(url)?
                .get_multiplexed_async_connection()
                .await?;
            tracing::info!("rate limit windows stored in redis");
            Ok(Arc::new(RedisRateLimitStore::new(conn)))
        }
        None => {
            tracing::info!("rate limit windows kept in process memory");
            Ok(Arc::new(InMemoryRateLimitStore::new()))
        }
    }
}

/// Anthropic wrapped in retry and then timeout, or the mock outside production.
fn text_generator(config: &AppConfig) -> Result<Arc<dyn TextGenerator>, BoxError> {
    let ai = &config.ai;
    let Some(api_key) = ai.api_key() else {
        tracing::warn!("no anthropic api key configured, using mock text generator");
        return Ok(Arc::new(MockTextGenerator::new()));
    };

    let anthropic = AnthropicTextGenerator::new(
        AnthropicConfig::new(api_key)
            .with_model(ai.model.clone())
            .with_base_url(ai.base_url.clone())
            .with_timeout(ai.timeout())
            .with_max_tokens(ai.max_tokens),
    )?;
    let retrying = RetryingTextGenerator::new(
        Arc::new(anthropic),
        ai.max_retries,
        ai.retry_base_delay(),
    );
    tracing::info!(model = %ai.model, max_retries = ai.max_retries, "anthropic text generator ready");
    Ok(Arc::new(TimeoutTextGenerator::new(
        Arc::new(retrying),
        ai.timeout(),
    )))
}

async fn repositories(
    config: &AppConfig,
) -> Result<(Arc<dyn InterviewRepository>, Arc<dyn AnswerRepository>), BoxError> {
    let Some(url) = config.database.url() else {
        tracing::warn!("no database url configured, records are kept in memory");
        return Ok((
            Arc::new(InMemoryInterviewRepository::new()),
            Arc::new(InMemoryAnswerRepository::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate::Migrator::new(Path::new("./migrations"))
            .await?
            .run(&pool)
            .await?;
        tracing::info!("database migrations applied");
    }

    Ok((
        Arc::new(PostgresInterviewRepository::new(pool.clone())),
        Arc::new(PostgresAnswerRepository::new(pool)),
    ))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
