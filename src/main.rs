//! PayFast gateway server.

use std::sync::Arc;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use payfast_gateway::adapters::http::{payfast_router, PaymentAppState};
use payfast_gateway::adapters::{
    ConfiguredSettingsProvider, InMemoryOrderLock, PayFastPaymentMethod, PayFastValidationClient,
    PostgresOrderRepository, RedisOrderLock,
};
use payfast_gateway::config::{AppConfig, RedisConfig, ServerConfig};
use payfast_gateway::ports::{GatewaySettingsProvider, OrderLock};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);

    let pool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let order_lock: Arc<dyn OrderLock> = match &config.redis {
        Some(redis_config) => Arc::new(connect_redis_lock(redis_config, &config).await?),
        None => {
            tracing::warn!("Redis not configured, order locks are process-local");
            Arc::new(InMemoryOrderLock::new())
        }
    };

    let settings_provider: Arc<dyn GatewaySettingsProvider> =
        Arc::new(ConfiguredSettingsProvider::new(config.payfast.clone()));

    let payment_method = PayFastPaymentMethod::new(
        settings_provider.clone(),
        config.store.base_url.clone(),
    )
    .with_store_scope(config.store.store_id.clone());

    let state = PaymentAppState {
        order_repository: Arc::new(PostgresOrderRepository::new(pool)),
        order_lock,
        payment_validator: Arc::new(PayFastValidationClient::new(
            config.payfast.validation_timeout(),
        )),
        settings_provider,
        payment_method: Arc::new(payment_method),
        store_base_url: config.store.base_url.clone(),
        store_scope: config.store.store_id.clone(),
    };

    let app = payfast_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(
        %addr,
        sandbox = config.payfast.sandbox,
        environment = ?config.server.environment,
        "PayFast gateway listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("PayFast gateway stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .pretty()
            .with_env_filter(filter)
            .init();
    }
}

async fn connect_redis_lock(
    redis_config: &RedisConfig,
    config: &AppConfig,
) -> Result<RedisOrderLock, Box<dyn std::error::Error>> {
    let client = redis::Client::open(redis_config.url.as_str())?;
    let conn = tokio::time::timeout(
        redis_config.timeout(),
        client.get_multiplexed_tokio_connection(),
    )
    .await??;

    Ok(RedisOrderLock::new(conn, config.payfast.lock_ttl())
        .with_wait(redis_config.lock_wait(), redis_config.lock_retry_interval()))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
