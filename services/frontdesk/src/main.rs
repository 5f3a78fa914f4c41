//! Lodge front-desk HTTP service entry point.
//!
//! # Purpose
//! Wires configuration, storage, token keys and the HTTP router, seeds the
//! first admin when configured, then serves the API and the metrics listener.
//!
//! # Notes
//! `build_state` holds all wiring so it can be exercised without binding a
//! socket.
use anyhow::Context;
use frontdesk::app::{AppState, build_router};
use frontdesk::auth::keys::{generate_signing_key, signing_key_from_seed_b64};
use frontdesk::auth::token::TokenKeys;
use frontdesk::bootstrap::seed_admin;
use frontdesk::config::{FrontdeskConfig, StorageBackend};
use frontdesk::observability;
use frontdesk::store::{HotelStore, memory::InMemoryStore, postgres::PostgresStore};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = FrontdeskConfig::from_env_or_yaml().context("front-desk config")?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: FrontdeskConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability("lodge-frontdesk")?;
    let state = build_state(config.clone()).await?;
    tracing::info!(
        backend = state.store.backend_name(),
        durable = state.store.is_durable(),
        reject_overlapping_bookings = state.reject_overlapping_bookings,
        "store ready"
    );
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let app = build_router(state);
    let addr = config.bind_addr;
    tracing::info!(%addr, "front desk listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: FrontdeskConfig) -> anyhow::Result<AppState> {
    let store: Arc<dyn HotelStore + Send + Sync> = match config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::Postgres => {
            let pg = config
                .postgres
                .as_ref()
                .context("postgres configuration missing")?;
            Arc::new(PostgresStore::connect(pg).await?)
        }
    };

    let signing_key = match &config.token.signing_seed {
        Some(seed) => signing_key_from_seed_b64(seed)?,
        None => {
            tracing::warn!("FRONTDESK_TOKEN_SEED not set; sessions end when the process exits");
            generate_signing_key()
        }
    };
    let tokens = TokenKeys::new(&signing_key).context("build token keys")?;

    if let Some(seed) = &config.admin {
        seed_admin(store.as_ref(), seed).await?;
    }
    tokio::fs::create_dir_all(&config.uploads.dir)
        .await
        .with_context(|| format!("create upload dir {}", config.uploads.dir.display()))?;

    Ok(AppState {
        api_version: "v1".to_string(),
        store,
        tokens: Arc::new(tokens),
        token_ttl: Duration::from_secs(config.token.ttl_secs),
        uploads: config.uploads,
        reject_overlapping_bookings: config.reject_overlapping_bookings,
    })
}
