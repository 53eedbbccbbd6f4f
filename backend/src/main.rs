//! Backend entry-point: loads settings, prepares storage and serves HTTP.

use actix_web::web;
use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use rideshare::inbound::http::health::HealthState;
use rideshare::inbound::http::session_config::{BuildMode, SessionOptions, session_settings};
use rideshare::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use rideshare::server::{ServerConfig, ServerSettings, create_server, log_database_connectivity};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;

    let session = session_settings(
        &SessionOptions {
            key_file: settings.session_key_file(),
            allow_ephemeral: settings.session_allow_ephemeral,
            cookie_secure: settings.cookie_secure(),
        },
        BuildMode::from_debug_assertions(),
    )?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        settings.bind_addr()?,
    )
    .with_bcrypt_cost(settings.bcrypt_cost()?);

    if let Some(url) = settings.database_url() {
        run_pending_migrations(url).await?;
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.db_max_connections()?))
            .await?;
        log_database_connectivity(&pool).await;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting server");
    create_server(health_state, config)?.await?;
    Ok(())
}
