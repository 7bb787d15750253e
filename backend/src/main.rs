//! Backend entry-point: loads configuration, opens the database pool and
//! serves the REST API.

mod server;

use std::ffi::OsString;

use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use cinephile::inbound::http::token_config::{BuildMode, signing_secret_from_env};
use cinephile::outbound::persistence::DbPool;
use server::{ServerConfig, ServerSettings, create_server};

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

    let settings = ServerSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|err| eyre!("load server settings: {err}"))?;
    let signing_secret = signing_secret_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("load token signing secret")?;

    let mut config = ServerConfig::new(
        signing_secret,
        settings.password_settings(),
        settings.bind_addr()?,
    );
    match settings.pool_config() {
        Some(pool_config) => {
            let pool = DbPool::new(pool_config)
                .await
                .wrap_err("connect to database")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("CINEPHILE_DATABASE_URL not set; serving from empty fixtures"),
    }

    let bind_addr = config.bind_addr;
    let (server, health_state) = create_server(config)?;
    info!(%bind_addr, "listening");
    let result = server.await;
    health_state.mark_unhealthy();
    result.wrap_err("http server")
}
