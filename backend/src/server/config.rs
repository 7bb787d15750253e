//! HTTP server configuration: layered settings and the assembled config.

use std::net::SocketAddr;

use cinephile::domain::{PasswordSettings, SigningSecret};
use cinephile::outbound::persistence::{DbPool, PoolConfig};
use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings loaded from CLI flags, `CINEPHILE_*` variables and config files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CINEPHILE")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; without it the server runs on fixture adapters.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Argon2 memory cost in KiB.
    pub password_memory_kib: Option<u32>,
    /// Argon2 passes.
    pub password_iterations: Option<u32>,
    /// Argon2 lanes.
    pub password_parallelism: Option<u32>,
}

impl ServerSettings {
    /// Parse the configured bind address, falling back to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// [`std::io::Error`] of kind `InvalidInput` when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address '{raw}': {err}"),
            )
        })
    }

    /// Pool configuration, when a database URL is set.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        self.database_url.as_deref().map(|url| {
            PoolConfig::new(url)
                .with_max_size(self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE))
        })
    }

    /// Password hashing cost, with unset fields taken from the defaults.
    pub fn password_settings(&self) -> PasswordSettings {
        let defaults = PasswordSettings::default();
        PasswordSettings {
            memory_kib: self.password_memory_kib.unwrap_or(defaults.memory_kib),
            iterations: self.password_iterations.unwrap_or(defaults.iterations),
            parallelism: self.password_parallelism.unwrap_or(defaults.parallelism),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) signing_secret: SigningSecret,
    pub(crate) password: PasswordSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(
        signing_secret: SigningSecret,
        password: PasswordSettings,
        bind_addr: SocketAddr,
    ) -> Self {
        Self {
            signing_secret,
            password,
            bind_addr,
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one every driven port uses its fixture implementation.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
