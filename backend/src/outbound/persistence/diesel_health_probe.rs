//! Readiness probe issuing `SELECT 1` over a pooled connection.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{HealthProbe, HealthProbeError};

use super::pool::DbPool;

/// Diesel-backed implementation of [`HealthProbe`].
#[derive(Clone)]
pub struct DieselHealthProbe {
    pool: DbPool,
}

impl DieselHealthProbe {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthProbe for DieselHealthProbe {
    async fn ping(&self) -> Result<(), HealthProbeError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| HealthProbeError::unreachable(err.into_message()))?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| HealthProbeError::unreachable(err.to_string()))
    }
}
