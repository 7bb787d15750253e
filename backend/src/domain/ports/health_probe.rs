//! Driven port used by the readiness endpoint to ping backing services.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failures reported by a health probe.
    pub enum HealthProbeError {
        /// The dependency could not be reached.
        Unreachable { message: String } => "dependency unreachable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// Issue a cheap round trip to the dependency.
    async fn ping(&self) -> Result<(), HealthProbeError>;
}

/// Probe that always succeeds; used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureHealthProbe;

#[async_trait]
impl HealthProbe for FixtureHealthProbe {
    async fn ping(&self) -> Result<(), HealthProbeError> {
        Ok(())
    }
}
