//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`*Command`, `*Query`, [`SessionVerifier`]) are called by
//! inbound adapters. Driven ports (`*Reader`, `*Repository`, [`HealthProbe`])
//! are implemented by outbound adapters.

mod macros;
pub(crate) use macros::{define_port_error, map_storage_error_to_domain};

mod account_command;
mod catalogue_reader;
mod engagement_command;
mod engagement_repository;
mod health_probe;
mod review_command;
mod review_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::{MockAccountCommand, MockAccountQuery, MockSessionVerifier};
pub use account_command::{AccountCommand, AccountQuery, SessionGrant, SessionVerifier};
#[cfg(test)]
pub use catalogue_reader::MockCatalogueReader;
pub use catalogue_reader::{CatalogueReadError, CatalogueReader, FixtureCatalogueReader};
#[cfg(test)]
pub use engagement_command::{MockEngagementCommand, MockEngagementQuery};
pub use engagement_command::{EngagementCommand, EngagementQuery, EngagementToggle};
#[cfg(test)]
pub use engagement_repository::MockEngagementRepository;
pub use engagement_repository::{
    EngagementRepository, EngagementRepositoryError, FixtureEngagementRepository,
};
#[cfg(test)]
pub use health_probe::MockHealthProbe;
pub use health_probe::{FixtureHealthProbe, HealthProbe, HealthProbeError};
#[cfg(test)]
pub use review_command::{MockReviewCommand, MockReviewQuery};
pub use review_command::{ReviewCommand, ReviewQuery, ReviewSubmission};
#[cfg(test)]
pub use review_repository::MockReviewRepository;
pub use review_repository::{FixtureReviewRepository, ReviewRepository, ReviewRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{
    FixtureUserRepository, NewUserAccount, UserPersistenceError, UserRepository,
};
