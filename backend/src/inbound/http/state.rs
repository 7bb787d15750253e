//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! the driving ports, so they can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, AccountQuery, EngagementCommand, EngagementQuery, ReviewCommand, ReviewQuery,
    SessionVerifier,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountCommand>,
    pub accounts_query: Arc<dyn AccountQuery>,
    pub sessions: Arc<dyn SessionVerifier>,
    pub reviews: Arc<dyn ReviewCommand>,
    pub reviews_query: Arc<dyn ReviewQuery>,
    pub engagement: Arc<dyn EngagementCommand>,
    pub engagement_query: Arc<dyn EngagementQuery>,
}
