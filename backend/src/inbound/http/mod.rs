//! HTTP inbound adapter exposing REST endpoints.

pub mod accounts;
pub mod auth;
pub mod engagement;
pub mod error;
pub mod health;
pub mod reviews;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod token_config;

pub use error::ApiResult;
