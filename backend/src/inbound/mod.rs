//! Inbound adapters translating external requests into domain port calls.
//!
//! HTTP handlers live under [`http`]; framework types stop at this boundary.

pub mod http;
