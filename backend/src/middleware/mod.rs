//! Request middleware.

pub mod trace;

pub use trace::{TRACE_ID_HEADER, Trace};
