#![forbid(unsafe_code)]

//! Observability (metrics, structured logging helpers).

pub mod logging;
pub mod metrics;
