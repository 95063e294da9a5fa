#![forbid(unsafe_code)]

//! Serialized call execution and deployment.

pub mod deploy;
pub mod executor;
