#![forbid(unsafe_code)]

//! HTTP host surface.

pub mod http;
