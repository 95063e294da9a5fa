#![forbid(unsafe_code)]
#![allow(missing_docs)]

//! Core ledger primitives (types, token ledger, persistence, runtime).

pub mod runtime;
pub mod state;
pub mod token;
pub mod types;
