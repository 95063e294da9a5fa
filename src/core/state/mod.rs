#![forbid(unsafe_code)]

//! Persistent ledger storage.

pub mod persistent_state;
