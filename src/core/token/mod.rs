#![forbid(unsafe_code)]

//! Token ledger and its events.

pub mod events;
pub mod ledger;
