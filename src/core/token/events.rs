// Copyright (c) 2026 KalEl Token
// Licensed under the Apache License, Version 2.0

//! Events emitted by successful ledger operations.

#![forbid(unsafe_code)]

use crate::core::types::{Address, Amount};
use serde::{Deserialize, Serialize};

/// One event per successful mutating call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerEvent {
    /// Value moved. Mint has `from == ZERO`, burn has `to == ZERO`.
    Transfer {
        /// Debited account.
        from: Address,
        /// Credited account.
        to: Address,
        /// Amount moved.
        amount: Amount,
    },
    /// Allowance set (overwrite).
    Approval {
        /// Account whose funds may be spent.
        owner: Address,
        /// Account allowed to spend.
        spender: Address,
        /// New limit.
        amount: Amount,
    },
    /// Ledger paused.
    Paused {
        /// Caller.
        account: Address,
    },
    /// Ledger unpaused.
    Unpaused {
        /// Caller.
        account: Address,
    },
    /// Owner changed.
    OwnershipTransferred {
        /// Owner before the call.
        previous_owner: Address,
        /// Owner after the call.
        new_owner: Address,
    },
}

impl LedgerEvent {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "transfer",
            LedgerEvent::Approval { .. } => "approval",
            LedgerEvent::Paused { .. } => "paused",
            LedgerEvent::Unpaused { .. } => "unpaused",
            LedgerEvent::OwnershipTransferred { .. } => "ownership_transferred",
        }
    }
}
