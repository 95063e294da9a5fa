// Copyright (c) 2026 KalEl Token
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//     http://www.apache.org/licenses/LICENSE-2.0
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Single-writer call executor.
//!
//! All mutating calls go through one mutex. A call is applied to a working copy of the
//! ledger, committed to the store (when one is attached), and only then published, so
//! readers never observe a rejected or half-persisted call.

use crate::core::state::persistent_state::{PersistentState, StateError};
use crate::core::token::events::LedgerEvent;
use crate::core::token::ledger::{Ledger, TokenError, TokenInfo};
use crate::core::types::{Address, Amount};
use crate::monitoring::metrics::Metrics;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tracing::{info, warn};

/// Execution error.
#[derive(Debug, Error)]
pub enum ExecError {
    /// The ledger rejected the call.
    #[error(transparent)]
    Rejected(#[from] TokenError),
    /// Persisting the call failed; the call was not applied.
    #[error("state: {0}")]
    State(#[from] StateError),
    /// A previous holder of the ledger lock panicked.
    #[error("executor lock poisoned")]
    Poisoned,
}

/// Mutating entry points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Op {
    /// Move caller funds to `to`.
    Transfer { to: Address, amount: Amount },
    /// Set caller allowance for `spender`.
    Approve { spender: Address, amount: Amount },
    /// Spend caller allowance on `from`.
    TransferFrom {
        from: Address,
        to: Address,
        amount: Amount,
    },
    /// Owner only.
    Mint { to: Address, amount: Amount },
    /// Owner only.
    Burn { from: Address, amount: Amount },
    /// Owner only.
    Pause,
    /// Owner only.
    Unpause,
    /// Owner only.
    TransferOwnership { new_owner: Address },
}

impl Op {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Op::Transfer { .. } => "transfer",
            Op::Approve { .. } => "approve",
            Op::TransferFrom { .. } => "transfer_from",
            Op::Mint { .. } => "mint",
            Op::Burn { .. } => "burn",
            Op::Pause => "pause",
            Op::Unpause => "unpause",
            Op::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}

/// A caller-scoped ledger call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Call {
    /// Identity the call is made as.
    pub caller: Address,
    /// Operation.
    pub op: Op,
}

/// Result of an accepted call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Journal sequence assigned to the call (starts at 1).
    pub seq: u64,
    /// Emitted event.
    pub event: LedgerEvent,
}

/// Dispatch a call onto a ledger.
pub fn apply(ledger: &mut Ledger, call: &Call) -> Result<LedgerEvent, TokenError> {
    let caller = &call.caller;
    match &call.op {
        Op::Transfer { to, amount } => ledger.transfer(caller, to, *amount),
        Op::Approve { spender, amount } => ledger.approve(caller, spender, *amount),
        Op::TransferFrom { from, to, amount } => ledger.transfer_from(caller, from, to, *amount),
        Op::Mint { to, amount } => ledger.mint(caller, to, *amount),
        Op::Burn { from, amount } => ledger.burn(caller, from, *amount),
        Op::Pause => ledger.pause(caller),
        Op::Unpause => ledger.unpause(caller),
        Op::TransferOwnership { new_owner } => ledger.transfer_ownership(caller, new_owner),
    }
}

struct Inner {
    ledger: Ledger,
    seq: u64,
}

/// Serialized executor over one ledger.
pub struct TokenExecutor {
    inner: Mutex<Inner>,
    store: Option<PersistentState>,
    metrics: Arc<Metrics>,
}

impl TokenExecutor {
    /// Wrap an in-memory ledger, optionally backed by a store.
    pub fn new(ledger: Ledger, store: Option<PersistentState>, metrics: Arc<Metrics>) -> Self {
        metrics.observe_ledger(&ledger);
        Self {
            inner: Mutex::new(Inner { ledger, seq: 0 }),
            store,
            metrics,
        }
    }

    /// Resume a deployed ledger from its store.
    pub fn open(store: PersistentState, metrics: Arc<Metrics>) -> Result<Self, ExecError> {
        let ledger = store.load_ledger()?.ok_or(StateError::NotDeployed)?;
        let seq = store.last_seq()?;
        metrics.observe_ledger(&ledger);
        Ok(Self {
            inner: Mutex::new(Inner { ledger, seq }),
            store: Some(store),
            metrics,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, ExecError> {
        self.inner.lock().map_err(|_| ExecError::Poisoned)
    }

    /// Execute one call atomically.
    pub fn execute(&self, call: Call) -> Result<Receipt, ExecError> {
        let mut inner = self.lock()?;
        let mut next = inner.ledger.clone();

        let event = match apply(&mut next, &call) {
            Ok(ev) => ev,
            Err(e) => {
                self.metrics.rejected_total.with_label_values(&[e.kind()]).inc();
                warn!(caller = %call.caller, op = call.op.name(), reason = e.kind(), "call rejected");
                return Err(e.into());
            }
        };

        let seq = inner.seq + 1;
        if let Some(store) = &self.store {
            if let Err(e) = store.commit_call(seq, &next, &event) {
                self.metrics.rejected_total.with_label_values(&["state"]).inc();
                warn!(?e, caller = %call.caller, op = call.op.name(), "call commit failed");
                return Err(e.into());
            }
        }

        inner.ledger = next;
        inner.seq = seq;
        self.metrics.calls_total.inc();
        self.metrics.observe_ledger(&inner.ledger);
        info!(seq, caller = %call.caller, op = call.op.name(), event = event.name(), "call applied");
        Ok(Receipt { seq, event })
    }

    /// Metadata of the published ledger.
    pub fn token_info(&self) -> Result<TokenInfo, ExecError> {
        Ok(self.lock()?.ledger.info())
    }

    /// Balance of `account`.
    pub fn balance_of(&self, account: &Address) -> Result<Amount, ExecError> {
        Ok(self.lock()?.ledger.balance_of(account))
    }

    /// Allowance of `spender` over `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Result<Amount, ExecError> {
        Ok(self.lock()?.ledger.allowance(owner, spender))
    }

    /// Clone of the published ledger.
    pub fn snapshot(&self) -> Result<Ledger, ExecError> {
        Ok(self.lock()?.ledger.clone())
    }

    /// Last assigned journal sequence.
    pub fn last_seq(&self) -> Result<u64, ExecError> {
        Ok(self.lock()?.seq)
    }

    /// Journal entries from the store; empty for in-memory executors.
    pub fn events(&self, from: u64, limit: usize) -> Result<Vec<(u64, LedgerEvent)>, ExecError> {
        match &self.store {
            Some(store) => Ok(store.events(from, limit)?),
            None => Ok(Vec::new()),
        }
    }

    /// Metrics handle.
    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}
