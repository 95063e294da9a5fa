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

//! Persistent ledger store using sled: canonical snapshot plus a sequenced event journal.
//!
//! Key layout:
//! - `ledger/address`  -> contract address (20 bytes)
//! - `ledger/snapshot` -> canonical [`Ledger`] encoding
//! - `ledger/seq`      -> last journal sequence (u64 big-endian)
//! - `events/<seq be>` -> canonical [`LedgerEvent`] encoding

use crate::core::token::events::LedgerEvent;
use crate::core::token::ledger::{InvariantError, Ledger};
use crate::core::types::{decode_canonical_limited, encode_canonical, Address};
use sled::transaction::ConflictableTransactionError;
use thiserror::Error;

const KEY_ADDRESS: &[u8] = b"ledger/address";
const KEY_SNAPSHOT: &[u8] = b"ledger/snapshot";
const KEY_SEQ: &[u8] = b"ledger/seq";
const EVENTS_PREFIX: &[u8] = b"events/";

/// Upper bound on a decoded ledger snapshot.
pub const MAX_SNAPSHOT_BYTES: usize = 64 * 1024 * 1024;
/// Upper bound on a decoded journal entry.
pub const MAX_EVENT_BYTES: usize = 4 * 1024;

/// State errors.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("db open")]
    DbOpen,
    #[error("db io")]
    DbIo,
    #[error("codec")]
    Codec,
    #[error("snapshot violates ledger invariants: {0}")]
    Corrupt(#[from] InvariantError),
    #[error("ledger already deployed at this location")]
    AlreadyDeployed,
    #[error("no ledger deployed at this location")]
    NotDeployed,
    #[error("store belongs to contract {0}")]
    WrongContract(Address),
}

/// State operation.
#[derive(Clone, Debug)]
pub enum KvOp {
    /// Put key/value.
    Put { key: Vec<u8>, value: Vec<u8> },
}

/// Persistent state wrapper.
#[derive(Clone)]
pub struct PersistentState {
    db: sled::Db,
}

fn event_key(seq: u64) -> Vec<u8> {
    let mut k = Vec::with_capacity(EVENTS_PREFIX.len() + 8);
    k.extend_from_slice(EVENTS_PREFIX);
    k.extend_from_slice(&seq.to_be_bytes());
    k
}

impl PersistentState {
    /// Open sled DB at path (directory).
    pub fn open(path: &str) -> Result<Self, StateError> {
        let db = sled::open(path).map_err(|_| StateError::DbOpen)?;
        Ok(Self { db })
    }

    /// Get value.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, StateError> {
        let v = self.db.get(key).map_err(|_| StateError::DbIo)?;
        Ok(v.map(|iv| iv.to_vec()))
    }

    /// Atomic commit using sled transactions.
    pub fn commit_atomic(&self, ops: Vec<KvOp>) -> Result<(), StateError> {
        let res = self.db.transaction(|t| {
            for op in ops.iter() {
                match op {
                    KvOp::Put { key, value } => {
                        t.insert(key.as_slice(), value.as_slice())?;
                    }
                }
            }
            Ok::<(), ConflictableTransactionError<StateError>>(())
        });

        match res {
            Ok(()) => Ok(()),
            Err(sled::transaction::TransactionError::Abort(e)) => Err(e),
            Err(sled::transaction::TransactionError::Storage(_)) => Err(StateError::DbIo),
        }
    }

    /// Flush to disk.
    pub fn flush(&self) -> Result<(), StateError> {
        self.db.flush().map(|_| ()).map_err(|_| StateError::DbIo)
    }

    /// Contract address recorded at genesis.
    pub fn contract_address(&self) -> Result<Option<Address>, StateError> {
        let Some(bytes) = self.get(KEY_ADDRESS)? else {
            return Ok(None);
        };
        let arr: [u8; 20] = bytes.as_slice().try_into().map_err(|_| StateError::Codec)?;
        Ok(Some(Address::from_bytes(arr)))
    }

    /// Write the genesis snapshot. Refuses to overwrite an existing deployment.
    pub fn store_genesis(&self, address: &Address, ledger: &Ledger) -> Result<(), StateError> {
        if self.get(KEY_SNAPSHOT)?.is_some() {
            return Err(StateError::AlreadyDeployed);
        }
        let snapshot = encode_canonical(ledger).map_err(|_| StateError::Codec)?;
        self.commit_atomic(vec![
            KvOp::Put {
                key: KEY_ADDRESS.to_vec(),
                value: address.as_bytes().to_vec(),
            },
            KvOp::Put {
                key: KEY_SNAPSHOT.to_vec(),
                value: snapshot,
            },
            KvOp::Put {
                key: KEY_SEQ.to_vec(),
                value: 0u64.to_be_bytes().to_vec(),
            },
        ])?;
        self.flush()
    }

    /// Load the current ledger snapshot, if deployed.
    pub fn load_ledger(&self) -> Result<Option<Ledger>, StateError> {
        let Some(bytes) = self.get(KEY_SNAPSHOT)? else {
            return Ok(None);
        };
        let ledger: Ledger = decode_canonical_limited(&bytes, MAX_SNAPSHOT_BYTES)
            .map_err(|_| StateError::Codec)?;
        ledger.validate()?;
        Ok(Some(ledger))
    }

    /// Last committed journal sequence (0 before the first call).
    pub fn last_seq(&self) -> Result<u64, StateError> {
        let Some(bytes) = self.get(KEY_SEQ)? else {
            return Ok(0);
        };
        let arr: [u8; 8] = bytes.as_slice().try_into().map_err(|_| StateError::Codec)?;
        Ok(u64::from_be_bytes(arr))
    }

    /// Commit the post-call snapshot and its event under `seq` in one transaction,
    /// flushed to disk before returning.
    pub fn commit_call(
        &self,
        seq: u64,
        ledger: &Ledger,
        event: &LedgerEvent,
    ) -> Result<(), StateError> {
        let snapshot = encode_canonical(ledger).map_err(|_| StateError::Codec)?;
        let ev = encode_canonical(event).map_err(|_| StateError::Codec)?;
        self.commit_atomic(vec![
            KvOp::Put {
                key: KEY_SNAPSHOT.to_vec(),
                value: snapshot,
            },
            KvOp::Put {
                key: KEY_SEQ.to_vec(),
                value: seq.to_be_bytes().to_vec(),
            },
            KvOp::Put {
                key: event_key(seq),
                value: ev,
            },
        ])?;
        self.flush()
    }

    /// Journal entries with `seq >= from`, in order, at most `limit`.
    pub fn events(&self, from: u64, limit: usize) -> Result<Vec<(u64, LedgerEvent)>, StateError> {
        let mut out = Vec::new();
        for item in self.db.range(event_key(from)..) {
            if out.len() >= limit {
                break;
            }
            let (k, v) = item.map_err(|_| StateError::DbIo)?;
            let Some(seq_bytes) = k.strip_prefix(EVENTS_PREFIX) else {
                break;
            };
            let arr: [u8; 8] = seq_bytes.try_into().map_err(|_| StateError::Codec)?;
            let ev = decode_canonical_limited(&v, MAX_EVENT_BYTES).map_err(|_| StateError::Codec)?;
            out.push((u64::from_be_bytes(arr), ev));
        }
        Ok(out)
    }
}
