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

//! Ledger deployment: address derivation and genesis persistence.

use crate::core::state::persistent_state::{PersistentState, StateError};
use crate::core::token::ledger::{Ledger, TokenError, TokenParams};
use crate::core::types::{Address, DeployConfig};
use ring::digest;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const DEPLOY_DOMAIN: &[u8] = b"kalel/deploy/v1";

/// Deployment errors.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("construction: {0}")]
    Construction(#[from] TokenError),
    #[error("create data dir")]
    Io,
    #[error("state: {0}")]
    State(#[from] StateError),
}

/// A freshly deployed ledger.
pub struct Deployment {
    /// Derived contract address.
    pub address: Address,
    /// Directory holding the ledger store.
    pub ledger_dir: PathBuf,
    /// Genesis state.
    pub ledger: Ledger,
    /// Open store of the deployed ledger.
    pub store: PersistentState,
}

/// Derive a contract address: last 20 bytes of SHA-256(domain || deployer || nonce_be).
pub fn contract_address(deployer: &Address, nonce: u64) -> Address {
    let mut ctx = digest::Context::new(&digest::SHA256);
    ctx.update(DEPLOY_DOMAIN);
    ctx.update(deployer.as_bytes());
    ctx.update(&nonce.to_be_bytes());
    let d = ctx.finish();
    let mut out = [0u8; 20];
    out.copy_from_slice(&d.as_ref()[12..32]);
    Address::from_bytes(out)
}

/// Store directory of the ledger at `address` under `data_dir`.
pub fn ledger_dir(data_dir: impl AsRef<Path>, address: &Address) -> PathBuf {
    data_dir.as_ref().join(address.to_string())
}

/// Open the store of an existing deployment at `address`.
///
/// A missing ledger directory is reported as [`StateError::NotDeployed`] and is not created.
pub fn open_deployed(
    data_dir: impl AsRef<Path>,
    address: &Address,
) -> Result<PersistentState, StateError> {
    let dir = ledger_dir(data_dir, address);
    if !dir.is_dir() {
        return Err(StateError::NotDeployed);
    }
    let store = PersistentState::open(&dir.to_string_lossy())?;
    match store.contract_address()? {
        Some(recorded) if recorded == *address => Ok(store),
        Some(recorded) => Err(StateError::WrongContract(recorded)),
        None => Err(StateError::NotDeployed),
    }
}

/// Construct the ledger described by `cfg` and persist its genesis.
pub fn deploy(cfg: &DeployConfig) -> Result<Deployment, DeployError> {
    let deployer = cfg.deployer.address;
    let ledger = Ledger::new(deployer, TokenParams::from(&cfg.token))?;
    let address = contract_address(&deployer, cfg.deployer.nonce);

    let dir = ledger_dir(&cfg.node.data_dir, &address);
    std::fs::create_dir_all(&dir).map_err(|_| DeployError::Io)?;
    let store = PersistentState::open(&dir.to_string_lossy())?;
    store.store_genesis(&address, &ledger)?;

    info!(
        %address,
        %deployer,
        name = ledger.name(),
        symbol = ledger.symbol(),
        cap = %ledger.cap(),
        decimals = ledger.decimals(),
        "ledger deployed"
    );

    Ok(Deployment {
        address,
        ledger_dir: dir,
        ledger,
        store,
    })
}
