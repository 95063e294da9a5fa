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

//! Deterministic core types, canonical encoding helpers and deployment configuration.

use bincode::Options;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Token amount in base units. Decimals never enter the arithmetic.
pub type Amount = u128;

/// Canonical serialization error.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("serialization")]
    Serialize,
    #[error("deserialization")]
    Deserialize,
    #[error("size limit exceeded")]
    TooLarge,
}

/// Canonical bincode options (deterministic).
fn bincode_opts() -> impl Options {
    // Fixint encoding provides a stable integer representation.
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

/// Encode with deterministic rules. Requires deterministic container ordering (use BTreeMap/BTreeSet).
pub fn encode_canonical<T: Serialize>(v: &T) -> Result<Vec<u8>, CodecError> {
    bincode_opts()
        .serialize(v)
        .map_err(|_| CodecError::Serialize)
}

/// Decode with a hard size cap.
pub fn decode_canonical_limited<T: DeserializeOwned>(
    bytes: &[u8],
    max: usize,
) -> Result<T, CodecError> {
    if bytes.len() > max {
        return Err(CodecError::TooLarge);
    }
    // The deserializer limit also bounds container lengths declared inside the payload.
    bincode_opts()
        .with_limit(max as u64)
        .deserialize(bytes)
        .map_err(|_| CodecError::Deserialize)
}

/// Address parsing errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid hex")]
    Hex,
    #[error("address must be 20 bytes, got {0}")]
    Length(usize),
}

/// 20-byte account identifier, rendered as `0x`-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The all-zero address. Used as the counterparty of mint and burn events.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Construct from raw bytes.
    pub const fn from_bytes(b: [u8; 20]) -> Self {
        Self(b)
    }

    /// Return bytes.
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| AddressError::Hex)?;
        let arr: [u8; 20] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| AddressError::Length(bytes.len()))?;
        Ok(Self(arr))
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Address> for String {
    fn from(a: Address) -> Self {
        a.to_string()
    }
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config")]
    Read,
    #[error("parse config: {0}")]
    Parse(String),
}

/// Deployment configuration root (TOML).
///
/// ```text
/// [deployer]
/// address = "0x..."
/// nonce = 0
///
/// [token]
/// initial_supply = 100
/// name = "KalElToken"
/// symbol = "KET"
/// cap = 1000
/// decimals = 0
///
/// [node]
/// data_dir = "./data"
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Deploying account; becomes the ledger owner.
    pub deployer: DeployerSettings,
    /// Constructor arguments.
    pub token: TokenSettings,
    /// Node settings.
    pub node: NodeSettings,
}

/// Deployer identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeployerSettings {
    /// Deployer account.
    pub address: Address,
    /// Deployment nonce, mixed into the derived contract address.
    #[serde(default)]
    pub nonce: u64,
}

/// Token constructor arguments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenSettings {
    /// Supply credited to the deployer at construction.
    pub initial_supply: u64,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Immutable supply ceiling.
    pub cap: u64,
    /// Display precision.
    pub decimals: u8,
}

/// Node settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeSettings {
    /// Root directory; each deployed ledger lives in `data_dir/<address>`.
    pub data_dir: String,
}

/// Parse a deployment configuration from TOML text.
pub fn parse_deploy_config(s: &str) -> Result<DeployConfig, ConfigError> {
    toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
}

/// Load a deployment configuration file.
pub fn load_deploy_config(path: impl AsRef<Path>) -> Result<DeployConfig, ConfigError> {
    let s = std::fs::read_to_string(path).map_err(|_| ConfigError::Read)?;
    parse_deploy_config(&s)
}
