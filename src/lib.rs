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

//! KalEl token - capped, pausable, ownable fungible token ledger.
//!
//! This repository provides:
//! - The token ledger: balances, allowances, capped minting, burning, pause and ownership
//! - A single-writer executor with an atomically persisted snapshot and event journal
//! - A deployment driver deriving contract addresses from the deployer
//! - A thin HTTP host and Prometheus metrics

/// HTTP host surface.
pub mod api;
/// Core ledger primitives (types, token, state, runtime).
pub mod core;
/// Observability (metrics).
pub mod monitoring;
