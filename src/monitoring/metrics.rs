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

use crate::core::token::ledger::Ledger;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use thiserror::Error;

/// Metrics errors.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus")]
    Prom,
}

/// Metrics container.
#[derive(Clone)]
pub struct Metrics {
    /// Registry.
    pub registry: Registry,

    /// Accepted calls.
    pub calls_total: IntCounter,
    /// Rejected calls, labelled by rejection kind.
    pub rejected_total: IntCounterVec,
    /// Current total supply (saturates at i64::MAX).
    pub total_supply: IntGauge,
    /// 1 while paused.
    pub paused: IntGauge,
}

impl Metrics {
    /// Create and register metrics.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let calls_total = IntCounter::new("kalel_calls_total", "Accepted ledger calls")
            .map_err(|_| MetricsError::Prom)?;
        let rejected_total = IntCounterVec::new(
            Opts::new("kalel_rejected_total", "Rejected ledger calls"),
            &["reason"],
        )
        .map_err(|_| MetricsError::Prom)?;
        let total_supply = IntGauge::new("kalel_total_supply", "Current total supply")
            .map_err(|_| MetricsError::Prom)?;
        let paused = IntGauge::new("kalel_paused", "Ledger pause flag")
            .map_err(|_| MetricsError::Prom)?;

        registry
            .register(Box::new(calls_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(rejected_total.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(total_supply.clone()))
            .map_err(|_| MetricsError::Prom)?;
        registry
            .register(Box::new(paused.clone()))
            .map_err(|_| MetricsError::Prom)?;

        Ok(Self {
            registry,
            calls_total,
            rejected_total,
            total_supply,
            paused,
        })
    }

    /// Refresh gauges from the published ledger.
    pub fn observe_ledger(&self, ledger: &Ledger) {
        self.total_supply
            .set(i64::try_from(ledger.total_supply()).unwrap_or(i64::MAX));
        self.paused.set(i64::from(ledger.paused()));
    }

    /// Render the Prometheus text exposition.
    pub fn encode_text(&self) -> Result<String, MetricsError> {
        let mut buf = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buf)
            .map_err(|_| MetricsError::Prom)?;
        String::from_utf8(buf).map_err(|_| MetricsError::Prom)
    }
}
