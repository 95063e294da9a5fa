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

//! Structured logging setup shared by the binaries.

/// Install the global subscriber. `KALEL_LOG_JSON=1` selects JSON lines.
///
/// Safe to call more than once; later calls keep the installed subscriber.
pub fn init_tracing() {
    let json = std::env::var("KALEL_LOG_JSON")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let installed = if json {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .json()
            .try_init()
    } else {
        tracing_subscriber::fmt()
            .with_target(false)
            .with_level(true)
            .compact()
            .try_init()
    };
    if let Err(e) = installed {
        tracing::debug!(%e, "keeping existing tracing subscriber");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_keeps_first_subscriber() {
        init_tracing();
        init_tracing();
        tracing::info!("still logging");
    }
}
