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

use anyhow::{Context, Result};
use kalel_token::core::runtime::deploy::deploy;
use kalel_token::core::types::load_deploy_config;
use kalel_token::monitoring::logging::init_tracing;

fn main() -> Result<()> {
    init_tracing();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "deploy/kalel-token.toml".to_string());
    let cfg = load_deploy_config(&path).with_context(|| format!("load {path}"))?;
    let d = deploy(&cfg).context("deploy failed")?;

    println!("Token deployed successfully to : {}", d.address);
    Ok(())
}
