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

//! HTTP surface over a [`TokenExecutor`].
//!
//! Callers identify themselves in the request body; there is no request signing.

use crate::core::runtime::executor::{Call, ExecError, Receipt, TokenExecutor};
use crate::core::state::persistent_state::StateError;
use crate::core::token::events::LedgerEvent;
use crate::core::token::ledger::{TokenError, TokenInfo};
use crate::core::types::{Address, AddressError, Amount};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MAX_EVENTS_PAGE: usize = 1000;

/// Shared handler state.
#[derive(Clone)]
pub struct ApiState {
    /// Executor serving all requests.
    pub executor: Arc<TokenExecutor>,
}

/// Handler errors.
#[derive(Debug)]
pub enum ApiError {
    /// Path parameter is not an address.
    BadAddress(AddressError),
    /// Executor error.
    Exec(ExecError),
}

impl From<ExecError> for ApiError {
    fn from(e: ExecError) -> Self {
        ApiError::Exec(e)
    }
}

impl From<AddressError> for ApiError {
    fn from(e: AddressError) -> Self {
        ApiError::BadAddress(e)
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Machine-readable kind.
    pub error: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ApiError {
    fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadAddress(_) => (StatusCode::BAD_REQUEST, "bad_address"),
            ApiError::Exec(ExecError::Rejected(e)) => {
                let status = match e {
                    TokenError::Unauthorized { .. } => StatusCode::FORBIDDEN,
                    TokenError::OperationsPaused => StatusCode::CONFLICT,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, e.kind())
            }
            ApiError::Exec(ExecError::State(StateError::NotDeployed)) => {
                (StatusCode::NOT_FOUND, "not_deployed")
            }
            ApiError::Exec(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();
        let reason = match &self {
            ApiError::BadAddress(e) => e.to_string(),
            ApiError::Exec(e) => e.to_string(),
        };
        let body = ErrorBody {
            error: kind.to_string(),
            reason,
        };
        (status, Json(body)).into_response()
    }
}

/// Balance response.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceView {
    /// Queried account.
    pub account: Address,
    /// Balance.
    pub balance: Amount,
}

/// Allowance response.
#[derive(Debug, Serialize, Deserialize)]
pub struct AllowanceView {
    /// Funds owner.
    pub owner: Address,
    /// Spender.
    pub spender: Address,
    /// Remaining allowance.
    pub allowance: Amount,
}

/// Journal query.
#[derive(Debug, Deserialize)]
pub struct EventsQuery {
    /// First sequence to return.
    #[serde(default)]
    pub from: u64,
    /// Page size (capped).
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Journal entry.
#[derive(Debug, Serialize, Deserialize)]
pub struct EventView {
    /// Sequence.
    pub seq: u64,
    /// Event.
    pub event: LedgerEvent,
}

/// Build the router.
pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/token", get(token_info))
        .route("/balance/:account", get(balance_of))
        .route("/allowance/:owner/:spender", get(allowance))
        .route("/events", get(events))
        .route("/call", post(submit_call))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// `GET /token`
pub async fn token_info(State(st): State<ApiState>) -> Result<Json<TokenInfo>, ApiError> {
    Ok(Json(st.executor.token_info()?))
}

/// `GET /balance/:account`
pub async fn balance_of(
    State(st): State<ApiState>,
    Path(account): Path<String>,
) -> Result<Json<BalanceView>, ApiError> {
    let account: Address = account.parse()?;
    let balance = st.executor.balance_of(&account)?;
    Ok(Json(BalanceView { account, balance }))
}

/// `GET /allowance/:owner/:spender`
pub async fn allowance(
    State(st): State<ApiState>,
    Path((owner, spender)): Path<(String, String)>,
) -> Result<Json<AllowanceView>, ApiError> {
    let owner: Address = owner.parse()?;
    let spender: Address = spender.parse()?;
    let allowance = st.executor.allowance(&owner, &spender)?;
    Ok(Json(AllowanceView {
        owner,
        spender,
        allowance,
    }))
}

/// `GET /events?from=N&limit=M`
pub async fn events(
    State(st): State<ApiState>,
    Query(q): Query<EventsQuery>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let limit = q.limit.unwrap_or(100).min(MAX_EVENTS_PAGE);
    let out = st
        .executor
        .events(q.from, limit)?
        .into_iter()
        .map(|(seq, event)| EventView { seq, event })
        .collect();
    Ok(Json(out))
}

/// `POST /call`
pub async fn submit_call(
    State(st): State<ApiState>,
    Json(call): Json<Call>,
) -> Result<Json<Receipt>, ApiError> {
    Ok(Json(st.executor.execute(call)?))
}

/// `GET /metrics`
pub async fn metrics(State(st): State<ApiState>) -> Response {
    match st.executor.metrics().encode_text() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
