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

use kalel_token::core::runtime::executor::{Call, ExecError, Op, TokenExecutor};
use kalel_token::core::state::persistent_state::{KvOp, PersistentState, StateError};
use kalel_token::core::token::events::LedgerEvent;
use kalel_token::core::token::ledger::{InvariantError, Ledger, TokenError, TokenParams};
use kalel_token::core::types::{encode_canonical, Address};
use kalel_token::monitoring::metrics::Metrics;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

fn owner() -> Address {
    Address::from_bytes([0xaa; 20])
}

fn user() -> Address {
    Address::from_bytes([0xbb; 20])
}

fn genesis() -> Ledger {
    Ledger::new(
        owner(),
        TokenParams {
            initial_supply: 100,
            name: "KalElToken".to_string(),
            symbol: "KET".to_string(),
            cap: 1000,
            decimals: 0,
        },
    )
    .unwrap()
}

fn metrics() -> Arc<Metrics> {
    Arc::new(Metrics::new().unwrap())
}

fn deployed_store(dir: &tempfile::TempDir) -> PersistentState {
    let st = PersistentState::open(dir.path().to_str().unwrap()).unwrap();
    st.store_genesis(&Address::from_bytes([0xcc; 20]), &genesis())
        .unwrap();
    st
}

#[test]
fn receipts_are_sequenced() {
    let ex = TokenExecutor::new(genesis(), None, metrics());
    let r1 = ex
        .execute(Call {
            caller: owner(),
            op: Op::Transfer {
                to: user(),
                amount: 100,
            },
        })
        .unwrap();
    let r2 = ex
        .execute(Call {
            caller: owner(),
            op: Op::Mint {
                to: user(),
                amount: 500,
            },
        })
        .unwrap();
    assert_eq!((r1.seq, r2.seq), (1, 2));
    assert_eq!(ex.balance_of(&user()).unwrap(), 600);
    assert_eq!(ex.token_info().unwrap().total_supply, 600);
}

#[test]
fn rejected_call_changes_nothing() {
    let m = metrics();
    let ex = TokenExecutor::new(genesis(), None, m.clone());
    let before = ex.snapshot().unwrap();

    let err = ex
        .execute(Call {
            caller: owner(),
            op: Op::Mint {
                to: user(),
                amount: 100_000,
            },
        })
        .unwrap_err();
    assert!(matches!(
        err,
        ExecError::Rejected(TokenError::CapExceeded { .. })
    ));
    assert_eq!(ex.snapshot().unwrap(), before);
    assert_eq!(ex.last_seq().unwrap(), 0);
    assert_eq!(
        m.rejected_total.with_label_values(&["cap_exceeded"]).get(),
        1
    );
    assert_eq!(m.calls_total.get(), 0);
}

#[test]
fn calls_are_journaled_and_resumable() {
    let dir = tempfile::tempdir().unwrap();
    let st = deployed_store(&dir);

    {
        let ex = TokenExecutor::open(st.clone(), metrics()).unwrap();
        ex.execute(Call {
            caller: owner(),
            op: Op::Approve {
                spender: user(),
                amount: 200,
            },
        })
        .unwrap();
        ex.execute(Call {
            caller: user(),
            op: Op::TransferFrom {
                from: owner(),
                to: user(),
                amount: 100,
            },
        })
        .unwrap();
        // Rejections are not journaled.
        assert!(ex
            .execute(Call {
                caller: user(),
                op: Op::Pause,
            })
            .is_err());
    }

    let ex = TokenExecutor::open(st.clone(), metrics()).unwrap();
    assert_eq!(ex.last_seq().unwrap(), 2);
    assert_eq!(ex.balance_of(&user()).unwrap(), 100);
    assert_eq!(ex.allowance(&owner(), &user()).unwrap(), 100);

    let events = ex.events(0, 10).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        (
            1,
            LedgerEvent::Approval {
                owner: owner(),
                spender: user(),
                amount: 200
            }
        )
    );
    assert_eq!(
        events[1],
        (
            2,
            LedgerEvent::Transfer {
                from: owner(),
                to: user(),
                amount: 100
            }
        )
    );
    assert_eq!(ex.events(2, 10).unwrap().len(), 1);
    assert_eq!(ex.events(0, 1).unwrap().len(), 1);
}

#[test]
fn pause_round_trip_through_executor() {
    let ex = TokenExecutor::new(genesis(), None, metrics());
    let transfer = Call {
        caller: owner(),
        op: Op::Transfer {
            to: user(),
            amount: 100,
        },
    };
    ex.execute(Call {
        caller: owner(),
        op: Op::Pause,
    })
    .unwrap();
    assert!(matches!(
        ex.execute(transfer.clone()),
        Err(ExecError::Rejected(TokenError::OperationsPaused))
    ));
    ex.execute(Call {
        caller: owner(),
        op: Op::Unpause,
    })
    .unwrap();
    ex.execute(transfer).unwrap();
    assert_eq!(ex.balance_of(&user()).unwrap(), 100);
}

#[test]
fn open_requires_deployment() {
    let dir = tempfile::tempdir().unwrap();
    let st = PersistentState::open(dir.path().to_str().unwrap()).unwrap();
    assert!(matches!(
        TokenExecutor::open(st, metrics()),
        Err(ExecError::State(StateError::NotDeployed))
    ));
}

#[test]
fn genesis_cannot_be_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let st = deployed_store(&dir);
    assert!(matches!(
        st.store_genesis(&Address::from_bytes([0xcc; 20]), &genesis()),
        Err(StateError::AlreadyDeployed)
    ));
    assert_eq!(
        st.contract_address().unwrap(),
        Some(Address::from_bytes([0xcc; 20]))
    );
}

#[test]
fn concurrent_calls_are_serialized() {
    let ex = Arc::new(TokenExecutor::new(genesis(), None, metrics()));
    ex.execute(Call {
        caller: owner(),
        op: Op::Mint {
            to: owner(),
            amount: 900,
        },
    })
    .unwrap();

    let handles: Vec<_> = (0..8u8)
        .map(|i| {
            let ex = ex.clone();
            std::thread::spawn(move || {
                let to = Address::from_bytes([i + 1; 20]);
                for _ in 0..10 {
                    let _ = ex.execute(Call {
                        caller: owner(),
                        op: Op::Transfer { to, amount: 10 },
                    });
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    let l = ex.snapshot().unwrap();
    let sum: u128 = l.balances().map(|(_, b)| *b).sum();
    assert_eq!(sum, 1000);
    assert_eq!(l.balance_of(&owner()), 200);
    assert_eq!(ex.last_seq().unwrap(), 81);
}

/// Field-for-field stand-in for an on-disk snapshot, free of ledger checks.
#[derive(Serialize)]
struct RawSnapshot {
    name: String,
    symbol: String,
    decimals: u8,
    cap: u128,
    total_supply: u128,
    paused: bool,
    owner: Address,
    balances: BTreeMap<Address, u128>,
    allowances: BTreeMap<(Address, Address), u128>,
}

#[test]
fn inconsistent_snapshot_is_refused_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let st = deployed_store(&dir);

    let raw = RawSnapshot {
        name: "KalElToken".to_string(),
        symbol: "KET".to_string(),
        decimals: 0,
        cap: 1000,
        total_supply: 100,
        paused: false,
        owner: owner(),
        balances: BTreeMap::from([(owner(), 500)]),
        allowances: BTreeMap::new(),
    };
    st.commit_atomic(vec![KvOp::Put {
        key: b"ledger/snapshot".to_vec(),
        value: encode_canonical(&raw).unwrap(),
    }])
    .unwrap();

    assert!(matches!(
        st.load_ledger(),
        Err(StateError::Corrupt(InvariantError::SupplyMismatch {
            sum: Some(500),
            total_supply: 100
        }))
    ));
    assert!(matches!(
        TokenExecutor::open(st, metrics()),
        Err(ExecError::State(StateError::Corrupt(_)))
    ));
}

#[test]
fn committed_calls_survive_reopening_the_store() {
    let dir = tempfile::tempdir().unwrap();
    {
        let st = deployed_store(&dir);
        let ex = TokenExecutor::open(st, metrics()).unwrap();
        ex.execute(Call {
            caller: owner(),
            op: Op::Transfer {
                to: user(),
                amount: 40,
            },
        })
        .unwrap();
    }

    // Fresh handle on the same directory; nothing shared with the writer above.
    let st = PersistentState::open(dir.path().to_str().unwrap()).unwrap();
    assert_eq!(st.last_seq().unwrap(), 1);
    let l = st.load_ledger().unwrap().unwrap();
    assert_eq!(l.balance_of(&user()), 40);
    assert_eq!(l.balance_of(&owner()), 60);
    assert_eq!(st.events(1, 10).unwrap().len(), 1);
}
