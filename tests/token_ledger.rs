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

use kalel_token::core::token::events::LedgerEvent;
use kalel_token::core::token::ledger::{Ledger, TokenError, TokenParams};
use kalel_token::core::types::Address;

fn owner() -> Address {
    Address::from_bytes([0xaa; 20])
}

fn user() -> Address {
    Address::from_bytes([0xbb; 20])
}

fn deploy() -> Ledger {
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

// Deployment

#[test]
fn has_the_configured_decimals() {
    assert_eq!(deploy().decimals(), 0);
}

#[test]
fn deployer_is_owner() {
    assert_eq!(deploy().owner(), owner());
}

#[test]
fn has_name_and_symbol() {
    let l = deploy();
    assert_eq!(l.name(), "KalElToken");
    assert_eq!(l.symbol(), "KET");
}

#[test]
fn initial_supply_goes_to_owner() {
    let l = deploy();
    assert_eq!(l.balance_of(&owner()), 100);
    assert_eq!(l.total_supply(), 100);
    assert_eq!(l.cap(), 1000);
    assert!(!l.paused());
}

#[test]
fn initial_supply_above_cap_is_rejected() {
    let err = Ledger::new(
        owner(),
        TokenParams {
            initial_supply: 1001,
            name: "KalElToken".to_string(),
            symbol: "KET".to_string(),
            cap: 1000,
            decimals: 0,
        },
    )
    .unwrap_err();
    assert_eq!(
        err,
        TokenError::InitialSupplyExceedsCap {
            initial_supply: 1001,
            cap: 1000
        }
    );
}

// Token operations

#[test]
fn transfer_moves_tokens() {
    let mut l = deploy();
    let ev = l.transfer(&owner(), &user(), 100).unwrap();
    assert_eq!(l.balance_of(&user()), 100);
    assert_eq!(l.balance_of(&owner()), 0);
    assert_eq!(l.total_supply(), 100);
    assert_eq!(
        ev,
        LedgerEvent::Transfer {
            from: owner(),
            to: user(),
            amount: 100
        }
    );
}

#[test]
fn approve_sets_allowance() {
    let mut l = deploy();
    l.approve(&owner(), &user(), 100).unwrap();
    assert_eq!(l.allowance(&owner(), &user()), 100);
}

#[test]
fn approve_overwrites_previous_allowance() {
    let mut l = deploy();
    l.approve(&owner(), &user(), 100).unwrap();
    l.approve(&owner(), &user(), 30).unwrap();
    assert_eq!(l.allowance(&owner(), &user()), 30);
}

#[test]
fn approve_does_not_check_balance() {
    let mut l = deploy();
    l.approve(&user(), &owner(), 1_000_000).unwrap();
    assert_eq!(l.allowance(&user(), &owner()), 1_000_000);
}

#[test]
fn transfer_from_spends_allowance() {
    let mut l = deploy();
    l.approve(&owner(), &user(), 200).unwrap();
    l.transfer_from(&user(), &owner(), &user(), 100).unwrap();
    assert_eq!(l.balance_of(&user()), 100);
    assert_eq!(l.allowance(&owner(), &user()), 100);
}

#[test]
fn transfer_from_without_allowance_fails() {
    let mut l = deploy();
    let err = l.transfer_from(&user(), &owner(), &user(), 1).unwrap_err();
    assert_eq!(err, TokenError::InsufficientAllowance { have: 0, need: 1 });
    assert_eq!(l.balance_of(&owner()), 100);
}

#[test]
fn transfer_from_beyond_balance_keeps_allowance() {
    let mut l = deploy();
    l.approve(&owner(), &user(), 500).unwrap();
    let err = l.transfer_from(&user(), &owner(), &user(), 200).unwrap_err();
    assert_eq!(err, TokenError::InsufficientBalance { have: 100, need: 200 });
    assert_eq!(l.allowance(&owner(), &user()), 500);
}

#[test]
fn transfer_beyond_balance_fails() {
    let mut l = deploy();
    let before = l.clone();
    let err = l.transfer(&owner(), &user(), 1_000_000).unwrap_err();
    assert_eq!(err.kind(), "insufficient_balance");
    assert_eq!(l, before);
}

// Minting and burning

#[test]
fn owner_can_mint() {
    let mut l = deploy();
    let ev = l.mint(&owner(), &user(), 500).unwrap();
    assert_eq!(l.balance_of(&user()), 500);
    assert_eq!(l.total_supply(), 600);
    assert_eq!(
        ev,
        LedgerEvent::Transfer {
            from: Address::ZERO,
            to: user(),
            amount: 500
        }
    );
}

#[test]
fn mint_up_to_cap_exactly() {
    let mut l = deploy();
    l.mint(&owner(), &user(), 900).unwrap();
    assert_eq!(l.total_supply(), 1000);
    assert!(l.mint(&owner(), &user(), 1).is_err());
}

#[test]
fn mint_beyond_cap_fails() {
    let mut l = deploy();
    let err = l.mint(&owner(), &user(), 100_000).unwrap_err();
    assert_eq!(
        err,
        TokenError::CapExceeded {
            cap: 1000,
            supply: 100,
            amount: 100_000
        }
    );
    assert_eq!(l.total_supply(), 100);
}

#[test]
fn non_owner_cannot_mint_or_burn() {
    let mut l = deploy();
    assert_eq!(
        l.mint(&user(), &user(), 1).unwrap_err(),
        TokenError::Unauthorized { caller: user() }
    );
    assert_eq!(
        l.burn(&user(), &owner(), 1).unwrap_err(),
        TokenError::Unauthorized { caller: user() }
    );
}

#[test]
fn owner_can_burn_from_any_account() {
    let mut l = deploy();
    l.transfer(&owner(), &user(), 100).unwrap();
    let ev = l.burn(&owner(), &user(), 50).unwrap();
    assert_eq!(l.balance_of(&user()), 50);
    assert_eq!(l.total_supply(), 50);
    assert_eq!(
        ev,
        LedgerEvent::Transfer {
            from: user(),
            to: Address::ZERO,
            amount: 50
        }
    );
}

#[test]
fn burn_beyond_balance_fails() {
    let mut l = deploy();
    let err = l.burn(&owner(), &user(), 200).unwrap_err();
    assert_eq!(err, TokenError::InsufficientBalance { have: 0, need: 200 });
    assert_eq!(l.total_supply(), 100);
}

// Pause / unpause

#[test]
fn owner_can_pause() {
    let mut l = deploy();
    l.pause(&owner()).unwrap();
    assert!(l.paused());
}

#[test]
fn owner_can_unpause() {
    let mut l = deploy();
    l.pause(&owner()).unwrap();
    l.unpause(&owner()).unwrap();
    assert!(!l.paused());
}

#[test]
fn pause_is_idempotent() {
    let mut l = deploy();
    l.pause(&owner()).unwrap();
    l.pause(&owner()).unwrap();
    assert!(l.paused());
    l.unpause(&owner()).unwrap();
    l.unpause(&owner()).unwrap();
    assert!(!l.paused());
}

#[test]
fn paused_ledger_rejects_transfers() {
    let mut l = deploy();
    l.approve(&owner(), &user(), 50).unwrap();
    l.pause(&owner()).unwrap();
    assert_eq!(
        l.transfer(&owner(), &user(), 100).unwrap_err(),
        TokenError::OperationsPaused
    );
    assert_eq!(
        l.transfer_from(&user(), &owner(), &user(), 10).unwrap_err(),
        TokenError::OperationsPaused
    );
    assert_eq!(l.balance_of(&owner()), 100);
    assert_eq!(l.allowance(&owner(), &user()), 50);
}

#[test]
fn paused_ledger_still_mints_burns_and_approves() {
    let mut l = deploy();
    l.pause(&owner()).unwrap();
    l.mint(&owner(), &user(), 10).unwrap();
    l.burn(&owner(), &user(), 5).unwrap();
    l.approve(&user(), &owner(), 5).unwrap();
    assert_eq!(l.total_supply(), 105);
}

#[test]
fn transfers_resume_after_unpause() {
    let mut l = deploy();
    l.pause(&owner()).unwrap();
    l.unpause(&owner()).unwrap();
    l.transfer(&owner(), &user(), 100).unwrap();
    assert_eq!(l.balance_of(&user()), 100);
}

#[test]
fn non_owner_cannot_pause() {
    let mut l = deploy();
    assert!(l.pause(&user()).is_err());
    assert!(!l.paused());
}

// Ownership

#[test]
fn owner_can_transfer_ownership() {
    let mut l = deploy();
    let ev = l.transfer_ownership(&owner(), &user()).unwrap();
    assert_eq!(l.owner(), user());
    assert_eq!(
        ev,
        LedgerEvent::OwnershipTransferred {
            previous_owner: owner(),
            new_owner: user()
        }
    );
}

#[test]
fn former_owner_loses_privileges() {
    let mut l = deploy();
    l.transfer_ownership(&owner(), &user()).unwrap();
    assert_eq!(
        l.mint(&owner(), &owner(), 1).unwrap_err(),
        TokenError::Unauthorized { caller: owner() }
    );
    assert!(l.pause(&owner()).is_err());
    assert!(l.transfer_ownership(&owner(), &owner()).is_err());
    l.mint(&user(), &user(), 1).unwrap();
}

#[test]
fn observed_configuration_scenario() {
    let mut l = deploy();
    assert_eq!(l.balance_of(&owner()), 100);
    l.transfer(&owner(), &user(), 100).unwrap();
    assert_eq!(l.balance_of(&user()), 100);
    assert_eq!(l.balance_of(&owner()), 0);
    l.mint(&owner(), &user(), 500).unwrap();
    assert_eq!(l.balance_of(&user()), 600);
    assert_eq!(l.total_supply(), 600);
    assert_eq!(
        l.mint(&owner(), &user(), 100_000).unwrap_err().kind(),
        "cap_exceeded"
    );
    assert_eq!(l.total_supply(), 600);
}
