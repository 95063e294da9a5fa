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

//! Capped, pausable, ownable token ledger.
//!
//! Every operation checks all of its preconditions before touching state, so a
//! rejected call leaves the ledger exactly as it was. Invariants:
//! - sum of `balances` == `total_supply`
//! - `total_supply` <= `cap`
//! - zero balances and zero allowances are never stored

use crate::core::token::events::LedgerEvent;
use crate::core::types::{Address, Amount, TokenSettings};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Ledger rejections.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Caller is not the owner for an owner-only operation.
    #[error("caller {caller} is not the owner")]
    Unauthorized {
        /// Rejected caller.
        caller: Address,
    },
    /// Debit would take a balance below zero.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Current balance.
        have: Amount,
        /// Requested debit.
        need: Amount,
    },
    /// Delegated transfer would exceed the approved allowance.
    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance {
        /// Remaining allowance.
        have: Amount,
        /// Requested spend.
        need: Amount,
    },
    /// Mint would push total supply above the cap.
    #[error("cap exceeded: cap {cap}, supply {supply}, mint {amount}")]
    CapExceeded {
        /// Immutable cap.
        cap: Amount,
        /// Supply before the mint.
        supply: Amount,
        /// Requested mint.
        amount: Amount,
    },
    /// Transfer-class call while paused.
    #[error("token operations are paused")]
    OperationsPaused,
    /// Construction with `initial_supply > cap`.
    #[error("initial supply {initial_supply} exceeds cap {cap}")]
    InitialSupplyExceedsCap {
        /// Requested initial supply.
        initial_supply: Amount,
        /// Requested cap.
        cap: Amount,
    },
}

/// Broken ledger invariant found in externally supplied state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantError {
    /// Sum of balances differs from `total_supply` (or overflows).
    #[error("balances sum to {sum:?}, total supply is {total_supply}")]
    SupplyMismatch {
        /// Sum of stored balances, `None` on overflow.
        sum: Option<Amount>,
        /// Recorded total supply.
        total_supply: Amount,
    },
    /// `total_supply > cap`.
    #[error("total supply {total_supply} exceeds cap {cap}")]
    AboveCap {
        /// Recorded total supply.
        total_supply: Amount,
        /// Recorded cap.
        cap: Amount,
    },
    /// A zero balance or allowance is stored.
    #[error("zero entry stored")]
    ZeroEntry,
}

impl TokenError {
    /// Stable machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Unauthorized { .. } => "unauthorized",
            TokenError::InsufficientBalance { .. } => "insufficient_balance",
            TokenError::InsufficientAllowance { .. } => "insufficient_allowance",
            TokenError::CapExceeded { .. } => "cap_exceeded",
            TokenError::OperationsPaused => "operations_paused",
            TokenError::InitialSupplyExceedsCap { .. } => "initial_supply_exceeds_cap",
        }
    }
}

/// Constructor arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenParams {
    /// Supply credited to the deployer.
    pub initial_supply: Amount,
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Immutable supply ceiling.
    pub cap: Amount,
    /// Display precision.
    pub decimals: u8,
}

impl From<&TokenSettings> for TokenParams {
    fn from(s: &TokenSettings) -> Self {
        Self {
            initial_supply: Amount::from(s.initial_supply),
            name: s.name.clone(),
            symbol: s.symbol.clone(),
            cap: Amount::from(s.cap),
            decimals: s.decimals,
        }
    }
}

/// Read-only summary of ledger metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    /// Token name.
    pub name: String,
    /// Token symbol.
    pub symbol: String,
    /// Display precision.
    pub decimals: u8,
    /// Supply ceiling.
    pub cap: Amount,
    /// Current supply.
    pub total_supply: Amount,
    /// Current owner.
    pub owner: Address,
    /// Pause flag.
    pub paused: bool,
}

/// Token ledger state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    name: String,
    symbol: String,
    decimals: u8,
    cap: Amount,
    total_supply: Amount,
    paused: bool,
    owner: Address,
    balances: BTreeMap<Address, Amount>,
    /// Keyed by (owner, spender).
    allowances: BTreeMap<(Address, Address), Amount>,
}

impl Ledger {
    /// Construct a ledger owned by `deployer`, crediting it the initial supply.
    pub fn new(deployer: Address, params: TokenParams) -> Result<Self, TokenError> {
        if params.initial_supply > params.cap {
            return Err(TokenError::InitialSupplyExceedsCap {
                initial_supply: params.initial_supply,
                cap: params.cap,
            });
        }
        let mut balances = BTreeMap::new();
        if params.initial_supply > 0 {
            balances.insert(deployer, params.initial_supply);
        }
        Ok(Self {
            name: params.name,
            symbol: params.symbol,
            decimals: params.decimals,
            cap: params.cap,
            total_supply: params.initial_supply,
            paused: false,
            owner: deployer,
            balances,
            allowances: BTreeMap::new(),
        })
    }

    /// Token name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Token symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Display precision.
    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Immutable supply ceiling.
    pub fn cap(&self) -> Amount {
        self.cap
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Pause flag.
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// Balance of `account` (0 if never credited).
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Remaining amount `spender` may move out of `owner`.
    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// Iterate non-zero balances in address order.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Metadata snapshot.
    pub fn info(&self) -> TokenInfo {
        TokenInfo {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            cap: self.cap,
            total_supply: self.total_supply,
            owner: self.owner,
            paused: self.paused,
        }
    }

    /// Re-check the invariants every operation relies on.
    pub fn validate(&self) -> Result<(), InvariantError> {
        if self.total_supply > self.cap {
            return Err(InvariantError::AboveCap {
                total_supply: self.total_supply,
                cap: self.cap,
            });
        }
        let zero_balance = self.balances.values().any(|b| *b == 0);
        let zero_allowance = self.allowances.values().any(|a| *a == 0);
        if zero_balance || zero_allowance {
            return Err(InvariantError::ZeroEntry);
        }
        let sum = self
            .balances
            .values()
            .try_fold(0 as Amount, |acc, b| acc.checked_add(*b));
        if sum != Some(self.total_supply) {
            return Err(InvariantError::SupplyMismatch {
                sum,
                total_supply: self.total_supply,
            });
        }
        Ok(())
    }

    /// Move `amount` from the caller to `to`.
    pub fn transfer(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<LedgerEvent, TokenError> {
        self.ensure_not_paused()?;
        self.move_balance(caller, to, amount)?;
        Ok(LedgerEvent::Transfer {
            from: *caller,
            to: *to,
            amount,
        })
    }

    /// Set the caller's allowance for `spender`, replacing any previous value.
    pub fn approve(
        &mut self,
        caller: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<LedgerEvent, TokenError> {
        self.set_allowance(*caller, *spender, amount);
        Ok(LedgerEvent::Approval {
            owner: *caller,
            spender: *spender,
            amount,
        })
    }

    /// Move `amount` from `from` to `to`, spending the caller's allowance.
    pub fn transfer_from(
        &mut self,
        caller: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<LedgerEvent, TokenError> {
        self.ensure_not_paused()?;
        let remaining = self.allowance(from, caller);
        if remaining < amount {
            return Err(TokenError::InsufficientAllowance {
                have: remaining,
                need: amount,
            });
        }
        self.move_balance(from, to, amount)?;
        self.set_allowance(*from, *caller, remaining - amount);
        Ok(LedgerEvent::Transfer {
            from: *from,
            to: *to,
            amount,
        })
    }

    /// Create `amount` new tokens for `to`. Owner only, bounded by the cap.
    pub fn mint(
        &mut self,
        caller: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<LedgerEvent, TokenError> {
        self.ensure_owner(caller)?;
        let supply = self
            .total_supply
            .checked_add(amount)
            .filter(|s| *s <= self.cap)
            .ok_or(TokenError::CapExceeded {
                cap: self.cap,
                supply: self.total_supply,
                amount,
            })?;
        // supply <= cap bounds every individual balance (see `validate`), so this add cannot overflow.
        let bal = self.balance_of(to) + amount;
        self.set_balance(*to, bal);
        self.total_supply = supply;
        Ok(LedgerEvent::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        })
    }

    /// Destroy `amount` tokens held by `from`. Owner only.
    pub fn burn(
        &mut self,
        caller: &Address,
        from: &Address,
        amount: Amount,
    ) -> Result<LedgerEvent, TokenError> {
        self.ensure_owner(caller)?;
        let have = self.balance_of(from);
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount });
        }
        let supply = self
            .total_supply
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                have: self.total_supply,
                need: amount,
            })?;
        self.set_balance(*from, have - amount);
        self.total_supply = supply;
        Ok(LedgerEvent::Transfer {
            from: *from,
            to: Address::ZERO,
            amount,
        })
    }

    /// Reject transfer-class calls until [`Ledger::unpause`]. Idempotent.
    pub fn pause(&mut self, caller: &Address) -> Result<LedgerEvent, TokenError> {
        self.ensure_owner(caller)?;
        self.paused = true;
        Ok(LedgerEvent::Paused { account: *caller })
    }

    /// Clear the pause flag. Idempotent.
    pub fn unpause(&mut self, caller: &Address) -> Result<LedgerEvent, TokenError> {
        self.ensure_owner(caller)?;
        self.paused = false;
        Ok(LedgerEvent::Unpaused { account: *caller })
    }

    /// Hand ownership to `new_owner` immediately.
    pub fn transfer_ownership(
        &mut self,
        caller: &Address,
        new_owner: &Address,
    ) -> Result<LedgerEvent, TokenError> {
        self.ensure_owner(caller)?;
        let previous_owner = self.owner;
        self.owner = *new_owner;
        Ok(LedgerEvent::OwnershipTransferred {
            previous_owner,
            new_owner: *new_owner,
        })
    }

    fn ensure_owner(&self, caller: &Address) -> Result<(), TokenError> {
        if *caller != self.owner {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    fn ensure_not_paused(&self) -> Result<(), TokenError> {
        if self.paused {
            return Err(TokenError::OperationsPaused);
        }
        Ok(())
    }

    fn move_balance(
        &mut self,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let have = self.balance_of(from);
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount });
        }
        self.set_balance(*from, have - amount);
        let credit = self.balance_of(to) + amount;
        self.set_balance(*to, credit);
        Ok(())
    }

    fn set_balance(&mut self, account: Address, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, amount);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }
}
