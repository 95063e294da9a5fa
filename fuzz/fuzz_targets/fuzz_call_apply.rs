// Copyright (c) 2026 KalEl Token
// Licensed under the Apache-2.0 License.

#![no_main]
#![forbid(unsafe_code)]

use kalel_token::core::runtime::executor::{apply, Call};
use kalel_token::core::token::ledger::{Ledger, TokenParams};
use kalel_token::core::types::{decode_canonical_limited, Address, Amount};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(mut ledger) = Ledger::new(
        Address::from_bytes([1u8; 20]),
        TokenParams {
            initial_supply: 100,
            name: "KalElToken".to_string(),
            symbol: "KET".to_string(),
            cap: 1000,
            decimals: 0,
        },
    ) else {
        return;
    };

    // Treat the input as a stream of length-prefixed canonical calls.
    let mut rest = data;
    while let Some((&len, tail)) = rest.split_first() {
        let len = (len as usize).min(tail.len());
        let (frame, next) = tail.split_at(len);
        rest = next;
        if let Ok(call) = decode_canonical_limited::<Call>(frame, 256) {
            let _ = apply(&mut ledger, &call);
        }
        let sum: Amount = ledger.balances().map(|(_, b)| *b).sum();
        assert_eq!(sum, ledger.total_supply());
        assert!(ledger.total_supply() <= ledger.cap());
    }
});
