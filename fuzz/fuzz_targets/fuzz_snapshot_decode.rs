#![no_main]
use kalel_token::core::runtime::executor::{apply, Call, Op};
use kalel_token::core::state::persistent_state::MAX_SNAPSHOT_BYTES;
use kalel_token::core::token::ledger::Ledger;
use kalel_token::core::types::decode_canonical_limited;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Snapshot decoding must reject, never panic.
    let Ok(ledger) = decode_canonical_limited::<Ledger>(data, MAX_SNAPSHOT_BYTES) else {
        return;
    };
    if ledger.validate().is_err() {
        return;
    }

    // A snapshot that passes validation must stay consistent under any call.
    let owner = ledger.owner();
    let holders: Vec<_> = ledger.balances().map(|(a, b)| (*a, *b)).collect();
    for (account, balance) in holders {
        let ops = [
            Op::Burn {
                from: account,
                amount: balance.saturating_add(1),
            },
            Op::Burn {
                from: account,
                amount: balance,
            },
            Op::Transfer {
                to: account,
                amount: ledger.total_supply(),
            },
            Op::Mint {
                to: account,
                amount: ledger.cap().saturating_sub(ledger.total_supply()),
            },
        ];
        for op in ops {
            let mut l = ledger.clone();
            let before = l.clone();
            match apply(&mut l, &Call { caller: owner, op }) {
                Ok(_) => assert!(l.validate().is_ok()),
                Err(_) => assert_eq!(l, before),
            }
        }
    }
});
