#![allow(dead_code)]

extern crate std;

use std::vec::Vec as StdVec;

use soroban_sdk::{token, Address};

use crate::FundMeClient;

/// Observable ledger state of one contract instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub balance: i128,
    pub funders: StdVec<Address>,
    pub amounts: StdVec<i128>,
}

/// Capture balance, the full funder sequence, and the records of `known` addresses.
pub fn snapshot(
    client: &FundMeClient<'_>,
    token: &token::Client<'_>,
    known: &[Address],
) -> LedgerSnapshot {
    let count = client.get_funder_count();
    LedgerSnapshot {
        balance: token.balance(&client.address),
        funders: (0..count).map(|i| client.get_funder(&i)).collect(),
        amounts: known
            .iter()
            .map(|a| client.get_address_to_amount_funded(a))
            .collect(),
    }
}

/// INV-1: contract balance equals the sum of all funder records.
///
/// Each distinct funder in the sequence is counted once.
pub fn assert_balance_matches_records(client: &FundMeClient<'_>, token: &token::Client<'_>) {
    let count = client.get_funder_count();
    let mut distinct: StdVec<Address> = StdVec::new();
    for i in 0..count {
        let funder = client.get_funder(&i);
        if !distinct.contains(&funder) {
            distinct.push(funder);
        }
    }

    let recorded: i128 = distinct
        .iter()
        .map(|f| client.get_address_to_amount_funded(f))
        .sum();
    let balance = token.balance(&client.address);

    assert_eq!(
        balance, recorded,
        "INV-1 violated: balance {} != sum of records {}",
        balance, recorded
    );
}

/// INV-2: after a withdrawal the sequence is empty and every former record reads zero.
pub fn assert_ledger_cleared(
    client: &FundMeClient<'_>,
    token: &token::Client<'_>,
    former_funders: &[Address],
) {
    assert_eq!(
        client.get_funder_count(),
        0,
        "INV-2 violated: funder sequence not empty"
    );
    assert!(
        client.try_get_funder(&0).is_err(),
        "INV-2 violated: index 0 still readable"
    );
    for funder in former_funders {
        assert_eq!(
            client.get_address_to_amount_funded(funder),
            0,
            "INV-2 violated: record of {:?} not zeroed",
            funder
        );
    }
    assert_eq!(
        token.balance(&client.address),
        0,
        "INV-2 violated: contract still holds funds"
    );
}

/// INV-3: a contribution grows the funder's record by exactly `amount`.
pub fn assert_contribution_recorded(before: i128, after: i128, amount: i128) {
    assert_eq!(
        after,
        before + amount,
        "INV-3 violated: {} + {} != {}",
        before,
        amount,
        after
    );
}
