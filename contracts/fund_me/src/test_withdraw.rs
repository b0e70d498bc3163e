extern crate std;

use std::vec::Vec as StdVec;

use soroban_sdk::{testutils::Address as _, Address, Env, String};

use crate::invariants::{self, snapshot};
use crate::storage::DataKey;
use crate::test::{contract_error, setup, setup_with_owner, TestContext, SEND_VALUE};
use crate::{Error, FundMeClient};

/// Issue a withdrawal through one of the two variants.
#[derive(Clone, Copy, Debug)]
enum Variant {
    Naive,
    Cheap,
}

impl Variant {
    fn call(self, client: &FundMeClient<'_>, caller: &Address) {
        match self {
            Variant::Naive => client.withdraw(caller),
            Variant::Cheap => client.cheap_withdraw(caller),
        }
    }

    fn try_call(self, client: &FundMeClient<'_>, caller: &Address) -> Result<(), Error> {
        let result = match self {
            Variant::Naive => client.try_withdraw(caller),
            Variant::Cheap => client.try_cheap_withdraw(caller),
        };
        match result {
            Ok(_) => Ok(()),
            Err(Ok(e)) => Err(Error::try_from(e)
                .unwrap_or_else(|_| panic!("not a ledger error: {:?}", e))),
            Err(Err(e)) => panic!("unexpected invoke error: {:?}", e),
        }
    }
}

const VARIANTS: [Variant; 2] = [Variant::Naive, Variant::Cheap];

fn fund_many(ctx: &TestContext, n: usize) -> StdVec<Address> {
    (0..n)
        .map(|_| {
            let funder = ctx.funded_account(SEND_VALUE);
            ctx.client.fund(&funder, &SEND_VALUE);
            funder
        })
        .collect()
}

#[test]
fn test_withdraw_from_single_funder() {
    for variant in VARIANTS {
        let ctx = setup();
        let funders = fund_many(&ctx, 1);

        let starting_contract = ctx.token.balance(&ctx.client.address);
        let starting_owner = ctx.token.balance(&ctx.owner);

        variant.call(&ctx.client, &ctx.owner);

        let ending_contract = ctx.token.balance(&ctx.client.address);
        let ending_owner = ctx.token.balance(&ctx.owner);
        assert_eq!(ending_contract, 0, "{:?}", variant);
        assert_eq!(
            starting_contract + starting_owner,
            ending_owner,
            "{:?}",
            variant
        );
        invariants::assert_ledger_cleared(&ctx.client, &ctx.token, &funders);
    }
}

#[test]
fn test_withdraw_from_multiple_funders() {
    for variant in VARIANTS {
        let ctx = setup();
        let funders = fund_many(&ctx, 5);
        invariants::assert_balance_matches_records(&ctx.client, &ctx.token);

        let starting_contract = ctx.token.balance(&ctx.client.address);
        assert_eq!(starting_contract, 5 * SEND_VALUE);

        variant.call(&ctx.client, &ctx.owner);

        assert_eq!(ctx.token.balance(&ctx.owner), starting_contract);
        assert_eq!(
            ctx.client.try_get_funder(&0),
            Err(Ok(contract_error(Error::IndexOutOfRange)))
        );
        for funder in &funders {
            assert_eq!(ctx.client.get_address_to_amount_funded(funder), 0);
        }
        invariants::assert_ledger_cleared(&ctx.client, &ctx.token, &funders);
        invariants::assert_balance_matches_records(&ctx.client, &ctx.token);
    }
}

#[test]
fn test_withdraw_clears_repeat_funders() {
    for variant in VARIANTS {
        let ctx = setup();
        let funder = ctx.funded_account(3 * SEND_VALUE);
        for _ in 0..3 {
            ctx.client.fund(&funder, &SEND_VALUE);
        }
        assert_eq!(ctx.client.get_funder_count(), 3);

        variant.call(&ctx.client, &ctx.owner);

        assert_eq!(ctx.token.balance(&ctx.owner), 3 * SEND_VALUE);
        invariants::assert_ledger_cleared(&ctx.client, &ctx.token, &[funder]);
    }
}

#[test]
fn test_non_owner_cannot_withdraw() {
    for variant in VARIANTS {
        let ctx = setup();
        let funders = fund_many(&ctx, 2);
        let attacker = funders[0].clone();
        let before = snapshot(&ctx.client, &ctx.token, &funders);

        assert_eq!(
            variant.try_call(&ctx.client, &attacker),
            Err(Error::Unauthorized)
        );

        assert_eq!(snapshot(&ctx.client, &ctx.token, &funders), before);
        assert_eq!(ctx.token.balance(&attacker), 0);
    }
}

#[test]
fn test_withdraw_and_cheap_withdraw_are_equivalent() {
    let ctx = setup();
    let naive = &ctx.client;
    let cheap = &ctx.deploy_sibling();

    let a = ctx.funded_account(4 * SEND_VALUE);
    let b = ctx.funded_account(2 * SEND_VALUE);
    let c = ctx.funded_account(2 * SEND_VALUE);
    let known = [a.clone(), b.clone(), c.clone()];

    // Same contributions, same order, repeats included.
    for client in [naive, cheap] {
        client.fund(&a, &SEND_VALUE);
        client.fund(&b, &SEND_VALUE);
        client.fund(&a, &SEND_VALUE);
        client.receive(&c, &SEND_VALUE);
    }
    assert_eq!(
        snapshot(naive, &ctx.token, &known),
        snapshot(cheap, &ctx.token, &known)
    );

    // A stranger fails identically on both.
    let stranger = Address::generate(&ctx.env);
    assert_eq!(
        Variant::Naive.try_call(naive, &stranger),
        Variant::Cheap.try_call(cheap, &stranger)
    );

    let owner_before = ctx.token.balance(&ctx.owner);
    Variant::Naive.call(naive, &ctx.owner);
    let naive_paid = ctx.token.balance(&ctx.owner) - owner_before;
    Variant::Cheap.call(cheap, &ctx.owner);
    let cheap_paid = ctx.token.balance(&ctx.owner) - owner_before - naive_paid;

    assert_eq!(naive_paid, cheap_paid);
    assert_eq!(
        snapshot(naive, &ctx.token, &known),
        snapshot(cheap, &ctx.token, &known)
    );
}

#[test]
fn test_withdraw_with_empty_ledger_succeeds() {
    for variant in VARIANTS {
        let ctx = setup();

        variant.call(&ctx.client, &ctx.owner);

        assert_eq!(ctx.token.balance(&ctx.owner), 0);
        invariants::assert_ledger_cleared(&ctx.client, &ctx.token, &[]);
    }
}

#[test]
fn test_second_withdraw_moves_nothing() {
    for variant in VARIANTS {
        let ctx = setup();
        fund_many(&ctx, 2);

        variant.call(&ctx.client, &ctx.owner);
        variant.call(&ctx.client, &ctx.owner);

        assert_eq!(ctx.token.balance(&ctx.owner), 2 * SEND_VALUE);
    }
}

#[test]
fn test_funding_resumes_after_withdraw() {
    for variant in VARIANTS {
        let ctx = setup();
        let earlier = fund_many(&ctx, 2);
        variant.call(&ctx.client, &ctx.owner);

        let later = ctx.funded_account(SEND_VALUE);
        ctx.client.fund(&later, &SEND_VALUE);

        assert_eq!(ctx.client.get_funder_count(), 1);
        assert_eq!(ctx.client.get_funder(&0), later);
        assert_eq!(ctx.client.get_address_to_amount_funded(&earlier[0]), 0);
        invariants::assert_balance_matches_records(&ctx.client, &ctx.token);
    }
}

#[test]
fn test_withdraw_sweeps_directly_transferred_funds() {
    for variant in VARIANTS {
        let ctx = setup();
        fund_many(&ctx, 1);
        let donor = ctx.funded_account(SEND_VALUE);
        ctx.token.transfer(&donor, &ctx.client.address, &SEND_VALUE);

        variant.call(&ctx.client, &ctx.owner);

        assert_eq!(ctx.token.balance(&ctx.owner), 2 * SEND_VALUE);
        assert_eq!(ctx.token.balance(&ctx.client.address), 0);
    }
}

#[test]
fn test_failed_transfer_rolls_back_withdraw() {
    for variant in VARIANTS {
        let env = Env::default();
        env.mock_all_auths();
        // A classic account with no trustline for the asset cannot receive it.
        let owner = Address::from_string(&String::from_str(
            &env,
            "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF",
        ));
        let ctx = setup_with_owner(env, owner);
        let funders = fund_many(&ctx, 3);
        let before = snapshot(&ctx.client, &ctx.token, &funders);

        assert_eq!(
            variant.try_call(&ctx.client, &ctx.owner),
            Err(Error::TransferFailed)
        );

        assert_eq!(snapshot(&ctx.client, &ctx.token, &funders), before);
        assert_eq!(ctx.client.get_funder_count(), 3);
        invariants::assert_balance_matches_records(&ctx.client, &ctx.token);
    }
}

#[test]
fn test_missing_funder_slot_fails_both_variants() {
    for variant in VARIANTS {
        let ctx = setup();
        let funders = fund_many(&ctx, 3);
        ctx.env.as_contract(&ctx.client.address, || {
            ctx.env.storage().persistent().remove(&DataKey::Funder(1));
        });

        assert_eq!(
            variant.try_call(&ctx.client, &ctx.owner),
            Err(Error::IndexOutOfRange),
            "{:?}",
            variant
        );

        // Nothing was cleared or paid out.
        assert_eq!(ctx.client.get_funder_count(), 3);
        assert_eq!(ctx.client.get_funder(&0), funders[0]);
        assert_eq!(ctx.client.get_funder(&2), funders[2]);
        for funder in &funders {
            assert_eq!(ctx.client.get_address_to_amount_funded(funder), SEND_VALUE);
        }
        assert_eq!(ctx.token.balance(&ctx.client.address), 3 * SEND_VALUE);
        assert_eq!(ctx.token.balance(&ctx.owner), 0);
    }
}
