extern crate std;

use soroban_sdk::{symbol_short, testutils::Events, vec, IntoVal, TryIntoVal};

use crate::events::{FundsReceived, FundsWithdrawn};
use crate::test::{setup, SEND_VALUE};

#[test]
fn test_funded_event() {
    let ctx = setup();
    let env = &ctx.env;
    let funder = ctx.funded_account(SEND_VALUE);

    ctx.client.fund(&funder, &SEND_VALUE);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("funded"), funder)
    assert_eq!(last_event.0, ctx.client.address);
    let expected_topics = vec![
        env,
        symbol_short!("funded").into_val(env),
        funder.into_val(env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsReceived = last_event.2.try_into_val(env).unwrap();
    assert_eq!(
        event_data,
        FundsReceived {
            funder: funder.clone(),
            amount: SEND_VALUE,
        }
    );
}

#[test]
fn test_withdrawn_event() {
    let ctx = setup();
    let env = &ctx.env;
    for _ in 0..3 {
        let funder = ctx.funded_account(SEND_VALUE);
        ctx.client.fund(&funder, &SEND_VALUE);
    }

    ctx.client.cheap_withdraw(&ctx.owner);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("withdrawn"), owner)
    assert_eq!(last_event.0, ctx.client.address);
    let expected_topics = vec![
        env,
        symbol_short!("withdrawn").into_val(env),
        ctx.owner.into_val(env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: FundsWithdrawn = last_event.2.try_into_val(env).unwrap();
    assert_eq!(
        event_data,
        FundsWithdrawn {
            owner: ctx.owner.clone(),
            amount: 3 * SEND_VALUE,
            funders: 3,
        }
    );
}

#[test]
fn test_rejected_contribution_emits_nothing() {
    let ctx = setup();
    let env = &ctx.env;
    let funder = ctx.funded_account(SEND_VALUE);

    let _ = ctx.client.try_fund(&funder, &1);

    let emitted_by_ledger = env
        .events()
        .all()
        .iter()
        .any(|(contract, _, _)| contract == ctx.client.address);
    assert!(!emitted_by_ledger);
}
