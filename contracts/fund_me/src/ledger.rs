//! # Funding Ledger
//!
//! The single funding routine behind `fund`, `receive` and `fallback`.
//!
//! An accepted contribution:
//!
//! 1. pulls `amount` of the contribution asset from `funder` into the contract,
//! 2. adds `amount` to the funder's cumulative record,
//! 3. appends `funder` to the funder sequence.
//!
//! Any failure panics, so none of the three take effect.

use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::events;
use crate::price_feed::{self, MINIMUM_USD};
use crate::storage;
use crate::Error;

pub fn fund(env: &Env, funder: &Address, amount: i128) {
    funder.require_auth();

    if amount <= 0 || price_feed::get_conversion_rate(env, amount) < MINIMUM_USD {
        panic_with_error!(env, Error::InsufficientContribution);
    }

    let token_client = token::Client::new(env, &storage::get_token(env));
    token_client.transfer(funder, &env.current_contract_address(), &amount);

    storage::add_amount_funded(env, funder, amount);
    // Append on every contribution, repeat funders included.
    storage::push_funder(env, funder);

    events::emit_funds_received(env, funder.clone(), amount);
}
