//! # Withdrawal
//!
//! Both variants move the whole contract balance to the owner and leave the
//! ledger empty. They differ only in how they walk the funder sequence:
//!
//! - [`withdraw`] re-reads the sequence length from storage on every step.
//! - [`cheap_withdraw`] reads the length once and works from an in-memory
//!   snapshot.
//!
//! The ledger is cleared before the outbound transfer. A failed transfer
//! panics with `Error::TransferFailed`, which rolls the clearing back.

use soroban_sdk::{panic_with_error, token, Address, Env};

use crate::access;
use crate::events;
use crate::storage;
use crate::Error;

pub fn withdraw(env: &Env, caller: &Address) {
    access::require_owner(env, caller);

    let mut index = 0;
    while index < storage::funder_count(env) {
        let funder = storage::funder_at(env, index)
            .unwrap_or_else(|| panic_with_error!(env, Error::IndexOutOfRange));
        storage::clear_funder(env, index, &funder);
        index += 1;
    }
    storage::reset_funders(env);

    pay_owner(env, caller, index);
}

pub fn cheap_withdraw(env: &Env, caller: &Address) {
    access::require_owner(env, caller);

    let count = storage::funder_count(env);
    let funders = storage::load_funders(env, count);
    for (index, funder) in funders.iter().enumerate() {
        storage::clear_funder(env, index as u32, &funder);
    }
    storage::reset_funders(env);

    pay_owner(env, caller, count);
}

/// Send the full held balance to `owner` in one checked transfer.
fn pay_owner(env: &Env, owner: &Address, funders: u32) {
    let token_client = token::Client::new(env, &storage::get_token(env));
    let contract = env.current_contract_address();
    let balance = token_client.balance(&contract);

    if balance > 0 {
        match token_client.try_transfer(&contract, owner, &balance) {
            Ok(Ok(())) => {}
            _ => panic_with_error!(env, Error::TransferFailed),
        }
    }

    events::emit_funds_withdrawn(env, owner.clone(), balance, funders);
}
