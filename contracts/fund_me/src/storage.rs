//! # Storage
//!
//! Typed helpers over the two Soroban storage tiers used by the ledger.
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key         | Type      | Description                          |
//! |-------------|-----------|--------------------------------------|
//! | `Owner`     | `Address` | Sole account allowed to withdraw     |
//! | `PriceFeed` | `Address` | USD price feed used for the minimum  |
//! | `Token`     | `Address` | Asset contributions are paid in      |
//!
//! All three are written once by the constructor and never again.
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                  | Type      | Description                          |
//! |----------------------|-----------|--------------------------------------|
//! | `FunderCount`        | `u32`     | Length of the funder sequence        |
//! | `Funder(index)`      | `Address` | Funder at `index`, contribution order |
//! | `AmountFunded(addr)` | `i128`    | Cumulative contribution of `addr`    |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! The funder sequence is stored one entry per index rather than as a single
//! `Vec`, so appending a contribution never rewrites the whole sequence.

use soroban_sdk::{contracttype, panic_with_error, Address, Env, Vec};

use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Withdrawal owner (Instance).
    Owner,
    /// USD price feed contract (Instance).
    PriceFeed,
    /// Contribution asset contract (Instance).
    Token,
    /// Funder sequence length (Persistent).
    FunderCount,
    /// Funder address keyed by sequence index (Persistent).
    Funder(u32),
    /// Cumulative amount keyed by funder (Persistent).
    AmountFunded(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

/// Write the immutable configuration. Only called from the constructor.
pub fn init_config(env: &Env, owner: &Address, price_feed: &Address, token: &Address) {
    let instance = env.storage().instance();
    instance.set(&DataKey::Owner, owner);
    instance.set(&DataKey::PriceFeed, price_feed);
    instance.set(&DataKey::Token, token);
    bump_instance(env);
}

pub fn get_owner(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Owner)
        .expect("owner not set")
}

pub fn get_price_feed(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::PriceFeed)
        .expect("price feed not set")
}

pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token not set")
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Current length of the funder sequence (`0` when never funded or just withdrawn).
pub fn funder_count(env: &Env) -> u32 {
    let key = DataKey::FunderCount;
    match env.storage().persistent().get::<_, u32>(&key) {
        Some(count) => {
            bump_persistent(env, &key);
            count
        }
        None => 0,
    }
}

fn set_funder_count(env: &Env, count: u32) {
    let key = DataKey::FunderCount;
    env.storage().persistent().set(&key, &count);
    bump_persistent(env, &key);
}

/// Funder at `index`, or `None` past the end of the sequence.
pub fn funder_at(env: &Env, index: u32) -> Option<Address> {
    if index >= funder_count(env) {
        return None;
    }
    let key = DataKey::Funder(index);
    let funder = env.storage().persistent().get(&key)?;
    bump_persistent(env, &key);
    Some(funder)
}

/// Append `funder` to the end of the sequence.
pub fn push_funder(env: &Env, funder: &Address) {
    let index = funder_count(env);
    let key = DataKey::Funder(index);
    env.storage().persistent().set(&key, funder);
    bump_persistent(env, &key);
    set_funder_count(env, index + 1);
}

/// Read the whole sequence into memory with a single length read.
///
/// Panics with `Error::IndexOutOfRange` if any slot below `count` is missing.
pub fn load_funders(env: &Env, count: u32) -> Vec<Address> {
    let mut funders = Vec::new(env);
    for index in 0..count {
        let key = DataKey::Funder(index);
        match env.storage().persistent().get(&key) {
            Some(funder) => funders.push_back(funder),
            None => panic_with_error!(env, Error::IndexOutOfRange),
        }
    }
    funders
}

/// Cumulative amount contributed by `funder`, `0` when absent.
pub fn amount_funded(env: &Env, funder: &Address) -> i128 {
    let key = DataKey::AmountFunded(funder.clone());
    match env.storage().persistent().get::<_, i128>(&key) {
        Some(amount) => {
            bump_persistent(env, &key);
            amount
        }
        None => 0,
    }
}

/// Add `amount` to `funder`'s record, creating it if needed. Returns the new total.
pub fn add_amount_funded(env: &Env, funder: &Address, amount: i128) -> i128 {
    let key = DataKey::AmountFunded(funder.clone());
    let total = amount_funded(env, funder) + amount;
    env.storage().persistent().set(&key, &total);
    bump_persistent(env, &key);
    total
}

/// Drop the sequence slot at `index` and zero the record of the funder it held.
pub fn clear_funder(env: &Env, index: u32, funder: &Address) {
    let persistent = env.storage().persistent();
    persistent.remove(&DataKey::AmountFunded(funder.clone()));
    persistent.remove(&DataKey::Funder(index));
}

/// Reset the sequence length to zero.
pub fn reset_funders(env: &Env) {
    env.storage().persistent().remove(&DataKey::FunderCount);
}
