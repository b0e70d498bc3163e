//! # FundMe Contract
//!
//! A crowdfunding ledger. Anyone may contribute at least [`MINIMUM_USD`]
//! worth of the contribution asset (priced through a USD feed); the single
//! owner bound at deployment may withdraw everything collected, which
//! resets the ledger.
//!
//! | Phase      | Entry Point(s)                                      |
//! |------------|-----------------------------------------------------|
//! | Deployment | `__constructor`                                     |
//! | Funding    | [`FundMe::fund`], [`FundMe::receive`], [`FundMe::fallback`] |
//! | Withdrawal | [`FundMe::withdraw`], [`FundMe::cheap_withdraw`]    |
//! | Queries    | `get_owner`, `get_price_feed`, `get_token`, `get_funder`, `get_funder_count`, `get_address_to_amount_funded`, `get_conversion_rate`, `minimum_usd`, `get_version` |
//!
//! ## Architecture
//!
//! Funding lives in [`ledger`], withdrawals in [`withdrawal`], the owner
//! check in [`access`] and price conversion in [`price_feed`]. Storage
//! access is fully delegated to `storage`. This file only holds the entry
//! points.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, panic_with_error, Address, Bytes, Env};

pub mod access;
pub mod events;
pub mod ledger;
pub mod price_feed;
mod storage;
mod types;
pub mod withdrawal;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;
#[cfg(test)]
mod test_withdraw;

pub use price_feed::{MINIMUM_USD, NATIVE_DECIMALS, USD_DECIMALS};
pub use types::RoundData;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    InsufficientContribution = 1,
    Unauthorized = 2,
    TransferFailed = 3,
    IndexOutOfRange = 4,
    InvalidPrice = 5,
    ConversionOverflow = 6,
}

#[contract]
pub struct FundMe;

#[contractimpl]
impl FundMe {
    /// Bind the owner, the USD price feed and the contribution asset.
    ///
    /// `owner` must sign the deployment. None of the three can change afterwards.
    pub fn __constructor(env: Env, owner: Address, price_feed: Address, token: Address) {
        owner.require_auth();
        storage::init_config(&env, &owner, &price_feed, &token);
    }

    // ─────────────────────────────────────────────────────────
    // Funding
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` of the contribution asset.
    ///
    /// Panics with `Error::InsufficientContribution` when `amount` is worth
    /// less than [`MINIMUM_USD`].
    pub fn fund(env: Env, funder: Address, amount: i128) {
        ledger::fund(&env, &funder, amount);
    }

    /// Plain value transfer with no call data. Same as [`FundMe::fund`].
    pub fn receive(env: Env, funder: Address, amount: i128) {
        ledger::fund(&env, &funder, amount);
    }

    /// Value transfer carrying unrecognised call data. `data` is ignored;
    /// otherwise the same as [`FundMe::fund`].
    pub fn fallback(env: Env, funder: Address, amount: i128, _data: Bytes) {
        ledger::fund(&env, &funder, amount);
    }

    // ─────────────────────────────────────────────────────────
    // Withdrawal
    // ─────────────────────────────────────────────────────────

    /// Send the whole balance to the owner and clear the ledger.
    pub fn withdraw(env: Env, caller: Address) {
        withdrawal::withdraw(&env, &caller);
    }

    /// Same outcome as [`FundMe::withdraw`], with fewer storage reads.
    pub fn cheap_withdraw(env: Env, caller: Address) {
        withdrawal::cheap_withdraw(&env, &caller);
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_owner(env: Env) -> Address {
        storage::get_owner(&env)
    }

    pub fn get_price_feed(env: Env) -> Address {
        storage::get_price_feed(&env)
    }

    pub fn get_token(env: Env) -> Address {
        storage::get_token(&env)
    }

    /// Funder at `index` in contribution order.
    ///
    /// Panics with `Error::IndexOutOfRange` past the end of the sequence.
    pub fn get_funder(env: Env, index: u32) -> Address {
        storage::funder_at(&env, index)
            .unwrap_or_else(|| panic_with_error!(&env, Error::IndexOutOfRange))
    }

    pub fn get_funder_count(env: Env) -> u32 {
        storage::funder_count(&env)
    }

    /// Cumulative amount contributed by `funder` since the last withdrawal.
    pub fn get_address_to_amount_funded(env: Env, funder: Address) -> i128 {
        storage::amount_funded(&env, &funder)
    }

    /// USD value (18 decimals) of `amount` at the current feed price.
    pub fn get_conversion_rate(env: Env, amount: i128) -> i128 {
        price_feed::get_conversion_rate(&env, amount)
    }

    pub fn minimum_usd(_env: Env) -> i128 {
        MINIMUM_USD
    }

    pub fn get_version(env: Env) -> u32 {
        price_feed::get_version(&env)
    }
}
