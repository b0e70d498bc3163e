//! # Price Feed Adapter
//!
//! Turns an amount of the contribution asset into its USD value using the
//! feed bound at construction.
//!
//! All values are integers in fixed point:
//!
//! | Quantity         | Decimals                     |
//! |------------------|------------------------------|
//! | Asset amount     | [`NATIVE_DECIMALS`] (stroops) |
//! | Feed answer      | feed-reported `decimals()`   |
//! | USD value        | [`USD_DECIMALS`]             |
//!
//! so `usd = answer * amount * 10^(USD_DECIMALS - feed_decimals - NATIVE_DECIMALS)`,
//! dividing instead when the exponent is negative.

use soroban_sdk::{contractclient, panic_with_error, Env, String};

use crate::storage;
use crate::types::RoundData;
use crate::Error;

/// Decimals of the contribution asset's smallest unit.
pub const NATIVE_DECIMALS: u32 = 7;

/// Decimals of every USD value the ledger produces or compares.
pub const USD_DECIMALS: u32 = 18;

/// Smallest accepted contribution: 50 USD.
pub const MINIMUM_USD: i128 = 50 * 10i128.pow(USD_DECIMALS);

/// Read interface of an aggregator-style USD price feed.
#[contractclient(name = "PriceFeedClient")]
pub trait PriceFeed {
    fn decimals(env: Env) -> u32;
    fn description(env: Env) -> String;
    fn version(env: Env) -> u32;
    fn latest_round_data(env: Env) -> RoundData;
}

fn client(env: &Env) -> PriceFeedClient<'_> {
    PriceFeedClient::new(env, &storage::get_price_feed(env))
}

/// Latest usable answer and its decimals.
///
/// Fails closed with `Error::InvalidPrice` on a non-positive answer, an
/// incomplete round, or an answer carried over from an earlier round.
pub fn get_price(env: &Env) -> (i128, u32) {
    let feed = client(env);
    let round = feed.latest_round_data();

    if round.answer <= 0
        || round.updated_at == 0
        || round.answered_in_round < round.round_id
    {
        panic_with_error!(env, Error::InvalidPrice);
    }

    (round.answer, feed.decimals())
}

/// USD value (18 decimals) of `amount` at the current feed price.
pub fn get_conversion_rate(env: &Env, amount: i128) -> i128 {
    let (price, feed_decimals) = get_price(env);
    to_usd(price, feed_decimals, amount)
        .unwrap_or_else(|| panic_with_error!(env, Error::ConversionOverflow))
}

/// Version reported by the bound feed.
pub fn get_version(env: &Env) -> u32 {
    client(env).version()
}

/// Scale exponent between `price * amount` and an 18-decimal USD value.
fn scale_exponent(feed_decimals: u32) -> i64 {
    i64::from(USD_DECIMALS) - i64::from(feed_decimals) - i64::from(NATIVE_DECIMALS)
}

/// Pure conversion; `None` on overflow.
pub(crate) fn to_usd(price: i128, feed_decimals: u32, amount: i128) -> Option<i128> {
    let raw = price.checked_mul(amount)?;
    let exponent = scale_exponent(feed_decimals);
    let scale = 10i128.checked_pow(u32::try_from(exponent.unsigned_abs()).ok()?)?;
    if exponent >= 0 {
        raw.checked_mul(scale)
    } else {
        raw.checked_div(scale)
    }
}
