//! # Mock Price Feed
//!
//! Aggregator-style price feed used on development networks and in tests,
//! where no real USD feed exists. It answers the same read interface the
//! `fund_me` ledger consumes (`decimals`, `description`, `version`,
//! `latest_round_data`) and lets anyone push a new answer.
//!
//! Every round ever written is kept so `get_round_data` can replay it.

#![no_std]

use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, panic_with_error, Env, String,
};


const VERSION: u32 = 0;

const DAY_IN_LEDGERS: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    RoundNotFound = 1,
}

/// One answer of the feed, laid out like an aggregator round.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    pub round_id: u64,
    pub answer: i128,
    pub started_at: u64,
    pub updated_at: u64,
    pub answered_in_round: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
enum DataKey {
    Decimals,
    LatestRound,
    Round(u64),
}

#[contract]
pub struct MockPriceFeed;

#[contractimpl]
impl MockPriceFeed {
    /// Deploy the feed with a fixed precision and an opening answer.
    pub fn __constructor(env: Env, decimals: u32, initial_answer: i128) {
        env.storage().instance().set(&DataKey::Decimals, &decimals);
        Self::update_answer(env, initial_answer);
    }

    /// Push `answer` as a new round stamped with the current ledger time.
    pub fn update_answer(env: Env, answer: i128) {
        let round_id = latest_round_id(&env) + 1;
        let now = env.ledger().timestamp();
        write_round(
            &env,
            &RoundData {
                round_id,
                answer,
                started_at: now,
                updated_at: now,
                answered_in_round: round_id,
            },
        );
    }

    /// Overwrite the latest round with fully caller-chosen values.
    ///
    /// Used to simulate incomplete or stale rounds (`updated_at == 0`).
    pub fn update_round_data(
        env: Env,
        round_id: u64,
        answer: i128,
        updated_at: u64,
        started_at: u64,
    ) {
        write_round(
            &env,
            &RoundData {
                round_id,
                answer,
                started_at,
                updated_at,
                answered_in_round: round_id,
            },
        );
    }

    pub fn decimals(env: Env) -> u32 {
        bump_instance(&env);
        env.storage().instance().get(&DataKey::Decimals).unwrap_or(0)
    }

    pub fn description(env: Env) -> String {
        String::from_str(&env, "v0.8/tests/MockV3Aggregator.sol")
    }

    pub fn version(_env: Env) -> u32 {
        VERSION
    }

    pub fn latest_round_data(env: Env) -> RoundData {
        let round_id = latest_round_id(&env);
        Self::get_round_data(env, round_id)
    }

    pub fn get_round_data(env: Env, round_id: u64) -> RoundData {
        bump_instance(&env);
        env.storage()
            .instance()
            .get(&DataKey::Round(round_id))
            .unwrap_or_else(|| panic_with_error!(&env, Error::RoundNotFound))
    }
}

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

fn latest_round_id(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::LatestRound)
        .unwrap_or(0)
}

fn write_round(env: &Env, round: &RoundData) {
    env.storage()
        .instance()
        .set(&DataKey::Round(round.round_id), round);
    env.storage()
        .instance()
        .set(&DataKey::LatestRound, &round.round_id);
    bump_instance(env);
}
