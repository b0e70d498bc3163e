//! # Types
//!
//! Data shapes shared with external contracts.
//!
//! [`RoundData`] must stay field-for-field compatible with the feed
//! contract's own definition: contract values are matched by field name,
//! so any drift makes `latest_round_data` fail to decode.

use soroban_sdk::contracttype;

/// One aggregator round as reported by the price feed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RoundData {
    /// Round the answer belongs to.
    pub round_id: u64,
    /// Price in feed units (see the feed's `decimals`).
    pub answer: i128,
    /// Ledger timestamp the round opened.
    pub started_at: u64,
    /// Ledger timestamp of the last update; `0` means incomplete.
    pub updated_at: u64,
    /// Round in which `answer` was computed.
    pub answered_in_round: u64,
}
