//! Off-chain projection of the FundMe ledger.
//!
//! Replays stored events in ledger order: every `funded` event grows the
//! funder's running total and the sequence length, every `withdrawn` event
//! resets both, matching the contract's own end state after a withdrawal.

use serde::Serialize;

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, EventRecord};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunderTotal {
    pub address: String,
    /// Decimal string of the cumulative `i128` amount.
    pub amount: String,
    pub contributions: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithdrawalSummary {
    pub owner: Option<String>,
    pub amount: String,
    pub funders: Option<i64>,
    pub ledger: i64,
}

/// Ledger state as seen by the indexer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    /// Sum of contributions since the last withdrawal.
    pub balance: String,
    /// Length of the on-chain funder sequence.
    pub sequence_len: u32,
    /// Distinct funders in first-contribution order.
    pub funders: Vec<FunderTotal>,
    pub last_withdrawal: Option<WithdrawalSummary>,
}

struct Running {
    address: String,
    amount: i128,
    contributions: u32,
}

/// Build the current [`LedgerView`] from events sorted by ledger ascending.
pub fn project(events: &[EventRecord]) -> Result<LedgerView> {
    let mut balance: i128 = 0;
    let mut sequence_len: u32 = 0;
    let mut funders: Vec<Running> = Vec::new();
    let mut last_withdrawal = None;

    for ev in events {
        match EventKind::from_topic(&ev.event_type) {
            EventKind::Funded => {
                let amount = parse_amount(ev)?;
                let address = ev.actor.clone().unwrap_or_default();
                match funders.iter_mut().find(|f| f.address == address) {
                    Some(f) => {
                        f.amount += amount;
                        f.contributions += 1;
                    }
                    None => funders.push(Running {
                        address,
                        amount,
                        contributions: 1,
                    }),
                }
                balance += amount;
                sequence_len += 1;
            }
            EventKind::Withdrawn => {
                last_withdrawal = Some(WithdrawalSummary {
                    owner: ev.actor.clone(),
                    amount: parse_amount(ev)?.to_string(),
                    funders: ev.funders,
                    ledger: ev.ledger,
                });
                balance = 0;
                sequence_len = 0;
                funders.clear();
            }
            EventKind::Unknown => {}
        }
    }

    Ok(LedgerView {
        balance: balance.to_string(),
        sequence_len,
        funders: funders
            .into_iter()
            .map(|f| FunderTotal {
                address: f.address,
                amount: f.amount.to_string(),
                contributions: f.contributions,
            })
            .collect(),
        last_withdrawal,
    })
}

/// Amount of a `funded` or `withdrawn` record. Both always carry one on chain.
fn parse_amount(ev: &EventRecord) -> Result<i128> {
    let raw = ev.amount.as_deref().ok_or_else(|| IndexerError::InvalidAmount {
        id: ev.id,
        value: "<missing>".to_string(),
    })?;
    raw.parse().map_err(|_| IndexerError::InvalidAmount {
        id: ev.id,
        value: raw.to_string(),
    })
}
