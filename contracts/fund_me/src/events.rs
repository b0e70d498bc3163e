//! Contract events.
//!
//! | Topic                    | Data             |
//! |--------------------------|------------------|
//! | `("funded", funder)`     | [`FundsReceived`] |
//! | `("withdrawn", owner)`   | [`FundsWithdrawn`] |

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsReceived {
    pub funder: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FundsWithdrawn {
    pub owner: Address,
    pub amount: i128,
    /// Length of the funder sequence that was cleared.
    pub funders: u32,
}

pub fn emit_funds_received(env: &Env, funder: Address, amount: i128) {
    let topics = (symbol_short!("funded"), funder.clone());
    env.events()
        .publish(topics, FundsReceived { funder, amount });
}

pub fn emit_funds_withdrawn(env: &Env, owner: Address, amount: i128, funders: u32) {
    let topics = (symbol_short!("withdrawn"), owner.clone());
    env.events().publish(
        topics,
        FundsWithdrawn {
            owner,
            amount,
            funders,
        },
    );
}
