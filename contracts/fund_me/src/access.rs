//! Owner gate for the withdrawal entry points.

use soroban_sdk::{panic_with_error, Address, Env};

use crate::storage;
use crate::Error;

/// Panics with `Error::Unauthorized` unless `caller` signed and is the owner.
///
/// The owner is read from storage on every call.
pub fn require_owner(env: &Env, caller: &Address) {
    caller.require_auth();
    if *caller != storage::get_owner(env) {
        panic_with_error!(env, Error::Unauthorized);
    }
}
