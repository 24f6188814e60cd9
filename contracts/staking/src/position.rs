use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

// Per-account persistent storage uses tuple keys: (POS, account)
const POSITION: Symbol = symbol_short!("POS");

const TTL_THRESHOLD: u32 = 5184000;
const TTL_EXTEND_TO: u32 = 10368000;

/// A single account's active stake.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub amount: i128,
    pub lock_start: u64,
}

impl Position {
    /// The canonical "no position" value.
    pub const fn empty() -> Self {
        Self {
            amount: 0,
            lock_start: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.amount == 0
    }

    /// Folds `incoming` into this position.
    ///
    /// The merged position stays locked until the later of the two lock
    /// starts has aged, never earlier.
    pub fn merge(&self, incoming: &Position) -> Option<Position> {
        Some(Position {
            amount: self.amount.checked_add(incoming.amount)?,
            lock_start: self.lock_start.max(incoming.lock_start),
        })
    }
}

fn position_key(account: &Address) -> (Symbol, Address) {
    (POSITION, account.clone())
}

fn extend_ttl(env: &Env, key: &(Symbol, Address)) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Returns the account's position, or [`Position::empty`] if it holds none.
pub fn get(env: &Env, account: &Address) -> Position {
    let key = position_key(account);
    match env.storage().persistent().get::<_, Position>(&key) {
        Some(position) => {
            extend_ttl(env, &key);
            position
        }
        None => Position::empty(),
    }
}

/// Stores `position` for `account`; an empty position removes the entry.
pub fn set(env: &Env, account: &Address, position: &Position) {
    if position.is_empty() {
        clear(env, account);
        return;
    }
    let key = position_key(account);
    env.storage().persistent().set(&key, position);
    extend_ttl(env, &key);
}

pub fn clear(env: &Env, account: &Address) {
    env.storage().persistent().remove(&position_key(account));
}
