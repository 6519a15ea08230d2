//! Table configuration and the fixed limits of a table.

use crate::error::PokerError;
use serde::{Deserialize, Serialize};

/// Seats per table.
pub const MAX_PLAYERS: usize = 9;

pub const DEFAULT_SMALL_BLIND: u64 = 10;
pub const DEFAULT_BIG_BLIND: u64 = 20;
pub const DEFAULT_MIN_BUY_IN: u64 = 1_000;
pub const DEFAULT_MAX_BUY_IN: u64 = 10_000;

/// Largest `max_buy_in` a table accepts: nine maximum buy-ins still fit in a `u64`.
pub const MAX_BUY_IN: u64 = u64::MAX / MAX_PLAYERS as u64;

/// Stakes and buy-in range, fixed when the table is created.
///
/// ```
/// use poker_table::config::TableConfig;
///
/// let cfg: TableConfig = serde_json::from_str(
///     r#"{"small_blind":5,"big_blind":10,"min_buy_in":200,"max_buy_in":2000}"#,
/// ).unwrap();
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    pub small_blind: u64,
    pub big_blind: u64,
    pub min_buy_in: u64,
    pub max_buy_in: u64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            small_blind: DEFAULT_SMALL_BLIND,
            big_blind: DEFAULT_BIG_BLIND,
            min_buy_in: DEFAULT_MIN_BUY_IN,
            max_buy_in: DEFAULT_MAX_BUY_IN,
        }
    }
}

impl TableConfig {
    pub fn new(small_blind: u64, big_blind: u64, min_buy_in: u64, max_buy_in: u64) -> Self {
        Self { small_blind, big_blind, min_buy_in, max_buy_in }
    }

    /// `0 < small_blind < big_blind <= max_buy_in` and
    /// `min_buy_in <= max_buy_in <= MAX_BUY_IN`.
    pub fn validate(&self) -> Result<(), PokerError> {
        if self.small_blind == 0
            || self.small_blind >= self.big_blind
            || self.big_blind > self.max_buy_in
        {
            return Err(PokerError::InvalidBlinds {
                small_blind: self.small_blind,
                big_blind: self.big_blind,
            });
        }
        if self.min_buy_in > self.max_buy_in || self.max_buy_in > MAX_BUY_IN {
            return Err(PokerError::InvalidBuyIn);
        }
        Ok(())
    }

    pub fn buy_in_allowed(&self, amount: u64) -> bool {
        (self.min_buy_in..=self.max_buy_in).contains(&amount)
    }
}
