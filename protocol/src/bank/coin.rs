//! Coins and coin sets.
//!
//! All amounts are `u64` in the smallest unit of their denomination. There
//! is no floating point anywhere in the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Shortest and longest accepted denomination.
const MIN_DENOM_LEN: usize = 3;
const MAX_DENOM_LEN: usize = 128;

/// Errors produced when constructing a [`Coins`] set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinError {
    #[error("invalid denom: {0}")]
    InvalidDenom(String),

    #[error("coin amount must be positive: 0{0}")]
    ZeroAmount(String),

    #[error("duplicate denomination {0}")]
    DuplicateDenom(String),

    #[error("coin set must not be empty")]
    Empty,
}

/// A single amount of one denomination.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: u64,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u64) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Checks the denomination format: a leading ASCII letter followed by
    /// alphanumerics or `/ : . _ -`, 3 to 128 characters in total.
    pub fn validate_denom(denom: &str) -> Result<(), CoinError> {
        let len_ok = (MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&denom.len());
        let mut chars = denom.chars();
        let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
        let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));

        if len_ok && first_ok && rest_ok {
            Ok(())
        } else {
            Err(CoinError::InvalidDenom(denom.to_string()))
        }
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

/// A non-empty set of positive coins, sorted by denomination with no
/// duplicates. Construction is the only place these rules are checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    pub fn new(mut coins: Vec<Coin>) -> Result<Self, CoinError> {
        if coins.is_empty() {
            return Err(CoinError::Empty);
        }
        for coin in &coins {
            Coin::validate_denom(&coin.denom)?;
            if coin.amount == 0 {
                return Err(CoinError::ZeroAmount(coin.denom.clone()));
            }
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(pair) = coins.windows(2).find(|w| w[0].denom == w[1].denom) {
            return Err(CoinError::DuplicateDenom(pair[0].denom.clone()));
        }
        Ok(Self(coins))
    }

    /// Shorthand for a one-coin set.
    pub fn single(denom: impl Into<String>, amount: u64) -> Result<Self, CoinError> {
        Self::new(vec![Coin::new(denom, amount)])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Coin> {
        self.0.iter()
    }

    /// Amount of `denom` in the set, zero if absent.
    pub fn amount_of(&self, denom: &str) -> u64 {
        self.0
            .iter()
            .find(|c| c.denom == denom)
            .map(|c| c.amount)
            .unwrap_or(0)
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinError;

    fn try_from(coins: Vec<Coin>) -> Result<Self, Self::Error> {
        Self::new(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(Coin::to_string).collect();
        f.write_str(&parts.join(","))
    }
}
