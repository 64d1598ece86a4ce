use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, MONEY_SCALE};
use crate::errors::{Result, ScheduleError};

/// rounding applied when an amount is scoped to a currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// midpoint rounds away from zero
    #[default]
    HalfUp,
    /// banker's rounding
    HalfEven,
    /// truncate toward zero
    Down,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::HalfEven => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Down => RoundingStrategy::ToZero,
        }
    }
}

/// currency configuration: the scope every charge amount is produced in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub code: String,
    pub decimal_places: u32,
    #[serde(default)]
    pub rounding: RoundingMode,
}

impl Currency {
    pub fn new(code: impl Into<String>, decimal_places: u32, rounding: RoundingMode) -> Result<Self> {
        let currency = Self {
            code: code.into(),
            decimal_places,
            rounding,
        };
        currency.validate()?;
        Ok(currency)
    }

    /// US dollar, 2 decimal places, half-up
    pub fn usd() -> Self {
        Self {
            code: "USD".to_string(),
            decimal_places: 2,
            rounding: RoundingMode::HalfUp,
        }
    }

    /// euro, 2 decimal places, half-up
    pub fn eur() -> Self {
        Self {
            code: "EUR".to_string(),
            decimal_places: 2,
            rounding: RoundingMode::HalfUp,
        }
    }

    /// japanese yen, no minor unit
    pub fn jpy() -> Self {
        Self {
            code: "JPY".to_string(),
            decimal_places: 0,
            rounding: RoundingMode::HalfUp,
        }
    }

    /// load a currency from a json document
    pub fn from_json(json: &str) -> Result<Self> {
        let currency: Currency = serde_json::from_str(json)?;
        currency.validate()?;
        Ok(currency)
    }

    fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(ScheduleError::InvalidConfiguration {
                message: "currency code must not be empty".to_string(),
            });
        }
        if self.decimal_places > MONEY_SCALE {
            return Err(ScheduleError::InvalidConfiguration {
                message: format!(
                    "currency {} has {} decimal places, at most {} supported",
                    self.code, self.decimal_places, MONEY_SCALE
                ),
            });
        }
        Ok(())
    }

    /// zero amount in this currency
    pub fn zero(&self) -> Money {
        Money::ZERO
    }

    /// round a raw decimal into a money amount of this currency
    pub fn money(&self, amount: Decimal) -> Money {
        Money::from_decimal(
            amount.round_dp_with_strategy(self.decimal_places, self.rounding.strategy()),
        )
    }

    /// `base × percentage / 100`, rounded once at the end
    pub fn percentage_of(&self, base: Money, percentage: Decimal) -> Money {
        self.money(base.as_decimal() * percentage / Decimal::ONE_HUNDRED)
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::usd()
    }
}
