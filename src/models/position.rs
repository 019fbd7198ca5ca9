use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

// A holding of one symbol, as supplied by the portfolio that owns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub quantity: BigDecimal,
    pub purchase_price: BigDecimal,
    pub purchase_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePosition {
    pub symbol: String,
    pub quantity: BigDecimal,
    pub purchase_price: BigDecimal,
    pub purchase_date: NaiveDate,
}

impl Position {
    pub fn new(input: CreatePosition) -> Result<Self, AppError> {
        let symbol = input.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AppError::Validation("Symbol cannot be empty".into()));
        }
        if input.quantity <= BigDecimal::zero() {
            return Err(AppError::Validation(format!("Quantity for {} must be > 0", symbol)));
        }
        if input.purchase_price < BigDecimal::zero() {
            return Err(AppError::Validation(format!("Purchase price for {} cannot be negative", symbol)));
        }

        Ok(Self {
            symbol,
            quantity: input.quantity,
            purchase_price: input.purchase_price,
            purchase_date: input.purchase_date,
        })
    }

    pub fn cost_basis(&self) -> BigDecimal {
        &self.purchase_price * &self.quantity
    }
}
