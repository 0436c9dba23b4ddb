//! Currency domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Longest symbol accepted at registration.
pub const MAX_SYMBOL_LEN: usize = 20;

/// Canonical form of a symbol: trimmed and uppercased.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Domain model representing a tracked currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: i64,
    pub symbol: String,
    pub name: String,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for registering a currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCurrency {
    pub symbol: String,
    pub name: String,
}

impl NewCurrency {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }

    /// Returns a copy with the symbol normalized and the name trimmed.
    pub fn normalized(&self) -> Self {
        Self {
            symbol: normalize_symbol(&self.symbol),
            name: self.name.trim().to_string(),
        }
    }

    /// Validates the registration data. Expects a normalized value.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "symbol".to_string(),
            )));
        }
        if self.symbol.len() > MAX_SYMBOL_LEN {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Symbol '{}' is longer than {} characters",
                self.symbol, MAX_SYMBOL_LEN
            ))));
        }
        if !self.symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Symbol '{}' must be ASCII letters and digits only",
                self.symbol
            ))));
        }
        if self.name.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("  btc "), "BTC");
        assert_eq!(normalize_symbol("Eth"), "ETH");
    }

    #[test]
    fn test_normalized_then_validate() {
        let input = NewCurrency::new(" sol ", " Solana ").normalized();
        assert_eq!(input.symbol, "SOL");
        assert_eq!(input.name, "Solana");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert!(NewCurrency::new("", "Bitcoin").normalized().validate().is_err());
        assert!(NewCurrency::new("BTC", "  ").normalized().validate().is_err());
        assert!(NewCurrency::new("BTC-USDT", "Bitcoin")
            .normalized()
            .validate()
            .is_err());
        let long = "A".repeat(MAX_SYMBOL_LEN + 1);
        assert!(NewCurrency::new(long, "Long").normalized().validate().is_err());
    }
}
