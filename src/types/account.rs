//! Account-related types for the ledger store
//!
//! This module defines the Account record as it is persisted in the record
//! store, together with its encoding and tolerant decoding.

use crate::types::amount::{format_scientific, parse_amount};
use crate::types::LedgerError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Account identifier, also the storage key of the account record
pub type AccountNo = String;

/// Balance-holding account record
///
/// Field names on the wire are `accountno`, `legalentity`, `currency` and
/// `balance`. Decoding is lenient in the same way as the records were always
/// read: missing fields come back empty and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    /// The account number
    #[serde(rename = "accountno")]
    pub account_no: AccountNo,

    /// Owner of the account, lower-cased at creation
    #[serde(rename = "legalentity")]
    pub legal_entity: String,

    /// Free-form currency code
    pub currency: String,

    /// Balance as a decimal string in scientific form
    ///
    /// Kept as a string so that a corrupt stored balance survives decoding and
    /// can be reported precisely when it is used.
    pub balance: String,
}

impl Account {
    /// Create an account record with the given balance
    ///
    /// The legal entity is stored lower-cased; no other field is normalized.
    pub fn new(account_no: &str, legal_entity: &str, currency: &str, balance: Decimal) -> Self {
        Account {
            account_no: account_no.to_string(),
            legal_entity: legal_entity.to_lowercase(),
            currency: currency.to_string(),
            balance: format_scientific(balance),
        }
    }

    /// Parse the stored balance
    ///
    /// # Errors
    ///
    /// Returns `InvalidBalance` if the stored string is not a decimal number.
    pub fn parsed_balance(&self) -> Result<Decimal, LedgerError> {
        parse_amount(&self.balance)
            .ok_or_else(|| LedgerError::invalid_balance(&self.account_no, &self.balance))
    }

    /// Replace the balance, keeping every other field
    pub fn set_balance(&mut self, balance: Decimal) {
        self.balance = format_scientific(balance);
    }

    /// Encode the record for storage
    pub fn encode(&self) -> Result<Vec<u8>, LedgerError> {
        serde_json::to_vec(self).map_err(|e| LedgerError::store("encode", &self.account_no, e))
    }

    /// Decode a stored record
    ///
    /// # Errors
    ///
    /// Returns `DecodeError` if the bytes are not a JSON object of the account shape.
    pub fn decode(key: &str, bytes: &[u8]) -> Result<Self, LedgerError> {
        serde_json::from_slice(bytes).map_err(|e| LedgerError::decode(key, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_lowercases_legal_entity_only() {
        let account = Account::new("AC-1", "Bob", "USD", Decimal::new(10000, 2));

        assert_eq!(account.account_no, "AC-1");
        assert_eq!(account.legal_entity, "bob");
        assert_eq!(account.currency, "USD");
        assert_eq!(account.balance, "1E+02");
    }

    #[test]
    fn test_wire_field_names() {
        let account = Account::new("A1", "bob", "USD", Decimal::new(70, 0));
        let value: serde_json::Value = serde_json::from_slice(&account.encode().unwrap()).unwrap();

        assert_eq!(
            value,
            json!({
                "accountno": "A1",
                "legalentity": "bob",
                "currency": "USD",
                "balance": "7E+01"
            })
        );
    }

    #[test]
    fn test_decode_tolerates_missing_and_unknown_fields() {
        let account = Account::decode("A1", br#"{"accountno": "A1", "extra": 1}"#).unwrap();

        assert_eq!(account.account_no, "A1");
        assert_eq!(account.legal_entity, "");
        assert_eq!(account.balance, "");
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let result = Account::decode("A1", b"3500");
        assert!(matches!(result, Err(LedgerError::DecodeError { .. })));
    }

    #[test]
    fn test_parsed_balance_reports_corrupt_value() {
        let mut account = Account::new("A1", "bob", "USD", Decimal::ZERO);
        account.balance = "lots".to_string();

        assert_eq!(
            account.parsed_balance(),
            Err(LedgerError::invalid_balance("A1", "lots"))
        );
    }

    #[test]
    fn test_set_balance_round_trips() {
        let mut account = Account::new("A1", "bob", "USD", Decimal::ZERO);
        account.set_balance(Decimal::new(12345, 3));

        assert_eq!(account.parsed_balance().unwrap(), Decimal::new(12345, 3));
    }
}
