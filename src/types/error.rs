//! Error types for the ledger store
//!
//! This module defines all error types that can occur while operating on the
//! ledger. Errors are designed to be descriptive and user-friendly for CLI output.
//!
//! # Error Categories
//!
//! - **Argument Errors**: Empty arguments, malformed amounts, unknown functions
//! - **Account Errors**: Duplicate accounts, missing accounts, insufficient balance
//! - **Storage Errors**: Failures of the underlying record store, undecodable records
//! - **Consistency Errors**: Two-phase writes where only the first write landed

use rust_decimal::Decimal;
use thiserror::Error;

/// Main error type for the ledger store
///
/// Every failure of a ledger operation is reported through this enum. Each
/// variant carries enough context to identify the record or argument involved.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A required argument was the empty string
    ///
    /// Raised before any record is read or written.
    #[error("Argument '{field}' must be a non-empty string")]
    EmptyArgument {
        /// Name of the offending argument
        field: String,
    },

    /// An amount did not parse as a non-negative decimal number
    #[error("Invalid amount '{amount}' for {field}")]
    InvalidAmount {
        /// The rejected input
        amount: String,
        /// Name of the argument that carried the amount
        field: String,
    },

    /// An account record with the same account number already exists
    #[error("Account {account_no} already exists")]
    AccountAlreadyExists {
        /// The duplicated account number
        account_no: String,
    },

    /// No record is stored under the account number
    #[error("Account {account_no} not found")]
    AccountNotFound {
        /// The missing account number
        account_no: String,
    },

    /// Source and destination of a transfer are the same account
    #[error("Cannot transfer from account {account_no} to itself")]
    SameAccount {
        /// The account named on both sides
        account_no: String,
    },

    /// The source account cannot cover the transfer
    ///
    /// No record is modified when this error is returned.
    #[error(
        "Account {account_no} doesn't have enough balance: balance {balance}, requested {requested}"
    )]
    InsufficientBalance {
        /// Source account number
        account_no: String,
        /// Balance before the transfer
        balance: Decimal,
        /// Requested transfer amount
        requested: Decimal,
    },

    /// A stored balance does not parse as a decimal
    #[error("Stored balance '{balance}' of account {account_no} is not a decimal number")]
    InvalidBalance {
        /// Account number holding the corrupt balance
        account_no: String,
        /// The stored balance string
        balance: String,
    },

    /// Checked decimal arithmetic overflowed
    #[error("Arithmetic overflow in {operation} for account {account_no}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: String,
        /// Account number involved
        account_no: String,
    },

    /// The underlying record store failed a get/put/delete
    #[error("Store error during {operation} of '{key}': {message}")]
    StoreError {
        /// Store operation (read, write, delete)
        operation: String,
        /// Record key
        key: String,
        /// Description of the failure
        message: String,
    },

    /// A stored record could not be decoded
    #[error("Failed to decode record '{key}': {message}")]
    DecodeError {
        /// Record key
        key: String,
        /// Decoder message
        message: String,
    },

    /// The first write of a two-write sequence landed, the second did not
    ///
    /// The store is left in the documented intermediate state: the `committed`
    /// record holds its new value, the `failed` record holds its old one. This
    /// state is not rolled back.
    #[error("Partial write: '{committed}' was written but '{failed}' was not: {message}")]
    PartialWrite {
        /// Key whose write succeeded
        committed: String,
        /// Key whose write failed
        failed: String,
        /// Cause of the second failure
        message: String,
    },

    /// An invocation named a function the ledger does not provide
    #[error("Received unknown function invocation: {function}")]
    UnknownFunction {
        /// The unrecognized function name
        function: String,
    },

    /// An invocation carried the wrong number of arguments
    #[error("Incorrect number of arguments for {function}: expecting {expected}, got {actual}")]
    IncorrectArgumentCount {
        /// Function name
        function: String,
        /// Required argument count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },

    /// The init value is not an integer
    #[error("Expecting integer value for init, got '{value}'")]
    InvalidInitValue {
        /// The rejected input
        value: String,
    },
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an EmptyArgument error
    pub fn empty_argument(field: &str) -> Self {
        LedgerError::EmptyArgument {
            field: field.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: &str, field: &str) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an AccountAlreadyExists error
    pub fn account_already_exists(account_no: &str) -> Self {
        LedgerError::AccountAlreadyExists {
            account_no: account_no.to_string(),
        }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account_no: &str) -> Self {
        LedgerError::AccountNotFound {
            account_no: account_no.to_string(),
        }
    }

    /// Create a SameAccount error
    pub fn same_account(account_no: &str) -> Self {
        LedgerError::SameAccount {
            account_no: account_no.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(account_no: &str, balance: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientBalance {
            account_no: account_no.to_string(),
            balance,
            requested,
        }
    }

    /// Create an InvalidBalance error
    pub fn invalid_balance(account_no: &str, balance: &str) -> Self {
        LedgerError::InvalidBalance {
            account_no: account_no.to_string(),
            balance: balance.to_string(),
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: &str, account_no: &str) -> Self {
        LedgerError::ArithmeticOverflow {
            operation: operation.to_string(),
            account_no: account_no.to_string(),
        }
    }

    /// Create a StoreError
    pub fn store(operation: &str, key: &str, message: impl ToString) -> Self {
        LedgerError::StoreError {
            operation: operation.to_string(),
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a DecodeError
    pub fn decode(key: &str, message: impl ToString) -> Self {
        LedgerError::DecodeError {
            key: key.to_string(),
            message: message.to_string(),
        }
    }

    /// Wrap the failure of a second write into a PartialWrite error
    pub fn partial_write(committed: &str, failed: &str, cause: &LedgerError) -> Self {
        LedgerError::PartialWrite {
            committed: committed.to_string(),
            failed: failed.to_string(),
            message: cause.to_string(),
        }
    }

    /// Create an UnknownFunction error
    pub fn unknown_function(function: &str) -> Self {
        LedgerError::UnknownFunction {
            function: function.to_string(),
        }
    }

    /// Create an IncorrectArgumentCount error
    pub fn incorrect_argument_count(function: &str, expected: usize, actual: usize) -> Self {
        LedgerError::IncorrectArgumentCount {
            function: function.to_string(),
            expected,
            actual,
        }
    }

    /// Create an InvalidInitValue error
    pub fn invalid_init_value(value: &str) -> Self {
        LedgerError::InvalidInitValue {
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal::Decimal;

    #[rstest]
    #[case::empty_argument(
        LedgerError::EmptyArgument { field: "accountNo".to_string() },
        "Argument 'accountNo' must be a non-empty string"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: "abc".to_string(), field: "amount".to_string() },
        "Invalid amount 'abc' for amount"
    )]
    #[case::already_exists(
        LedgerError::AccountAlreadyExists { account_no: "A1".to_string() },
        "Account A1 already exists"
    )]
    #[case::insufficient_balance(
        LedgerError::InsufficientBalance {
            account_no: "A1".to_string(),
            balance: Decimal::new(7000, 2),
            requested: Decimal::new(1000, 0),
        },
        "Account A1 doesn't have enough balance: balance 70.00, requested 1000"
    )]
    #[case::store_error(
        LedgerError::StoreError {
            operation: "write".to_string(),
            key: "A1".to_string(),
            message: "disk full".to_string(),
        },
        "Store error during write of 'A1': disk full"
    )]
    #[case::partial_write(
        LedgerError::PartialWrite {
            committed: "A1".to_string(),
            failed: "A2".to_string(),
            message: "disk full".to_string(),
        },
        "Partial write: 'A1' was written but 'A2' was not: disk full"
    )]
    #[case::argument_count(
        LedgerError::IncorrectArgumentCount { function: "read".to_string(), expected: 1, actual: 2 },
        "Incorrect number of arguments for read: expecting 1, got 2"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::empty_argument(
        LedgerError::empty_argument("currency"),
        LedgerError::EmptyArgument { field: "currency".to_string() }
    )]
    #[case::not_found(
        LedgerError::account_not_found("A9"),
        LedgerError::AccountNotFound { account_no: "A9".to_string() }
    )]
    #[case::store(
        LedgerError::store("delete", "k", "gone"),
        LedgerError::StoreError {
            operation: "delete".to_string(),
            key: "k".to_string(),
            message: "gone".to_string(),
        }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_partial_write_keeps_cause_message() {
        let cause = LedgerError::store("write", "A2", "disk full");
        let error = LedgerError::partial_write("A1", "A2", &cause);
        assert_eq!(
            error,
            LedgerError::PartialWrite {
                committed: "A1".to_string(),
                failed: "A2".to_string(),
                message: "Store error during write of 'A2': disk full".to_string(),
            }
        );
    }
}
