//! Invocation types for the ledger store
//!
//! An invocation is a function name plus string arguments, the unit in which
//! callers drive the ledger. This module maps names to typed invocations and
//! defines what each invocation returns.

use crate::types::{Account, LedgerError};
use rust_decimal::Decimal;

/// Ledger function names and their argument counts
pub const FUNCTIONS: [(&str, usize); 6] = [
    ("init", 1),
    ("read", 1),
    ("write", 2),
    ("delete", 1),
    ("init_account", 4),
    ("transfer_balance", 3),
];

/// A typed ledger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Reset the ledger: write `test_key` and clear the account index
    Init {
        /// Integer written under `test_key`
        value: String,
    },

    /// Read a raw record
    Read {
        /// Record key
        name: String,
    },

    /// Write a raw record
    Write {
        /// Record key
        name: String,
        /// New value
        value: String,
    },

    /// Delete a raw record and drop it from the account index
    Delete {
        /// Record key
        name: String,
    },

    /// Create an account
    InitAccount {
        /// New account number
        account_no: String,
        /// Owner, lower-cased on creation
        legal_entity: String,
        /// Currency code
        currency: String,
        /// Opening balance as a decimal string
        initial_balance: String,
    },

    /// Move balance between two accounts
    TransferBalance {
        /// Source account
        from: String,
        /// Destination account
        to: String,
        /// Amount as a decimal string
        amount: String,
    },
}

impl Invocation {
    /// Build an invocation from a function name and its arguments
    ///
    /// # Errors
    ///
    /// - `UnknownFunction` if the name is not a ledger function
    /// - `IncorrectArgumentCount` if the argument count does not match
    pub fn parse(function: &str, args: Vec<String>) -> Result<Self, LedgerError> {
        let invocation = match (function, args.as_slice()) {
            ("init", [value]) => Invocation::Init {
                value: value.clone(),
            },
            ("read", [name]) => Invocation::Read { name: name.clone() },
            ("write", [name, value]) => Invocation::Write {
                name: name.clone(),
                value: value.clone(),
            },
            ("delete", [name]) => Invocation::Delete { name: name.clone() },
            ("init_account", [account_no, legal_entity, currency, initial_balance]) => {
                Invocation::InitAccount {
                    account_no: account_no.clone(),
                    legal_entity: legal_entity.clone(),
                    currency: currency.clone(),
                    initial_balance: initial_balance.clone(),
                }
            }
            ("transfer_balance", [from, to, amount]) => Invocation::TransferBalance {
                from: from.clone(),
                to: to.clone(),
                amount: amount.clone(),
            },
            _ => {
                return Err(match Self::arity(function) {
                    Some(expected) => {
                        LedgerError::incorrect_argument_count(function, expected, args.len())
                    }
                    None => LedgerError::unknown_function(function),
                })
            }
        };

        Ok(invocation)
    }

    /// Number of arguments `function` takes, `None` if it is not a ledger function
    pub fn arity(function: &str) -> Option<usize> {
        FUNCTIONS
            .iter()
            .find(|(name, _)| *name == function)
            .map(|(_, arity)| *arity)
    }

    /// The function name this invocation was parsed from
    pub fn function(&self) -> &'static str {
        match self {
            Invocation::Init { .. } => "init",
            Invocation::Read { .. } => "read",
            Invocation::Write { .. } => "write",
            Invocation::Delete { .. } => "delete",
            Invocation::InitAccount { .. } => "init_account",
            Invocation::TransferBalance { .. } => "transfer_balance",
        }
    }
}

/// Result of a completed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    /// Source account after the debit
    pub from: Account,
    /// Destination account after the credit
    pub to: Account,
    /// Amount moved
    pub amount: Decimal,
}

/// Successful result of an invocation
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    /// The call had no return value
    Done,
    /// Raw record contents, `None` when the key is absent
    Value(Option<Vec<u8>>),
    /// The account created by `init_account`
    Account(Account),
    /// The accounts updated by `transfer_balance`
    Transfer(TransferReceipt),
}
