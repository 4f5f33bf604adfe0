//! Ledger engine
//!
//! This module provides the `LedgerEngine`, which implements account creation,
//! balance transfers and raw record access on top of a `RecordStore` and the
//! `AccountIndex`.
//!
//! The engine enforces:
//! - Argument validation before any record is touched
//! - Uniqueness of account numbers
//! - The solvency check and conservation of balance on transfer
//! - Index cleanup on every deletion
//!
//! # Two-write sequences
//!
//! Creating an account (record, then index) and transferring (source, then
//! destination) each take two store writes, and the store offers no multi-key
//! transaction. If the second write fails the first one stays in place and the
//! engine returns `LedgerError::PartialWrite` naming both keys. Nothing is
//! rolled back.

use crate::core::account_index::{AccountIndex, ACCOUNT_INDEX_KEY};
use crate::core::traits::RecordStore;
use crate::types::amount::parse_non_negative;
use crate::types::{Account, Invocation, InvocationOutcome, LedgerError, TransferReceipt};
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

/// Key written by `init`
pub const TEST_KEY: &str = "test_key";

/// Account ledger over a record store
///
/// Holds no cached records: every operation reads what it needs from the store.
#[derive(Debug)]
pub struct LedgerEngine<S: RecordStore> {
    store: S,
    index_key: String,
}

impl<S: RecordStore> LedgerEngine<S> {
    /// Create an engine using the default index key
    pub fn new(store: S) -> Self {
        Self::with_index_key(store, ACCOUNT_INDEX_KEY)
    }

    /// Create an engine that keeps its account index under `index_key`
    pub fn with_index_key(store: S, index_key: &str) -> Self {
        LedgerEngine {
            store,
            index_key: index_key.to_string(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Consume the engine, returning the store
    pub fn into_store(self) -> S {
        self.store
    }

    /// Key of the account index record
    pub fn index_key(&self) -> &str {
        &self.index_key
    }

    /// Run a dispatched invocation
    pub fn invoke(&mut self, invocation: Invocation) -> Result<InvocationOutcome, LedgerError> {
        match invocation {
            Invocation::Init { value } => self.init(&value).map(|_| InvocationOutcome::Done),
            Invocation::Read { name } => self.read_raw(&name).map(InvocationOutcome::Value),
            Invocation::Write { name, value } => self
                .write_raw(&name, value.as_bytes())
                .map(|_| InvocationOutcome::Done),
            Invocation::Delete { name } => self.delete_raw(&name).map(|_| InvocationOutcome::Done),
            Invocation::InitAccount {
                account_no,
                legal_entity,
                currency,
                initial_balance,
            } => self
                .create_account(&account_no, &legal_entity, &currency, &initial_balance)
                .map(InvocationOutcome::Account),
            Invocation::TransferBalance { from, to, amount } => self
                .transfer_balance(&from, &to, &amount)
                .map(InvocationOutcome::Transfer),
        }
    }

    /// Reset the ledger
    ///
    /// Writes `value` under `test_key` and replaces the account index with an
    /// empty one. Account records themselves are left in place.
    ///
    /// # Errors
    ///
    /// - `InvalidInitValue` if `value` is not an integer
    /// - `StoreError` if either write fails
    pub fn init(&mut self, value: &str) -> Result<(), LedgerError> {
        let value: i64 = value
            .parse()
            .map_err(|_| LedgerError::invalid_init_value(value))?;

        self.store.write(TEST_KEY, value.to_string().as_bytes())?;
        AccountIndex::empty(&self.index_key).save(&mut self.store)?;

        info!(value, "ledger initialized, account index cleared");
        Ok(())
    }

    /// Read a raw record, `None` if absent
    pub fn read_raw(&self, name: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        self.store.read(name)
    }

    /// Write a raw record
    pub fn write_raw(&mut self, name: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.store.write(name, value)?;
        debug!(name, bytes = value.len(), "raw record written");
        Ok(())
    }

    /// Delete a raw record and remove `name` from the account index
    ///
    /// Index cleanup is attempted for every key, whether or not it named an
    /// account. The index is only rewritten when it actually contained `name`.
    ///
    /// # Errors
    ///
    /// - `StoreError` if the delete fails (nothing changed)
    /// - `PartialWrite` if the record is gone but the index could not be updated
    pub fn delete_raw(&mut self, name: &str) -> Result<(), LedgerError> {
        self.store.delete(name)?;

        let cleanup = AccountIndex::load(&self.store, &self.index_key).and_then(|mut index| {
            if index.remove(name) {
                index.save(&mut self.store)?;
                info!(name, "account removed from index");
            }
            Ok(())
        });

        cleanup.map_err(|e| {
            error!(name, error = %e, "record deleted but index cleanup failed");
            LedgerError::partial_write(name, &self.index_key, &e)
        })
    }

    /// Create an account
    ///
    /// Validation happens before any write: every argument must be non-empty
    /// and `initial_balance` must be a non-negative decimal. The legal entity is
    /// lower-cased.
    ///
    /// An existing record under `account_no` only blocks creation when it
    /// decodes as an account carrying the same account number. A record that
    /// does not decode is treated as absent and overwritten.
    ///
    /// # Errors
    ///
    /// - `EmptyArgument`, `InvalidAmount` on bad input
    /// - `AccountAlreadyExists` if the account is already there
    /// - `StoreError` if reading or writing the account record fails
    /// - `PartialWrite` if the record was written but the index was not
    pub fn create_account(
        &mut self,
        account_no: &str,
        legal_entity: &str,
        currency: &str,
        initial_balance: &str,
    ) -> Result<Account, LedgerError> {
        for (field, value) in [
            ("accountNo", account_no),
            ("legalEntity", legal_entity),
            ("currency", currency),
            ("initialBalance", initial_balance),
        ] {
            if value.is_empty() {
                return Err(LedgerError::empty_argument(field));
            }
        }
        let balance = parse_non_negative(initial_balance, "initialBalance")?;

        if let Some(existing) = self.load_account_tolerant(account_no)? {
            if existing.account_no == account_no {
                return Err(LedgerError::account_already_exists(account_no));
            }
        }

        let account = Account::new(account_no, legal_entity, currency, balance);
        self.store.write(account_no, &account.encode()?)?;

        self.index_account(account_no).map_err(|e| {
            error!(account_no, error = %e, "account written but index update failed");
            LedgerError::partial_write(account_no, &self.index_key, &e)
        })?;

        info!(account_no, balance = %account.balance, "account created");
        Ok(account)
    }

    /// Transfer `amount` from one account to another
    ///
    /// Both accounts are read and every check is made before the first write.
    /// On success the source is written first, then the destination, and
    /// `from + to` is the same before and after.
    ///
    /// # Errors
    ///
    /// - `EmptyArgument`, `SameAccount`, `InvalidAmount` on bad input
    /// - `AccountNotFound` if either record is missing
    /// - `DecodeError` if either record is not an account
    /// - `InvalidBalance` if either stored balance is not a decimal
    /// - `InsufficientBalance` if the source would go negative
    /// - `ArithmeticOverflow` if either new balance overflows or cannot be held
    ///   exactly (more than 28 significant digits)
    /// - `StoreError` if the source write fails (nothing changed)
    /// - `PartialWrite` if the source was debited but the destination write failed
    pub fn transfer_balance(
        &mut self,
        from: &str,
        to: &str,
        amount: &str,
    ) -> Result<TransferReceipt, LedgerError> {
        for (field, value) in [("fromAccountNo", from), ("toAccountNo", to), ("amount", amount)] {
            if value.is_empty() {
                return Err(LedgerError::empty_argument(field));
            }
        }
        if from == to {
            return Err(LedgerError::same_account(from));
        }
        let amount = parse_non_negative(amount, "amount")?;

        let mut source = self.load_account(from)?;
        let mut destination = self.load_account(to)?;
        let source_balance = source.parsed_balance()?;
        let destination_balance = destination.parsed_balance()?;

        let new_source_balance = source_balance
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer debit", from))?;
        if new_source_balance < Decimal::ZERO {
            return Err(LedgerError::insufficient_balance(
                from,
                source_balance,
                amount,
            ));
        }
        let new_destination_balance = destination_balance
            .checked_add(amount)
            .ok_or_else(|| LedgerError::arithmetic_overflow("transfer credit", to))?;

        // Decimal rounds results past 28 significant digits instead of failing
        if source_balance - new_source_balance != amount {
            return Err(LedgerError::arithmetic_overflow("transfer debit", from));
        }
        if new_destination_balance - destination_balance != amount {
            return Err(LedgerError::arithmetic_overflow("transfer credit", to));
        }

        source.set_balance(new_source_balance);
        destination.set_balance(new_destination_balance);
        let source_bytes = source.encode()?;
        let destination_bytes = destination.encode()?;

        self.store.write(from, &source_bytes)?;
        self.store.write(to, &destination_bytes).map_err(|e| {
            error!(from, to, error = %e, "source debited but destination write failed");
            LedgerError::partial_write(from, to, &e)
        })?;

        info!(from, to, %amount, "balance transferred");
        Ok(TransferReceipt {
            from: source,
            to: destination,
            amount,
        })
    }

    /// Look up an account, treating an undecodable record as absent
    pub fn get_account(&self, account_no: &str) -> Result<Option<Account>, LedgerError> {
        self.load_account_tolerant(account_no)
    }

    /// Account numbers in the index, in creation order
    pub fn account_ids(&self) -> Result<Vec<String>, LedgerError> {
        Ok(AccountIndex::load(&self.store, &self.index_key)?.into_entries())
    }

    /// Every indexed account, in index order
    ///
    /// Index entries without a decodable record (the window left by a partial
    /// write, or a record overwritten through raw access) are skipped.
    pub fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let mut accounts = Vec::new();
        for account_no in self.account_ids()? {
            match self.load_account_tolerant(&account_no)? {
                Some(account) => accounts.push(account),
                None => warn!(account_no, "indexed account has no readable record"),
            }
        }
        Ok(accounts)
    }

    fn index_account(&mut self, account_no: &str) -> Result<(), LedgerError> {
        let mut index = AccountIndex::load(&self.store, &self.index_key)?;
        if index.add(account_no) {
            index.save(&mut self.store)?;
        }
        Ok(())
    }

    fn load_account(&self, account_no: &str) -> Result<Account, LedgerError> {
        let bytes = self
            .store
            .read(account_no)?
            .ok_or_else(|| LedgerError::account_not_found(account_no))?;
        Account::decode(account_no, &bytes)
    }

    fn load_account_tolerant(&self, account_no: &str) -> Result<Option<Account>, LedgerError> {
        let Some(bytes) = self.store.read(account_no)? else {
            return Ok(None);
        };
        match Account::decode(account_no, &bytes) {
            Ok(account) => Ok(Some(account)),
            Err(e) => {
                debug!(account_no, error = %e, "record is not an account");
                Ok(None)
            }
        }
    }
}
