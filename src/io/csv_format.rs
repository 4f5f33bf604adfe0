//! CSV format handling for invocation scripts and account output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Conversion from script rows to typed invocations
//! - Account listing serialization
//!
//! A script has a header row (`function,args`) followed by one invocation per
//! row: the function name, then its arguments in order. Rows have as many
//! fields as the invocation needs.
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::amount::format_plain;
use crate::types::{Account, Invocation};
use std::io::Write;

/// Convert the fields of a script row into an invocation
///
/// The first field is the function name, the rest are its arguments. Only the
/// function name is trimmed; arguments are passed through verbatim, and empty
/// arguments are kept so the ledger can reject them itself.
///
/// # Returns
///
/// - Ok(Invocation) - Successfully converted row
/// - Err(String) - Missing function name, unknown function or wrong arity
pub fn convert_script_fields<'a, I>(fields: I) -> Result<Invocation, String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut fields = fields.into_iter();
    let function = fields.next().unwrap_or_default().trim();
    if function.is_empty() {
        return Err("Missing function name".to_string());
    }

    let args = fields.map(str::to_string).collect();
    Invocation::parse(function, args).map_err(|e| e.to_string())
}

/// Render a stored balance for output
///
/// Parseable balances are shown in their shortest plain form; anything else is
/// shown exactly as stored.
pub fn display_balance(account: &Account) -> String {
    match account.parsed_balance() {
        Ok(balance) => format_plain(balance),
        Err(_) => account.balance.clone(),
    }
}

/// Write the account listing in CSV format
///
/// Writes accounts with columns: accountno, legalentity, currency, balance,
/// in the order given (the account index order).
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["accountno", "legalentity", "currency", "balance"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for account in accounts {
        writer
            .write_record([
                account.account_no.as_str(),
                account.legal_entity.as_str(),
                account.currency.as_str(),
                display_balance(account).as_str(),
            ])
            .map_err(|e| format!("Failed to write account {}: {}", account.account_no, e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush CSV output: {}", e))?;

    Ok(())
}
