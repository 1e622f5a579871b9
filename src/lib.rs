//! An in-memory ATM account ledger: register accounts under an account
//! number and PIN, move cash in and out, check balances, and print an
//! account's transaction history to a file.
//!
//! Amounts are `rust_decimal::Decimal` throughout and are rendered with two
//! decimals wherever a human reads them.

mod atm;
mod data;
mod read;
mod write;

pub use atm::Atm;
pub use data::{
    format_amount, Account, AccountKey, AccountNumber, Error, OpType, Operation, Pin,
    DISPLAY_DIGITS, SIGNIFICANT_DIGITS,
};
pub use read::{read_operations, OperationUser};
pub use write::{write_accounts, write_ledger};
