use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;
use std::{fmt, path::PathBuf};
use thiserror::Error;

pub type AccountNumber = u32;
pub type Pin = u16;

/// Scale applied to amounts read from an operation journal.
pub const SIGNIFICANT_DIGITS: u32 = 4;
/// Scale used whenever an amount is rendered for humans.
pub const DISPLAY_DIGITS: u32 = 2;

/// The (account number, PIN) pair an account is registered under. Both halves
/// must match for any operation to find the account.
///
/// Its `Display` only shows the account number so the PIN never ends up in an
/// error message or a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountKey {
    pub account_number: AccountNumber,
    pub pin: Pin,
}

impl AccountKey {
    pub fn new(account_number: AccountNumber, pin: Pin) -> Self {
        Self {
            account_number,
            pin,
        }
    }
}

impl fmt::Display for AccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.account_number)
    }
}

/// An account and its transaction history. The history lives in the account
/// itself, so there is no way to have one without the other.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Account {
    pub owner_name: String,
    pub balance: Decimal,
    pub(crate) transactions: Vec<String>,
}

impl Account {
    pub(crate) fn new(owner_name: impl Into<String>, balance: Decimal) -> Self {
        Self {
            owner_name: owner_name.into(),
            balance,
            transactions: Vec::new(),
        }
    }

    /// Transaction descriptions, oldest first.
    pub fn transactions(&self) -> &[String] {
        &self.transactions
    }
}

/// One row of an operation journal. `amount` is the initial balance for a
/// registration and the moved cash otherwise; `owner` is only meaningful for
/// registrations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Operation {
    #[serde(rename = "type")]
    pub optype: OpType,
    pub account: AccountNumber,
    pub pin: Pin,
    pub amount: Option<Decimal>,
    pub owner: Option<String>,
}

impl Operation {
    pub fn key(&self) -> AccountKey {
        AccountKey::new(self.account, self.pin)
    }
}

/// Different types of journal operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Register,
    Deposit,
    Withdrawal,
}

/// Renders an amount with exactly two decimals and no grouping, e.g. `200.4`
/// becomes `"200.40"`. The ledger only accepts whole cents, so rounding only
/// matters for amounts coming from elsewhere.
pub fn format_amount(amount: Decimal) -> String {
    let strategy = RoundingStrategy::MidpointAwayFromZero;
    let mut amount = amount.round_dp_with_strategy(DISPLAY_DIGITS, strategy);
    amount.rescale(DISPLAY_DIGITS);
    amount.to_string()
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Account {0} is already registered")]
    DuplicateAccount(AccountKey),
    #[error("Account {0} not found")]
    AccountNotFound(AccountKey),
    #[error("Invalid amount {0}: must be a positive number of whole cents")]
    InvalidAmount(Decimal),
    #[error("Balance of account {0} would overflow")]
    Overflow(AccountKey),
    #[error("Insufficient funds for operation (asked {asked} while {available} available)")]
    InsufficientFunds { asked: Decimal, available: Decimal },
    #[error("Cannot write ledger to {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Operation amount is missing")]
    MissingAmount,
    #[error("Owner name is missing for registration")]
    MissingOwner,
    #[error("Owner name shouldn't be there for deposit/withdrawal")]
    UnexpectedOwner,
}
