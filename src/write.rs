use crate::{
    atm::Atm,
    data::{format_amount, AccountNumber},
};
use serde::Serialize;

/// Writes ledger entries one per line, in the order given.
pub fn write_ledger<W: std::io::Write>(mut writer: W, entries: &[String]) -> std::io::Result<()> {
    for entry in entries {
        writeln!(writer, "{entry}")?;
    }
    Ok(())
}

/// What an exported account looks like. The PIN stays out of it, and the
/// history is reduced to its length.
#[derive(Serialize)]
struct AccountRow<'a> {
    account: AccountNumber,
    owner: &'a str,
    balance: String,
    transactions: usize,
}

/// Basic CSV exporter for the accounts of an `Atm`, ordered by account number
/// then PIN.
pub fn write_accounts<W: std::io::Write>(writer: W, atm: &Atm) -> Result<(), anyhow::Error> {
    let mut accounts: Vec<_> = atm.accounts().iter().collect();
    accounts.sort_unstable_by_key(|(key, _)| **key);
    let mut wtr = csv::Writer::from_writer(writer);
    for (key, account) in accounts {
        wtr.serialize(AccountRow {
            account: key.account_number,
            owner: &account.owner_name,
            balance: format_amount(account.balance),
            transactions: account.transactions().len(),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
