use crate::{
    data::{
        format_amount, Account, AccountKey, AccountNumber, Error, OpType, Operation, Pin,
        DISPLAY_DIGITS,
    },
    read::OperationUser,
    write::write_ledger,
};
use rust_decimal::Decimal;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::debug;

/// This is where accounts are stored. Single-threaded by design: every
/// mutation goes through `&mut self`, and every operation either applies
/// completely or leaves the ledger untouched.
#[derive(Debug, Default)]
pub struct Atm {
    accounts: HashMap<AccountKey, Account>,
}

impl Atm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_account(
        &mut self,
        account_number: AccountNumber,
        pin: Pin,
        owner_name: impl Into<String>,
        initial_balance: Decimal,
    ) -> Result<(), Error> {
        let key = AccountKey::new(account_number, pin);
        if self.accounts.contains_key(&key) {
            return Err(Error::DuplicateAccount(key));
        }
        if initial_balance < Decimal::ZERO {
            return Err(Error::InvalidAmount(initial_balance));
        }
        check_cents(initial_balance)?;
        let account = Account::new(owner_name, initial_balance);
        self.accounts.insert(key, account);
        debug!(account = %key, balance = %initial_balance, "account registered");
        Ok(())
    }

    pub fn withdraw_cash(
        &mut self,
        account_number: AccountNumber,
        pin: Pin,
        amount: Decimal,
    ) -> Result<(), Error> {
        let key = AccountKey::new(account_number, pin);
        let account = self.account_mut(key)?;
        check_positive(amount)?;
        if account.balance < amount {
            return Err(Error::InsufficientFunds {
                asked: amount,
                available: account.balance,
            });
        }
        account.balance -= amount;
        account.transactions.push(format!(
            "Withdrawal - Amount: ${}, Updated Balance: ${}",
            format_amount(amount),
            format_amount(account.balance)
        ));
        debug!(account = %key, %amount, balance = %account.balance, "cash withdrawn");
        Ok(())
    }

    pub fn deposit_cash(
        &mut self,
        account_number: AccountNumber,
        pin: Pin,
        amount: Decimal,
    ) -> Result<(), Error> {
        let key = AccountKey::new(account_number, pin);
        let account = self.account_mut(key)?;
        check_positive(amount)?;
        let balance = account.balance.checked_add(amount);
        account.balance = balance.ok_or(Error::Overflow(key))?;
        account.transactions.push(format!(
            "Deposit - Amount: ${}, Updated Balance: ${}",
            format_amount(amount),
            format_amount(account.balance)
        ));
        debug!(account = %key, %amount, balance = %account.balance, "cash deposited");
        Ok(())
    }

    pub fn check_balance(&self, account_number: AccountNumber, pin: Pin) -> Result<Decimal, Error> {
        self.account(AccountKey::new(account_number, pin))
            .map(|account| account.balance)
    }

    /// Read-only view of every registered account.
    pub fn accounts(&self) -> &HashMap<AccountKey, Account> {
        &self.accounts
    }

    /// Every account's transaction history, keyed like `accounts()`.
    pub fn transactions(&self) -> HashMap<AccountKey, &[String]> {
        self.accounts
            .iter()
            .map(|(key, account)| (*key, account.transactions()))
            .collect()
    }

    pub fn history(&self, account_number: AccountNumber, pin: Pin) -> Result<&[String], Error> {
        self.account(AccountKey::new(account_number, pin))
            .map(Account::transactions)
    }

    /// Appends a free-form line to an account's history. The balance is left
    /// alone; this is how corrections or notes make it into a printed ledger.
    pub fn append_transaction(
        &mut self,
        account_number: AccountNumber,
        pin: Pin,
        entry: impl Into<String>,
    ) -> Result<(), Error> {
        let key = AccountKey::new(account_number, pin);
        let account = self.account_mut(key)?;
        account.transactions.push(entry.into());
        debug!(account = %key, "transaction appended");
        Ok(())
    }

    /// Writes the account's history to `path`, one entry per line. The file is
    /// created or truncated, but only once the account is known to exist.
    pub fn print_ledger(
        &self,
        path: impl AsRef<Path>,
        account_number: AccountNumber,
        pin: Pin,
    ) -> Result<(), Error> {
        let path = path.as_ref();
        let key = AccountKey::new(account_number, pin);
        let entries = self.account(key)?.transactions();
        let io_error = |source: std::io::Error| Error::Io {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = BufWriter::new(File::create(path).map_err(io_error)?);
        write_ledger(&mut writer, entries).map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        debug!(account = %key, path = %path.display(), "ledger printed");
        Ok(())
    }

    fn account(&self, key: AccountKey) -> Result<&Account, Error> {
        self.accounts.get(&key).ok_or(Error::AccountNotFound(key))
    }

    fn account_mut(&mut self, key: AccountKey) -> Result<&mut Account, Error> {
        self.accounts
            .get_mut(&key)
            .ok_or(Error::AccountNotFound(key))
    }
}

fn check_positive(amount: Decimal) -> Result<(), Error> {
    if amount <= Decimal::ZERO {
        return Err(Error::InvalidAmount(amount));
    }
    check_cents(amount)
}

/// Amounts are whole cents: a finer fraction would move the balance without
/// ever showing up in a history line.
fn check_cents(amount: Decimal) -> Result<(), Error> {
    if amount.normalize().scale() > DISPLAY_DIGITS {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(())
}

/// Journal operations map one to one onto the ATM calls; the only extra work is
/// checking that each row carries the fields its type needs.
impl OperationUser for Atm {
    fn use_op(&mut self, op: Operation) -> Result<(), Error> {
        let amount = op.amount.ok_or(Error::MissingAmount)?;
        match op.optype {
            OpType::Register => {
                let owner = op.owner.ok_or(Error::MissingOwner)?;
                self.register_account(op.account, op.pin, owner, amount)
            }
            OpType::Deposit => {
                if op.owner.is_some() {
                    return Err(Error::UnexpectedOwner);
                }
                self.deposit_cash(op.account, op.pin, amount)
            }
            OpType::Withdrawal => {
                if op.owner.is_some() {
                    return Err(Error::UnexpectedOwner);
                }
                self.withdraw_cash(op.account, op.pin, amount)
            }
        }
    }
}
