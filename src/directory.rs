//! # Directory
//!
//! `directory` is a module providing functionality for managing many accounts addressed by
//! account number.
//!
//! Each account sits behind its own lock so a directory can be shared between threads. A
//! transfer locks both accounts in ascending account-number order, so two opposite transfers
//! cannot deadlock each other.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    Account, AccountPolicy, AccountSnapshot, Command, DirectoryError, OperationRejected,
    Transaction,
};

/// Accounts keyed by account number
pub struct Directory {
    /// Rules every account opened here is created with
    policy: AccountPolicy,
    /// Map of account number to account
    accounts: DashMap<String, Arc<Mutex<Account>>>,
    /// Number of accounts successfully opened
    opened: AtomicUsize,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new(AccountPolicy::default())
    }
}

impl Directory {
    /// Create an empty directory opening accounts under `policy`
    pub fn new(policy: AccountPolicy) -> Self {
        Self {
            policy,
            accounts: DashMap::new(),
            opened: AtomicUsize::new(0),
        }
    }

    /// Number of accounts held
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Check whether the directory holds no accounts
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Number of accounts opened over the directory's lifetime
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::Relaxed)
    }

    /// Open a new account under the directory's policy
    pub fn open(
        &self,
        owner: &str,
        account_number: &str,
        account_type: &str,
        initial_deposit: Decimal,
    ) -> Result<(), DirectoryError> {
        let account = Account::create(
            owner,
            account_number,
            account_type,
            initial_deposit,
            &self.policy,
        )?;
        self.insert(account)
    }

    /// Add an already created account
    pub fn insert(&self, account: Account) -> Result<(), DirectoryError> {
        match self.accounts.entry(account.account_number().to_string()) {
            Entry::Occupied(entry) => Err(DirectoryError::DuplicateAccount(entry.key().clone())),
            Entry::Vacant(entry) => {
                debug!(
                    account = account.account_number(),
                    owner = account.owner(),
                    balance = %account.balance(),
                    "account opened"
                );
                entry.insert(Arc::new(Mutex::new(account)));
                self.opened.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
        }
    }

    /// Deposit funds into an account
    pub fn deposit(&self, account_number: &str, amount: Decimal) -> Result<(), DirectoryError> {
        self.get(account_number)?.lock().deposit(amount)?;
        debug!(account = account_number, %amount, "deposit applied");
        Ok(())
    }

    /// Withdraw funds from an account
    pub fn withdraw(&self, account_number: &str, amount: Decimal) -> Result<(), DirectoryError> {
        self.get(account_number)?.lock().withdraw(amount)?;
        debug!(account = account_number, %amount, "withdrawal applied");
        Ok(())
    }

    /// Move funds between two accounts
    pub fn transfer(&self, from: &str, to: &str, amount: Decimal) -> Result<(), DirectoryError> {
        if from == to {
            return Err(OperationRejected::SameAccount.into());
        }
        let source = self.get(from)?;
        let target = self.get(to)?;

        // lock in account-number order
        let (mut source, mut target) = if from < to {
            let source = source.lock();
            (source, target.lock())
        } else {
            let target = target.lock();
            (source.lock(), target)
        };
        source.transfer_to(&mut target, amount)?;
        debug!(from, to, %amount, "transfer applied");
        Ok(())
    }

    /// Credit interest to a savings account, returning the amount credited
    pub fn apply_interest(
        &self,
        account_number: &str,
        rate: Decimal,
    ) -> Result<Decimal, DirectoryError> {
        let interest = self.get(account_number)?.lock().apply_interest(rate)?;
        debug!(account = account_number, %interest, "interest applied");
        Ok(interest)
    }

    /// Apply a single command
    pub fn apply(&self, command: Command) -> Result<(), DirectoryError> {
        use Command::*;
        match command {
            Open {
                account,
                owner,
                account_type,
                initial_deposit,
            } => self.open(&owner, &account, &account_type, initial_deposit),
            Deposit { account, amount } => self.deposit(&account, amount),
            Withdraw { account, amount } => self.withdraw(&account, amount),
            Transfer { from, to, amount } => self.transfer(&from, &to, amount),
            Interest { account, rate } => self.apply_interest(&account, rate).map(|_| ()),
        }
    }

    /// Copy of an account's transaction history
    pub fn history(&self, account_number: &str) -> Result<Vec<Transaction>, DirectoryError> {
        Ok(self
            .get(account_number)?
            .lock()
            .transaction_history()
            .to_vec())
    }

    /// Get a snapshot of one account
    pub fn snapshot(&self, account_number: &str) -> Result<AccountSnapshot, DirectoryError> {
        Ok(self.get(account_number)?.lock().snapshot())
    }

    /// Get snapshots of all accounts, ordered by account number
    pub fn snapshots(&self) -> Vec<AccountSnapshot> {
        let mut snapshots: Vec<_> = self
            .accounts
            .iter()
            .map(|entry| entry.value().lock().snapshot())
            .collect();
        snapshots.sort_by(|a, b| a.account_number.cmp(&b.account_number));
        snapshots
    }

    /// Look up an account, releasing the map entry before the account is locked
    fn get(&self, account_number: &str) -> Result<Arc<Mutex<Account>>, DirectoryError> {
        self.accounts
            .get(account_number)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| DirectoryError::UnknownAccount(account_number.to_string()))
    }
}
