//! # Account
//!
//! `account` is a module providing functionality for operating on a single account.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::{
    policy::SAVINGS_MINIMUM_DEPOSIT,
    validation::{has_sufficient_funds, is_positive_amount, is_valid_account_number},
    AccountPolicy, AccountType, OperationRejected, Transaction, TransactionKind, ValidationError,
};

/// Serializable snapshot of an account
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AccountSnapshot {
    /// Account number
    #[serde(rename = "account")]
    pub account_number: String,
    /// Owner's name
    pub owner: String,
    /// Account type
    #[serde(rename = "type")]
    pub account_type: AccountType,
    /// Current balance
    pub balance: Decimal,
    /// Number of recorded transactions
    pub transactions: usize,
}

/// An owner's account
#[derive(Debug, Clone)]
pub struct Account {
    /// Account number, fixed at creation
    account_number: String,
    /// Owner's name
    owner: String,
    /// Account type
    account_type: AccountType,
    /// Current balance, never negative
    balance: Decimal,
    /// Creation time
    created_at: DateTime<Utc>,
    /// Append-only record of balance changes
    transactions: Vec<Transaction>,
    /// Rules every operation is checked against
    policy: AccountPolicy,
}

impl Account {
    /// Open a new account, validating every field against `policy`
    pub fn create(
        owner: &str,
        account_number: &str,
        account_type: &str,
        initial_deposit: Decimal,
        policy: &AccountPolicy,
    ) -> Result<Self, ValidationError> {
        let owner = owner.trim();
        if owner.is_empty() {
            return Err(ValidationError::EmptyOwnerName);
        }
        if !is_valid_account_number(account_number, policy.account_number_length) {
            return Err(ValidationError::InvalidAccountNumber {
                number: account_number.to_string(),
                expected: policy.account_number_length,
            });
        }
        let parsed_type = account_type.parse::<AccountType>()?;
        if !policy.allowed_account_types.contains(&parsed_type) {
            return Err(ValidationError::InvalidAccountType(account_type.to_string()));
        }
        if initial_deposit < Decimal::ZERO {
            return Err(ValidationError::NegativeInitialDeposit(initial_deposit));
        }
        if initial_deposit < policy.minimum_initial_deposit {
            return Err(ValidationError::BelowMinimumDeposit {
                amount: initial_deposit,
                minimum: policy.minimum_initial_deposit,
            });
        }

        let mut account = Self {
            account_number: account_number.to_string(),
            owner: owner.to_string(),
            account_type: parsed_type,
            balance: initial_deposit,
            created_at: Utc::now(),
            transactions: Vec::new(),
            policy: policy.clone(),
        };
        if initial_deposit > Decimal::ZERO {
            account.record(TransactionKind::InitialDeposit, initial_deposit);
        }
        Ok(account)
    }

    /// Open a savings account with the conventional minimum deposit
    pub fn savings(
        owner: &str,
        account_number: &str,
        policy: &AccountPolicy,
    ) -> Result<Self, ValidationError> {
        Self::create(
            owner,
            account_number,
            AccountType::Savings.as_str(),
            SAVINGS_MINIMUM_DEPOSIT,
            policy,
        )
    }

    /// Account number
    pub fn account_number(&self) -> &str {
        &self.account_number
    }

    /// Owner's name, trimmed
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Account type
    pub fn account_type(&self) -> AccountType {
        self.account_type
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Time the account was opened
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Deposit funds into the account
    pub fn deposit(&mut self, amount: Decimal) -> Result<(), OperationRejected> {
        self.credit(amount, TransactionKind::Deposit)
    }

    /// Withdraw funds from the account
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), OperationRejected> {
        self.debit(amount, TransactionKind::Withdrawal)
    }

    /// Move funds to another account
    ///
    /// The transfer is a withdrawal here followed by a deposit into `target`. If `target`
    /// refuses the deposit, the amount is redeposited here and the transfer is rejected.
    pub fn transfer_to(
        &mut self,
        target: &mut Account,
        amount: Decimal,
    ) -> Result<(), OperationRejected> {
        if target.account_number == self.account_number {
            return Err(OperationRejected::SameAccount);
        }
        if amount <= Decimal::ZERO {
            return Err(OperationRejected::NonPositiveAmount(amount));
        }

        self.debit(
            amount,
            TransactionKind::TransferOut {
                to: target.owner.clone(),
            },
        )?;
        let credited = target.credit(
            amount,
            TransactionKind::TransferIn {
                from: self.owner.clone(),
            },
        );
        if let Err(reason) = credited {
            // redeposit directly; the debit above already passed the amount checks
            self.balance += amount;
            self.record(
                TransactionKind::TransferReversal {
                    to: target.owner.clone(),
                },
                amount,
            );
            return Err(OperationRejected::TransferReversed {
                target: target.account_number.clone(),
                reason: Box::new(reason),
            });
        }
        Ok(())
    }

    /// Credit interest at `rate` on the current balance, rounded to cents
    pub fn apply_interest(&mut self, rate: Decimal) -> Result<Decimal, OperationRejected> {
        if self.account_type != AccountType::Savings {
            return Err(OperationRejected::NotSavings);
        }
        let interest = self
            .balance
            .checked_mul(rate)
            .ok_or(OperationRejected::Overflow(rate))?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven);
        self.credit(interest, TransactionKind::Interest)?;
        Ok(interest)
    }

    /// Recorded transactions in the order they happened
    pub fn transaction_history(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The last `count` transactions, oldest first
    pub fn recent_transactions(&self, count: usize) -> &[Transaction] {
        let start = self.transactions.len().saturating_sub(count);
        &self.transactions[start..]
    }

    /// Get a snapshot of the account
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            account_number: self.account_number.clone(),
            owner: self.owner.clone(),
            account_type: self.account_type,
            balance: self.balance,
            transactions: self.transactions.len(),
        }
    }

    /// Reject amounts that are not positive or exceed the per-transaction limit
    fn check_amount(&self, amount: Decimal) -> Result<(), OperationRejected> {
        if is_positive_amount(amount, self.policy.max_transaction) {
            return Ok(());
        }
        match self.policy.max_transaction {
            Some(cap) if amount > cap => Err(OperationRejected::ExceedsLimit { amount, cap }),
            _ => Err(OperationRejected::NonPositiveAmount(amount)),
        }
    }

    fn credit(&mut self, amount: Decimal, kind: TransactionKind) -> Result<(), OperationRejected> {
        self.check_amount(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(OperationRejected::Overflow(amount))?;
        self.record(kind, amount);
        Ok(())
    }

    fn debit(&mut self, amount: Decimal, kind: TransactionKind) -> Result<(), OperationRejected> {
        self.check_amount(amount)?;
        // if insufficient funds, reject
        if !has_sufficient_funds(self.balance, amount) {
            return Err(OperationRejected::InsufficientFunds {
                needed: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.record(kind, -amount);
        Ok(())
    }

    fn record(&mut self, kind: TransactionKind, amount: Decimal) {
        self.transactions.push(Transaction::new(kind, amount));
    }
}
