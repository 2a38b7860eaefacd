//! # Errors
//!
//! `error` defines the failures surfaced by accounts and the directory.

use rust_decimal::Decimal;
use thiserror::Error;

/// Construction-time failure, fatal to the `create` call that raised it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("owner name cannot be empty")]
    EmptyOwnerName,

    #[error("account number must be exactly {expected} characters: {number:?}")]
    InvalidAccountNumber { number: String, expected: usize },

    #[error("invalid account type: {0}")]
    InvalidAccountType(String),

    #[error("initial deposit cannot be negative: {0}")]
    NegativeInitialDeposit(Decimal),

    #[error("initial deposit {amount} is below the minimum of {minimum}")]
    BelowMinimumDeposit { amount: Decimal, minimum: Decimal },
}

/// Runtime rejection of a balance-affecting operation; the account is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationRejected {
    #[error("amount must be positive: {0}")]
    NonPositiveAmount(Decimal),

    #[error("amount {amount} exceeds the per-transaction limit of {cap}")]
    ExceedsLimit { amount: Decimal, cap: Decimal },

    #[error("insufficient funds: need {needed}, available {available}")]
    InsufficientFunds { needed: Decimal, available: Decimal },

    #[error("cannot transfer to the same account")]
    SameAccount,

    #[error("transfer to {target} failed and was reversed: {reason}")]
    TransferReversed {
        target: String,
        reason: Box<OperationRejected>,
    },

    #[error("interest only applies to savings accounts")]
    NotSavings,

    #[error("amount {0} would overflow the balance")]
    Overflow(Decimal),
}

/// Failure of a directory operation addressed by account number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("unknown account: {0}")]
    UnknownAccount(String),

    #[error("account already exists: {0}")]
    DuplicateAccount(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Rejected(#[from] OperationRejected),
}

impl OperationRejected {
    /// Check whether the rejection was caused by a lack of funds
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, OperationRejected::InsufficientFunds { .. })
    }
}
