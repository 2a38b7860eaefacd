//! # Account Ledger
//!
//! `account_ledger` is a library for opening accounts and moving funds between them under an
//! explicit validation policy.
//!
//! An [`Account`] keeps a non-negative balance and an append-only log of every balance change.
//! Operations that break a rule are rejected with an [`OperationRejected`] and leave the account
//! untouched; invalid fields at creation are reported as a [`ValidationError`]. A [`Directory`]
//! manages many accounts by number and can be shared between threads.

mod account;
mod command;
mod directory;
mod error;
mod policy;
mod transaction;
pub mod validation;

pub use account::{Account, AccountSnapshot};
pub use command::Command;
pub use directory::Directory;
pub use error::{DirectoryError, OperationRejected, ValidationError};
pub use policy::{AccountPolicy, AccountType, SAVINGS_MINIMUM_DEPOSIT};
pub use transaction::{Transaction, TransactionKind};
