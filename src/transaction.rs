//! # Transaction
//!
//! `transaction` is a module describing the immutable records an account keeps of every
//! balance change.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// What caused a balance change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransactionKind {
    InitialDeposit,
    Deposit,
    Withdrawal,
    /// Outgoing transfer, named by the receiving owner
    TransferOut { to: String },
    /// Incoming transfer, named by the sending owner
    TransferIn { from: String },
    /// Funds returned after a transfer could not be credited to `to`
    TransferReversal { to: String },
    Interest,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TransactionKind::*;
        match self {
            InitialDeposit => f.write_str("Initial Deposit"),
            Deposit => f.write_str("Deposit"),
            Withdrawal => f.write_str("Withdrawal"),
            TransferOut { to } => write!(f, "Transferred to {to}"),
            TransferIn { from } => write!(f, "Received from {from}"),
            TransferReversal { to } => write!(f, "Transfer to {to} reversed"),
            Interest => f.write_str("Interest Applied"),
        }
    }
}

/// A single balance change; debits carry a negative amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    #[serde(flatten)]
    kind: TransactionKind,
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Record a balance change happening now
    pub(crate) fn new(kind: TransactionKind, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            timestamp: Utc::now(),
        }
    }

    /// Human-readable label, e.g. `Transferred to Jane Smith`
    pub fn label(&self) -> String {
        self.kind.to_string()
    }

    /// Signed amount; negative for debits
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Time the change was recorded
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}: {:.2}",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.kind,
            self.amount
        )
    }
}
