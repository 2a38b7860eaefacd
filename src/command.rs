//! # Command
//!
//! `command` describes one ledger operation addressed to accounts by number.

use rust_decimal::Decimal;

/// A single ledger operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open a new account
    Open {
        account: String,
        owner: String,
        account_type: String,
        initial_deposit: Decimal,
    },
    Deposit {
        account: String,
        amount: Decimal,
    },
    Withdraw {
        account: String,
        amount: Decimal,
    },
    Transfer {
        from: String,
        to: String,
        amount: Decimal,
    },
    /// Credit interest to a savings account
    Interest {
        account: String,
        rate: Decimal,
    },
}

impl Command {
    /// Account number the command originates from
    pub fn account(&self) -> &str {
        use Command::*;
        match self {
            Open { account, .. }
            | Deposit { account, .. }
            | Withdraw { account, .. }
            | Interest { account, .. } => account,
            Transfer { from, .. } => from,
        }
    }
}
