//! # Policy
//!
//! `policy` holds the per-ledger rules an account is validated against: the account number
//! format, the optional per-transaction limit, which account types may be opened and the
//! minimum opening deposit.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Minimum opening deposit of a savings account opened with [`crate::Account::savings`]
pub const SAVINGS_MINIMUM_DEPOSIT: Decimal = Decimal::ONE_HUNDRED;

/// Account type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AccountType {
    Savings,
    Checking,
    Business,
    Investment,
}

impl AccountType {
    /// All account types, in declaration order
    pub const ALL: [AccountType; 4] = [
        AccountType::Savings,
        AccountType::Checking,
        AccountType::Business,
        AccountType::Investment,
    ];

    /// Capitalized name, e.g. `Savings`
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Savings => "Savings",
            AccountType::Checking => "Checking",
            AccountType::Business => "Business",
            AccountType::Investment => "Investment",
        }
    }
}

impl FromStr for AccountType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "savings" => Ok(AccountType::Savings),
            "checking" => Ok(AccountType::Checking),
            "business" => Ok(AccountType::Business),
            "investment" => Ok(AccountType::Investment),
            _ => Err(ValidationError::InvalidAccountType(s.to_string())),
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation rules applied to an account for its whole life
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountPolicy {
    /// Exact number of characters in an account number
    pub account_number_length: usize,
    /// Largest amount a single deposit, withdrawal or transfer may move; `None` means no limit
    pub max_transaction: Option<Decimal>,
    /// Account types that may be opened
    pub allowed_account_types: Vec<AccountType>,
    /// Smallest opening balance
    pub minimum_initial_deposit: Decimal,
}

impl Default for AccountPolicy {
    fn default() -> Self {
        Self {
            account_number_length: 10,
            max_transaction: None,
            allowed_account_types: AccountType::ALL.to_vec(),
            minimum_initial_deposit: Decimal::ZERO,
        }
    }
}

impl AccountPolicy {
    /// Limit every deposit, withdrawal and transfer to at most `cap`
    pub fn with_max_transaction(mut self, cap: Decimal) -> Self {
        self.max_transaction = Some(cap);
        self
    }

    /// Restrict which account types may be opened
    pub fn with_account_types(mut self, types: impl IntoIterator<Item = AccountType>) -> Self {
        self.allowed_account_types = types.into_iter().collect();
        self
    }

    /// Require at least `minimum` as the opening balance
    pub fn with_minimum_initial_deposit(mut self, minimum: Decimal) -> Self {
        self.minimum_initial_deposit = minimum;
        self
    }

    /// Parse a policy from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
