//! # Validation
//!
//! `validation` is a module of pure predicates used when opening accounts and moving funds.

use rust_decimal::Decimal;

use crate::AccountType;

/// Check that an amount is strictly positive and, if a limit is given, does not exceed it
pub fn is_positive_amount(amount: Decimal, cap: Option<Decimal>) -> bool {
    amount > Decimal::ZERO && cap.map_or(true, |cap| amount <= cap)
}

/// Check that a balance covers an amount
pub fn has_sufficient_funds(balance: Decimal, amount: Decimal) -> bool {
    balance >= amount
}

/// Check that an account number is non-blank and exactly `length` characters long
pub fn is_valid_account_number(number: &str, length: usize) -> bool {
    !number.trim().is_empty() && number.chars().count() == length
}

/// Check that `account_type` names one of the allowed account types
pub fn is_valid_account_type(account_type: &str, allowed: &[AccountType]) -> bool {
    account_type
        .parse::<AccountType>()
        .map_or(false, |parsed| allowed.contains(&parsed))
}
