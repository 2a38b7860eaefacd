//! Property-based tests for balance invariants.
//!
//! 1. **Non-negative balance**: no sequence of operations drives a balance below zero
//! 2. **Log growth**: each successful deposit or withdrawal adds exactly one record, each
//!    successful transfer exactly one record per side
//! 3. **Conservation**: transfers never create or destroy funds

use account_ledger::{Account, AccountPolicy, OperationRejected};
use proptest::prelude::*;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
enum Operation {
    Deposit(Decimal),
    Withdraw(Decimal),
    TransferOut(Decimal),
    TransferIn(Decimal),
}

fn amount() -> impl Strategy<Value = Decimal> {
    (-10_000i64..200_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        amount().prop_map(Operation::Deposit),
        amount().prop_map(Operation::Withdraw),
        amount().prop_map(Operation::TransferOut),
        amount().prop_map(Operation::TransferIn),
    ]
}

fn pair(cap: Option<Decimal>) -> (Account, Account) {
    let mut policy = AccountPolicy::default();
    policy.max_transaction = cap;
    let left = Account::create("Left", "1000000001", "Savings", Decimal::new(50_000, 2), &policy)
        .unwrap();
    let right = Account::create(
        "Right",
        "1000000002",
        "Checking",
        Decimal::ZERO,
        &AccountPolicy::default(),
    )
    .unwrap();
    (left, right)
}

fn apply(
    left: &mut Account,
    right: &mut Account,
    operation: &Operation,
) -> Result<(), OperationRejected> {
    match *operation {
        Operation::Deposit(amount) => left.deposit(amount),
        Operation::Withdraw(amount) => left.withdraw(amount),
        Operation::TransferOut(amount) => left.transfer_to(right, amount),
        Operation::TransferIn(amount) => right.transfer_to(left, amount),
    }
}

proptest! {
    #[test]
    fn prop_balance_never_negative(
        operations in prop::collection::vec(operation(), 0..64),
        capped in any::<bool>(),
    ) {
        let cap = capped.then(|| Decimal::new(100_000, 2));
        let (mut left, mut right) = pair(cap);
        for operation in &operations {
            let _ = apply(&mut left, &mut right, operation);
            prop_assert!(left.balance() >= Decimal::ZERO);
            prop_assert!(right.balance() >= Decimal::ZERO);
        }
    }

    #[test]
    fn prop_log_grows_by_one_per_side(operations in prop::collection::vec(operation(), 0..64)) {
        let (mut left, mut right) = pair(None);
        for operation in &operations {
            let (left_before, right_before) =
                (left.transaction_history().len(), right.transaction_history().len());
            let applied = apply(&mut left, &mut right, operation).is_ok();
            let (left_growth, right_growth) = (
                left.transaction_history().len() - left_before,
                right.transaction_history().len() - right_before,
            );
            match (operation, applied) {
                (Operation::Deposit(_) | Operation::Withdraw(_), true) => {
                    prop_assert_eq!((left_growth, right_growth), (1, 0));
                }
                (Operation::TransferOut(_) | Operation::TransferIn(_), true) => {
                    prop_assert_eq!((left_growth, right_growth), (1, 1));
                }
                (_, false) => {
                    prop_assert_eq!((left_growth, right_growth), (0, 0));
                }
            }
        }
    }

    #[test]
    fn prop_transfers_conserve_funds(amounts in prop::collection::vec(amount(), 0..64)) {
        let (mut left, mut right) = pair(None);
        let total = left.balance() + right.balance();
        for (index, amount) in amounts.into_iter().enumerate() {
            let _ = if index % 2 == 0 {
                left.transfer_to(&mut right, amount)
            } else {
                right.transfer_to(&mut left, amount)
            };
            prop_assert_eq!(left.balance() + right.balance(), total);
        }
    }
}
