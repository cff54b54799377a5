use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Outcome;

/// Reason a ledger operation was refused without changing state
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("match {0} already has a pick on this slip")]
    MatchAlreadyPicked(Uuid),

    #[error("odd {0} is not a valid decimal odd")]
    InvalidOdd(Decimal),

    #[error("odd {0} would overflow the accumulator odd")]
    OddOverflow(Decimal),

    #[error("no odd offered for outcome {}", .0.label())]
    MarketUnavailable(Outcome),

    #[error("slip has no picks")]
    EmptySlip,

    #[error("stake must be positive, got {0}")]
    NonPositiveStake(Decimal),

    #[error("stake {stake} exceeds balance {balance}")]
    InsufficientBalance { stake: Decimal, balance: Decimal },

    #[error("stake {stake} at odd {total_odd} pays more than can be represented")]
    PayoutOverflow { stake: Decimal, total_odd: Decimal },

    #[error("amount {0} has fractions of a cent")]
    SubCentAmount(Decimal),

    #[error("deposit must be positive, got {0}")]
    NonPositiveDeposit(Decimal),

    #[error("deposit {amount} would take the balance past {limit}")]
    BalanceLimit { amount: Decimal, limit: Decimal },
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("failed to persist ledger state: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl LedgerError {
    /// The rejection reason, if this was a refused operation
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            LedgerError::Rejected(r) => Some(r),
            LedgerError::Storage(_) => None,
        }
    }
}

pub type LedgerResult<T> = std::result::Result<T, LedgerError>;
