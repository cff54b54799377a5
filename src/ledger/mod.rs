pub mod account;
pub mod error;
pub mod picks;
pub mod profile;

pub use account::{Ledger, DEFAULT_BALANCE};
pub use error::{LedgerError, LedgerResult, Rejection};
pub use picks::{PickSet, SlipState};
