use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use super::{LedgerResult, PickSet, Rejection, SlipState};
use crate::db::{keys, load_json, to_json, StateStore};
use crate::models::{Match, Outcome, Pick, Slip};

/// Balance of a fresh or reset account
pub const DEFAULT_BALANCE: Decimal = dec!(1000);

/// Highest balance a deposit may reach; cents below it survive the float on disk
pub const MAX_BALANCE: Decimal = dec!(1000000000000);

/// Balance as stored on disk (a plain JSON number)
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
struct StoredBalance(#[serde(with = "rust_decimal::serde::float")] Decimal);

/// Virtual balance, confirmed slips and the slip being built
///
/// Every change to the balance or slip history is written to the state store
/// before it is applied in memory.
pub struct Ledger {
    state: Arc<dyn StateStore>,
    balance: Decimal,
    /// Most recent first
    slips: Vec<Slip>,
    picks: PickSet,
}

impl Ledger {
    /// Load balance and slip history; missing or corrupt entries fall back to defaults
    pub async fn open(state: Arc<dyn StateStore>) -> Self {
        let balance = load_json::<StoredBalance>(state.as_ref(), keys::BALANCE)
            .await
            .map(|b| b.0)
            .unwrap_or(DEFAULT_BALANCE);

        let slips: Vec<Slip> = load_json(state.as_ref(), keys::SAVED_SLIPS)
            .await
            .unwrap_or_default();

        info!(
            "Ledger opened (balance: {}, {} slips)",
            balance.round_dp(2),
            slips.len()
        );

        Self {
            state,
            balance,
            slips,
            picks: PickSet::new(),
        }
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Confirmed slips, most recent first
    pub fn slips(&self) -> &[Slip] {
        &self.slips
    }

    pub fn current_picks(&self) -> &[Pick] {
        self.picks.picks()
    }

    pub fn slip_state(&self) -> SlipState {
        self.picks.state()
    }

    /// Accumulator odd of the current picks (1 when there are none)
    pub fn total_odd(&self) -> Decimal {
        self.picks.total_odd()
    }

    /// Payout the current picks would return for `stake`, `None` on overflow
    pub fn potential_win(&self, stake: Decimal) -> Option<Decimal> {
        self.picks.potential_win(stake)
    }

    /// Add a pick to the slip being built
    pub fn add_pick(&mut self, fixture: &Match, outcome: Outcome, odd: Decimal) -> Result<Uuid, Rejection> {
        let id = self.picks.add(fixture, outcome, odd)?;
        debug!(
            "Added pick {} on {} at {} ({} picks)",
            outcome.label(),
            fixture.title(),
            odd,
            self.picks.len()
        );
        Ok(id)
    }

    /// Add a pick at the odd the match currently offers for `outcome`
    pub fn add_market_pick(&mut self, fixture: &Match, outcome: Outcome) -> Result<Uuid, Rejection> {
        let odd = fixture
            .odds
            .odd_for(outcome)
            .ok_or(Rejection::MarketUnavailable(outcome))?;
        self.add_pick(fixture, outcome, odd)
    }

    pub fn remove_pick(&mut self, pick_id: Uuid) -> bool {
        self.picks.remove(pick_id)
    }

    pub fn clear_picks(&mut self) {
        self.picks.clear();
    }

    /// Place the current picks as a slip for `stake`
    ///
    /// Refused without any state change when there are no picks, the stake
    /// is not a positive whole number of cents, the stake exceeds the balance,
    /// or the payout does not fit a `Decimal`.
    pub async fn confirm(&mut self, stake: Decimal) -> LedgerResult<Slip> {
        if self.picks.is_empty() {
            return Err(Rejection::EmptySlip.into());
        }
        if stake <= Decimal::ZERO {
            return Err(Rejection::NonPositiveStake(stake).into());
        }
        if has_sub_cents(stake) {
            return Err(Rejection::SubCentAmount(stake).into());
        }
        if stake > self.balance {
            return Err(Rejection::InsufficientBalance {
                stake,
                balance: self.balance,
            }
            .into());
        }

        let slip = Slip::place(self.picks.picks().to_vec(), stake, Utc::now()).ok_or(
            Rejection::PayoutOverflow {
                stake,
                total_odd: self.picks.total_odd(),
            },
        )?;
        let balance = self.balance - stake;

        let mut slips = Vec::with_capacity(self.slips.len() + 1);
        slips.push(slip.clone());
        slips.extend(self.slips.iter().cloned());

        self.persist(balance, &slips).await?;

        self.balance = balance;
        self.slips = slips;
        self.picks.take();

        info!(
            "Slip {} placed: {} legs, stake {}, odd {}, potential win {} (balance: {})",
            slip.id,
            slip.picks.len(),
            slip.stake,
            slip.total_odd,
            slip.potential_win.round_dp(2),
            self.balance.round_dp(2)
        );

        Ok(slip)
    }

    /// Restore the starting balance and forget all slips and picks
    ///
    /// The match cache is not touched.
    pub async fn reset_account(&mut self) -> LedgerResult<()> {
        self.persist(DEFAULT_BALANCE, &[]).await?;

        self.balance = DEFAULT_BALANCE;
        self.slips.clear();
        self.picks.clear();

        info!("Account reset (balance: {})", self.balance);
        Ok(())
    }

    /// Credit the balance, up to `MAX_BALANCE`
    pub async fn deposit_funds(&mut self, amount: Decimal) -> LedgerResult<Decimal> {
        if amount <= Decimal::ZERO {
            return Err(Rejection::NonPositiveDeposit(amount).into());
        }
        if has_sub_cents(amount) {
            return Err(Rejection::SubCentAmount(amount).into());
        }

        let balance = self
            .balance
            .checked_add(amount)
            .filter(|b| *b <= MAX_BALANCE)
            .ok_or(Rejection::BalanceLimit {
                amount,
                limit: MAX_BALANCE,
            })?;
        let raw = to_json(keys::BALANCE, &StoredBalance(balance))?;
        self.state.save(keys::BALANCE, &raw).await?;

        self.balance = balance;
        info!("Deposited {} (balance: {})", amount, self.balance.round_dp(2));
        Ok(self.balance)
    }

    /// Write balance and slip history in one transaction
    async fn persist(&self, balance: Decimal, slips: &[Slip]) -> anyhow::Result<()> {
        let entries = [
            (keys::BALANCE, to_json(keys::BALANCE, &StoredBalance(balance))?),
            (keys::SAVED_SLIPS, to_json(keys::SAVED_SLIPS, &slips)?),
        ];
        self.state.save_all(&entries).await
    }
}

fn has_sub_cents(amount: Decimal) -> bool {
    amount.round_dp(2) != amount
}
