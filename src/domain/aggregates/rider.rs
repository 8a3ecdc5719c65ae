//! Rider payouts and cash reconciliation

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderEarning {
    pub rider_id: String,
    pub order_id: Option<String>,
    pub base_payout: Decimal,
    pub distance_bonus: Decimal,
    pub surge_bonus: Decimal,
    pub incentive: Decimal,
    pub total: Decimal,
    pub date: NaiveDate,
}

impl RiderEarning {
    pub fn new(rider_id: impl Into<String>, date: NaiveDate, base_payout: Decimal, distance_bonus: Decimal, surge_bonus: Decimal, incentive: Decimal) -> Self {
        Self {
            rider_id: rider_id.into(), order_id: None, base_payout, distance_bonus, surge_bonus, incentive,
            total: base_payout + distance_bonus + surge_bonus + incentive, date,
        }
    }

    pub fn for_order(mut self, order_id: impl Into<String>) -> Self { self.order_id = Some(order_id.into()); self }
}

/// Cash a rider collected on delivery against what was handed in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiderCashDeposit {
    pub rider_id: String,
    pub date: NaiveDate,
    pub total_collected: Decimal,
    pub deposited_amount: Decimal,
    pub verified: bool,
}

impl RiderCashDeposit {
    /// Positive when the rider still owes cash.
    pub fn discrepancy(&self) -> Decimal { self.total_collected - self.deposited_amount }
    pub fn is_settled(&self) -> bool { self.discrepancy().is_zero() }
}
