//! Coupon Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::value_objects::CouponCode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    #[default]
    Percentage,
    Fixed,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: CouponCode,
    #[serde(default)]
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    #[serde(default)]
    pub minimum_amount: Decimal,
    #[serde(default)]
    pub maximum_discount: Option<Decimal>,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
    #[serde(default)]
    pub usage_limit: Option<u32>,
    #[serde(default)]
    pub used_count: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool { true }

impl Coupon {
    pub fn percentage(code: CouponCode, percent: Decimal, valid_from: DateTime<Utc>, valid_to: DateTime<Utc>) -> Self {
        Self {
            code, discount_type: DiscountType::Percentage, discount_value: percent,
            minimum_amount: Decimal::ZERO, maximum_discount: None, valid_from, valid_to,
            usage_limit: None, used_count: 0, is_active: true,
        }
    }

    pub fn fixed(code: CouponCode, amount: Decimal, valid_from: DateTime<Utc>, valid_to: DateTime<Utc>) -> Self {
        Self { discount_type: DiscountType::Fixed, ..Self::percentage(code, amount, valid_from, valid_to) }
    }

    pub fn with_minimum_amount(mut self, amount: Decimal) -> Self { self.minimum_amount = amount; self }
    pub fn with_maximum_discount(mut self, cap: Decimal) -> Self { self.maximum_discount = Some(cap); self }
    pub fn with_usage(mut self, limit: u32, used: u32) -> Self { self.usage_limit = Some(limit); self.used_count = used; self }

    /// Both ends of the validity window are inclusive. A usage limit of 0
    /// means unlimited.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        if !self.is_active { return false; }
        if now < self.valid_from || now > self.valid_to { return false; }
        match self.usage_limit {
            Some(limit) if limit > 0 => self.used_count < limit,
            _ => true,
        }
    }

    /// Discount this coupon grants on `amount` at `now`, or `None` if the
    /// percentage overflows.
    ///
    /// A fixed discount is returned as-is, even when it exceeds `amount`. A
    /// maximum discount of 0 means uncapped.
    pub fn discount_for(&self, amount: Decimal, now: DateTime<Utc>) -> Option<Decimal> {
        if !self.is_valid(now) || amount < self.minimum_amount {
            return Some(Decimal::ZERO);
        }
        match self.discount_type {
            DiscountType::Percentage => {
                let discount = amount.checked_mul(self.discount_value)?.checked_div(Decimal::ONE_HUNDRED)?;
                match self.maximum_discount {
                    Some(cap) if !cap.is_zero() => Some(discount.min(cap)),
                    _ => Some(discount),
                }
            }
            DiscountType::Fixed => Some(self.discount_value),
        }
    }
}

/// Coupons usable at `now`, in input order.
pub fn active_coupons(coupons: &[Coupon], now: DateTime<Utc>) -> Vec<&Coupon> {
    coupons.iter().filter(|c| c.is_valid(now)).collect()
}
