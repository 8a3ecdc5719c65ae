//! Pricing calculator
//!
//! Stateless price, coupon and delivery arithmetic. Every operation takes its
//! records by reference and never mutates them; the only state the
//! calculator carries is the pair of policies in [`PricingConfig`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::{PricingConfig, SlabFallback, SurgeStacking};
use crate::domain::aggregates::{find_slab, Coupon, DeliveryZone, DistanceSlab, PricedItem, SurgePolicy, SurgeType};
use crate::{GroceryError, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct PricingCalculator {
    config: PricingConfig,
}

impl PricingCalculator {
    pub fn new(config: PricingConfig) -> Self { Self { config } }
    pub fn config(&self) -> &PricingConfig { &self.config }

    pub fn final_price(&self, item: &PricedItem) -> Decimal { item.final_price() }
    pub fn profit_margin(&self, item: &PricedItem) -> Decimal { item.profit_margin() }
    pub fn discount_percentage(&self, item: &PricedItem) -> Decimal { item.discount_percentage() }

    pub fn coupon_is_valid(&self, coupon: &Coupon, now: DateTime<Utc>) -> bool { coupon.is_valid(now) }

    pub fn coupon_discount(&self, coupon: &Coupon, order_amount: Decimal, now: DateTime<Utc>) -> Result<Decimal> {
        let discount = coupon.discount_for(order_amount, now).ok_or(GroceryError::AmountOverflow("coupon discount"))?;
        if discount.is_zero() {
            tracing::debug!(code = %coupon.code, %order_amount, "coupon grants no discount");
        }
        Ok(discount)
    }

    /// Zone base fare plus the additional charge of the slab containing
    /// `distance`.
    ///
    /// With [`SlabFallback::Reject`] a distance outside every slab is an
    /// error; with [`SlabFallback::BaseFareOnly`] only the base fare is
    /// charged.
    pub fn delivery_charge(&self, zone: &DeliveryZone, distance: Decimal, slabs: &[DistanceSlab]) -> Result<Decimal> {
        match find_slab(slabs, distance) {
            Some(slab) => zone.base_fare.checked_add(slab.additional_charge).ok_or(GroceryError::AmountOverflow("delivery charge")),
            None => {
                tracing::warn!(zone = %zone.name, %distance, policy = ?self.config.slab_fallback, "distance outside all slabs");
                match self.config.slab_fallback {
                    SlabFallback::Reject => Err(GroceryError::DistanceOutOfRange { distance }),
                    SlabFallback::BaseFareOnly => Ok(zone.base_fare),
                }
            }
        }
    }

    /// Surcharge for the surge `conditions` currently in effect.
    ///
    /// Only active policies whose type is in `conditions` apply. Each one is
    /// priced at `intensity` within its min/max range, then combined per the
    /// configured [`SurgeStacking`].
    pub fn surge_charge(&self, policies: &[SurgePolicy], conditions: &[SurgeType], intensity: Decimal) -> Result<Decimal> {
        let amounts = policies
            .iter()
            .filter(|p| p.is_active && conditions.contains(&p.surge_type))
            .map(|p| p.amount_at(intensity))
            .collect::<Option<Vec<_>>>()
            .ok_or(GroceryError::AmountOverflow("surge charge"))?;
        match self.config.surge_stacking {
            SurgeStacking::Highest => Ok(amounts.into_iter().max().unwrap_or(Decimal::ZERO)),
            SurgeStacking::Additive => amounts
                .into_iter()
                .try_fold(Decimal::ZERO, Decimal::checked_add)
                .ok_or(GroceryError::AmountOverflow("surge charge")),
        }
    }
}
