//! Delivery configuration: zones, distance slabs and surge policies.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryZone {
    pub name: String,
    pub base_fare: Decimal,
}

impl DeliveryZone {
    pub fn new(name: impl Into<String>, base_fare: Decimal) -> Self { Self { name: name.into(), base_fare } }
}

/// Extra charge for distances in `[min_distance, max_distance)` km.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistanceSlab {
    pub min_distance: Decimal,
    pub max_distance: Decimal,
    pub additional_charge: Decimal,
}

impl DistanceSlab {
    pub fn new(min_distance: Decimal, max_distance: Decimal, additional_charge: Decimal) -> Self {
        Self { min_distance, max_distance, additional_charge }
    }

    pub fn contains(&self, distance: Decimal) -> bool {
        distance >= self.min_distance && distance < self.max_distance
    }
}

/// First slab containing `distance`. Slabs are expected not to overlap.
pub fn find_slab(slabs: &[DistanceSlab], distance: Decimal) -> Option<&DistanceSlab> {
    slabs.iter().find(|s| s.contains(distance))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeType {
    PeakHour,
    BadWeather,
    Event,
    RiderShortage,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurgePolicy {
    pub surge_type: SurgeType,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool { true }

impl SurgePolicy {
    pub fn new(surge_type: SurgeType, min_amount: Decimal, max_amount: Decimal) -> Self {
        Self { surge_type, min_amount, max_amount, is_active: true }
    }

    /// Amount between min and max for an intensity in `[0, 1]`; out of range
    /// intensities are clamped. `None` when the range overflows.
    pub fn amount_at(&self, intensity: Decimal) -> Option<Decimal> {
        let intensity = intensity.max(Decimal::ZERO).min(Decimal::ONE);
        let spread = self.max_amount.checked_sub(self.min_amount)?.checked_mul(intensity)?;
        self.min_amount.checked_add(spread)
    }
}

/// Flat-rate delivery destinations charged from store settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryLocation {
    #[default]
    InsideDhaka,
    OutsideDhaka,
}
