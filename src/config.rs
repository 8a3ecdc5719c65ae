//! Process configuration.
//!
//! Store settings are loaded once at startup and handed to whatever needs
//! them; there is exactly one [`AppConfig`] per process.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::aggregates::DeliveryLocation;
use crate::{GroceryError, Result};

/// How several simultaneously applicable surge policies combine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeStacking {
    /// Only the largest surcharge is charged.
    #[default]
    Highest,
    /// Every applicable surcharge is added up.
    Additive,
}

impl FromStr for SurgeStacking {
    type Err = GroceryError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "highest" => Ok(Self::Highest),
            "additive" => Ok(Self::Additive),
            other => Err(GroceryError::Config(format!("unknown surge stacking `{other}`"))),
        }
    }
}

/// What to charge when a distance falls outside every distance slab.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlabFallback {
    #[default]
    Reject,
    BaseFareOnly,
}

impl FromStr for SlabFallback {
    type Err = GroceryError;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "base_fare_only" => Ok(Self::BaseFareOnly),
            other => Err(GroceryError::Config(format!("unknown slab fallback `{other}`"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub surge_stacking: SurgeStacking,
    pub slab_fallback: SlabFallback,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    pub currency: String,
    pub currency_symbol: String,
    pub delivery_charge_inside_dhaka: Decimal,
    pub delivery_charge_outside_dhaka: Decimal,
    pub free_delivery_minimum_amount: Decimal,
    pub minimum_order_amount: Decimal,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            currency: "BDT".to_string(),
            currency_symbol: "৳".to_string(),
            delivery_charge_inside_dhaka: Decimal::from(60),
            delivery_charge_outside_dhaka: Decimal::from(130),
            free_delivery_minimum_amount: Decimal::from(1000),
            minimum_order_amount: Decimal::from(200),
        }
    }
}

impl StoreSettings {
    pub fn flat_delivery_charge(&self, location: DeliveryLocation) -> Decimal {
        match location {
            DeliveryLocation::InsideDhaka => self.delivery_charge_inside_dhaka,
            DeliveryLocation::OutsideDhaka => self.delivery_charge_outside_dhaka,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreSettings,
    pub pricing: PricingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { port: 8083, store: StoreSettings::default(), pricing: PricingConfig::default() }
    }
}

impl AppConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup; unset keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let store = StoreSettings {
            currency: lookup("STORE_CURRENCY").unwrap_or(defaults.store.currency),
            currency_symbol: lookup("STORE_CURRENCY_SYMBOL").unwrap_or(defaults.store.currency_symbol),
            delivery_charge_inside_dhaka: parse_or(&lookup, "DELIVERY_CHARGE_INSIDE_DHAKA", defaults.store.delivery_charge_inside_dhaka)?,
            delivery_charge_outside_dhaka: parse_or(&lookup, "DELIVERY_CHARGE_OUTSIDE_DHAKA", defaults.store.delivery_charge_outside_dhaka)?,
            free_delivery_minimum_amount: parse_or(&lookup, "FREE_DELIVERY_MINIMUM_AMOUNT", defaults.store.free_delivery_minimum_amount)?,
            minimum_order_amount: parse_or(&lookup, "MINIMUM_ORDER_AMOUNT", defaults.store.minimum_order_amount)?,
        };
        let pricing = PricingConfig {
            surge_stacking: parse_or(&lookup, "SURGE_STACKING", defaults.pricing.surge_stacking)?,
            slab_fallback: parse_or(&lookup, "SLAB_FALLBACK", defaults.pricing.slab_fallback)?,
        };
        Ok(Self { port: parse_or(&lookup, "PORT", defaults.port)?, store, pricing })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| GroceryError::Config(format!("{key}: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.store.flat_delivery_charge(DeliveryLocation::OutsideDhaka), Decimal::from(130));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("DELIVERY_CHARGE_INSIDE_DHAKA", "70.50"),
            ("SURGE_STACKING", "Additive"),
            ("SLAB_FALLBACK", "base_fare_only"),
        ])).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.store.delivery_charge_inside_dhaka, Decimal::new(7050, 2));
        assert_eq!(config.pricing.surge_stacking, SurgeStacking::Additive);
        assert_eq!(config.pricing.slab_fallback, SlabFallback::BaseFareOnly);
    }

    #[test]
    fn test_bad_value_is_config_error() {
        let err = AppConfig::from_lookup(lookup_from(&[("MINIMUM_ORDER_AMOUNT", "two hundred")])).unwrap_err();
        assert!(matches!(err, GroceryError::Config(msg) if msg.starts_with("MINIMUM_ORDER_AMOUNT")));
    }
}
