//! EzyGrocery pricing engine
//!
//! Prices shop listings, coupons and deliveries for a neighbourhood grocery
//! marketplace and combines them into checkout quotes.
//!
//! ## Features
//! - Listing prices: final price, sale percentage, profit margin
//! - Coupon validity windows and discounts
//! - Zone and distance-slab delivery fees with surge charges
//! - Checkout quotes over a cart
//! - A small HTTP surface for the checkout workflow

use rust_decimal::Decimal;
use thiserror::Error;

pub mod api;
pub mod config;
pub mod domain;

pub use config::{AppConfig, PricingConfig, SlabFallback, StoreSettings, SurgeStacking};
pub use domain::services::{CheckoutQuote, CheckoutRequest, DeliveryRequest, PricingCalculator, QuoteLine};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum GroceryError {
    #[error("No distance slab covers {distance} km")]
    DistanceOutOfRange { distance: Decimal },

    #[error("Amount overflow while computing {0}")]
    AmountOverflow(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, GroceryError>;
