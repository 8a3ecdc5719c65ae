//! Domain services
pub mod checkout;
pub mod pricing;

pub use checkout::{CheckoutQuote, CheckoutRequest, DeliveryRequest, QuoteLine, SurgeContext};
pub use pricing::PricingCalculator;
