//! Checkout quotes
//!
//! Combines item, coupon, delivery and surge pricing for one cart. The
//! checkout workflow that calls this owns the order record and any coupon
//! redemption; a quote changes nothing.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::StoreSettings;
use crate::domain::aggregates::{Cart, CartItem, Coupon, DeliveryLocation, DeliveryZone, DistanceSlab, SurgePolicy, SurgeType};
use crate::domain::services::pricing::PricingCalculator;
use crate::domain::value_objects::round_money;
use crate::{GroceryError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeliveryRequest {
    /// Zone base fare plus a distance slab charge.
    Zone { zone: DeliveryZone, distance_km: Decimal, slabs: Vec<DistanceSlab> },
    /// Flat rate from store settings.
    Flat { location: DeliveryLocation },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SurgeContext {
    #[serde(default)]
    pub policies: Vec<SurgePolicy>,
    #[serde(default)]
    pub conditions: Vec<SurgeType>,
    #[serde(default)]
    pub intensity: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub coupon: Option<Coupon>,
    pub delivery: DeliveryRequest,
    #[serde(default)]
    pub surge: SurgeContext,
}

impl CheckoutRequest {
    pub fn from_cart(cart: &Cart, delivery: DeliveryRequest) -> Self {
        Self { items: cart.items().to_vec(), coupon: None, delivery, surge: SurgeContext::default() }
    }

    pub fn with_coupon(mut self, coupon: Coupon) -> Self { self.coupon = Some(coupon); self }
    pub fn with_surge(mut self, surge: SurgeContext) -> Self { self.surge = surge; self }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuoteLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_final_price: Decimal,
    pub line_subtotal: Decimal,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CheckoutQuote {
    pub quote_id: Uuid,
    pub currency: String,
    pub lines: Vec<QuoteLine>,
    pub subtotal: Decimal,
    pub coupon_code: Option<String>,
    pub coupon_discount: Decimal,
    pub delivery_charge: Decimal,
    pub surge_charge: Decimal,
    pub grand_total: Decimal,
    pub free_delivery_applied: bool,
    pub meets_minimum_order: bool,
    pub quoted_at: DateTime<Utc>,
}

impl PricingCalculator {
    /// Prices a checkout at `now`.
    ///
    /// Amounts are rounded to two places; the grand total never goes below
    /// zero even when a fixed coupon exceeds the subtotal.
    pub fn quote(&self, store: &StoreSettings, request: &CheckoutRequest, now: DateTime<Utc>) -> Result<CheckoutQuote> {
        let lines = request
            .items
            .iter()
            .map(|item| {
                let line_total = item.total_price().ok_or(GroceryError::AmountOverflow("line subtotal"))?;
                Ok(QuoteLine {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    quantity: item.quantity,
                    unit_final_price: self.final_price(&item.price),
                    line_subtotal: round_money(line_total),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let subtotal = lines
            .iter()
            .try_fold(Decimal::ZERO, |total, l| total.checked_add(l.line_subtotal))
            .ok_or(GroceryError::AmountOverflow("subtotal"))?;

        let coupon_discount = match &request.coupon {
            Some(coupon) => round_money(self.coupon_discount(coupon, subtotal, now)?),
            None => Decimal::ZERO,
        };

        let delivery_fee = match &request.delivery {
            DeliveryRequest::Zone { zone, distance_km, slabs } => self.delivery_charge(zone, *distance_km, slabs)?,
            DeliveryRequest::Flat { location } => store.flat_delivery_charge(*location),
        };
        let free_delivery_applied = subtotal >= store.free_delivery_minimum_amount;
        let delivery_charge = if free_delivery_applied { Decimal::ZERO } else { round_money(delivery_fee) };

        let surge = &request.surge;
        let surge_charge = round_money(self.surge_charge(&surge.policies, &surge.conditions, surge.intensity)?);

        let grand_total = subtotal
            .checked_sub(coupon_discount)
            .and_then(|t| t.checked_add(delivery_charge))
            .and_then(|t| t.checked_add(surge_charge))
            .ok_or(GroceryError::AmountOverflow("grand total"))?;
        let grand_total = round_money(grand_total.max(Decimal::ZERO));

        let quote = CheckoutQuote {
            quote_id: Uuid::now_v7(),
            currency: store.currency.clone(),
            lines,
            subtotal,
            coupon_code: request.coupon.as_ref().map(|c| c.code.to_string()),
            coupon_discount,
            delivery_charge,
            surge_charge,
            grand_total,
            free_delivery_applied,
            meets_minimum_order: subtotal >= store.minimum_order_amount,
            quoted_at: now,
        };
        tracing::info!(
            quote_id = %quote.quote_id,
            lines = quote.lines.len(),
            %subtotal,
            %coupon_discount,
            %delivery_charge,
            %surge_charge,
            %grand_total,
            "checkout quoted"
        );
        Ok(quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PricingConfig, SlabFallback, SurgeStacking};
    use crate::domain::aggregates::PricedItem;
    use crate::domain::value_objects::CouponCode;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    fn now() -> DateTime<Utc> { Utc.with_ymd_and_hms(2026, 7, 20, 18, 30, 0).unwrap() }

    fn line(id: &str, qty: u32, selling: Decimal, discount: Option<Decimal>) -> CartItem {
        CartItem { product_id: id.into(), name: id.into(), quantity: qty, price: PricedItem::new(selling, discount, dec!(0)) }
    }

    fn zone_delivery(distance: Decimal) -> DeliveryRequest {
        DeliveryRequest::Zone {
            zone: DeliveryZone::new("Dhanmondi", dec!(60)),
            distance_km: distance,
            slabs: vec![DistanceSlab::new(dec!(0), dec!(5), dec!(0)), DistanceSlab::new(dec!(5), dec!(10), dec!(20))],
        }
    }

    fn welcome10() -> Coupon {
        Coupon::percentage(CouponCode::new("WELCOME10").unwrap(), dec!(10), now() - Duration::days(1), now() + Duration::days(1))
            .with_minimum_amount(dec!(500))
    }

    #[test]
    fn test_quote_with_coupon_and_zone_delivery() {
        let request = CheckoutRequest {
            items: vec![line("rice", 5, dec!(100), Some(dec!(80))), line("dal", 2, dec!(60), None)],
            coupon: Some(welcome10()),
            delivery: zone_delivery(dec!(7)),
            surge: SurgeContext::default(),
        };
        let quote = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap();
        assert_eq!(quote.lines[0].unit_final_price, dec!(80));
        assert_eq!(quote.lines[0].line_subtotal, dec!(400));
        assert_eq!(quote.subtotal, dec!(520));
        assert_eq!(quote.coupon_discount, dec!(52));
        assert_eq!(quote.delivery_charge, dec!(80));
        assert_eq!(quote.grand_total, dec!(548));
        assert_eq!(quote.coupon_code.as_deref(), Some("WELCOME10"));
        assert!(quote.meets_minimum_order);
        assert!(!quote.free_delivery_applied);
        assert_eq!(quote.currency, "BDT");
    }

    #[test]
    fn test_free_delivery_keeps_surge() {
        let request = CheckoutRequest {
            items: vec![line("oil", 4, dec!(300), None)],
            coupon: None,
            delivery: DeliveryRequest::Flat { location: DeliveryLocation::OutsideDhaka },
            surge: SurgeContext {
                policies: vec![SurgePolicy::new(SurgeType::BadWeather, dec!(20), dec!(40))],
                conditions: vec![SurgeType::BadWeather],
                intensity: dec!(0.25),
            },
        };
        let quote = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap();
        assert!(quote.free_delivery_applied);
        assert_eq!(quote.delivery_charge, Decimal::ZERO);
        assert_eq!(quote.surge_charge, dec!(25));
        assert_eq!(quote.grand_total, dec!(1225));
    }

    #[test]
    fn test_small_order_flat_rate() {
        let request = CheckoutRequest {
            items: vec![line("salt", 1, dec!(42), None)],
            coupon: Some(welcome10()),
            delivery: DeliveryRequest::Flat { location: DeliveryLocation::InsideDhaka },
            surge: SurgeContext::default(),
        };
        let quote = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap();
        assert_eq!(quote.coupon_discount, Decimal::ZERO);
        assert_eq!(quote.delivery_charge, dec!(60));
        assert_eq!(quote.grand_total, dec!(102));
        assert!(!quote.meets_minimum_order);
    }

    #[test]
    fn test_fixed_coupon_cannot_push_total_negative() {
        let coupon = Coupon::fixed(CouponCode::new("FLAT500").unwrap(), dec!(500), now() - Duration::days(1), now() + Duration::days(1));
        let request = CheckoutRequest {
            items: vec![line("tea", 1, dec!(250), None)],
            coupon: Some(coupon),
            delivery: DeliveryRequest::Flat { location: DeliveryLocation::InsideDhaka },
            surge: SurgeContext::default(),
        };
        let quote = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap();
        assert_eq!(quote.coupon_discount, dec!(500));
        assert_eq!(quote.grand_total, Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_distance() {
        let request = CheckoutRequest::from_cart(&Cart::new(), zone_delivery(dec!(15)));
        let reject = PricingCalculator::default().quote(&StoreSettings::default(), &request, now());
        assert!(matches!(reject, Err(GroceryError::DistanceOutOfRange { .. })));

        let lenient = PricingCalculator::new(PricingConfig { surge_stacking: SurgeStacking::Highest, slab_fallback: SlabFallback::BaseFareOnly });
        let quote = lenient.quote(&StoreSettings::default(), &request, now()).unwrap();
        assert_eq!(quote.delivery_charge, dec!(60));
        assert_eq!(quote.grand_total, dec!(60));
    }

    #[test]
    fn test_from_cart_rounds_lines() {
        let mut cart = Cart::new();
        cart.add_item(line("chili", 3, dec!(33.335), None)).unwrap();
        let request = CheckoutRequest::from_cart(&cart, DeliveryRequest::Flat { location: DeliveryLocation::InsideDhaka });
        let quote = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap();
        assert_eq!(quote.lines[0].line_subtotal, dec!(100.01));
        assert_eq!(quote.grand_total, dec!(160.01));
    }

    #[test]
    fn test_line_overflow_rejected() {
        let request = CheckoutRequest {
            items: vec![line("saffron", 3, Decimal::MAX, None)],
            coupon: None,
            delivery: DeliveryRequest::Flat { location: DeliveryLocation::InsideDhaka },
            surge: SurgeContext::default(),
        };
        let err = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap_err();
        assert!(matches!(err, GroceryError::AmountOverflow("line subtotal")));
    }

    #[test]
    fn test_subtotal_overflow_rejected() {
        let request = CheckoutRequest {
            items: vec![line("saffron", 1, Decimal::MAX, None), line("cardamom", 1, dec!(1), None)],
            coupon: None,
            delivery: DeliveryRequest::Flat { location: DeliveryLocation::InsideDhaka },
            surge: SurgeContext::default(),
        };
        let err = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap_err();
        assert!(matches!(err, GroceryError::AmountOverflow("subtotal")));
    }

    #[test]
    fn test_coupon_overflow_rejected() {
        let request = CheckoutRequest {
            items: vec![line("saffron", 1, Decimal::MAX, None)],
            coupon: Some(welcome10()),
            delivery: DeliveryRequest::Flat { location: DeliveryLocation::InsideDhaka },
            surge: SurgeContext::default(),
        };
        let err = PricingCalculator::default().quote(&StoreSettings::default(), &request, now()).unwrap_err();
        assert!(matches!(err, GroceryError::AmountOverflow("coupon discount")));
    }
}
