//! HTTP surface for the checkout workflow.
//!
//! Thin JSON wrappers over [`PricingCalculator`]; every request body is
//! validated before it reaches the calculator.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::config::AppConfig;
use crate::domain::aggregates::{CartItem, Coupon, DeliveryZone, DistanceSlab, PricedItem};
use crate::domain::services::{CheckoutQuote, CheckoutRequest, DeliveryRequest, PricingCalculator, SurgeContext};
use crate::domain::value_objects::round_money;
use crate::GroceryError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub calculator: PricingCalculator,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let calculator = PricingCalculator::new(config.pricing);
        Self { config: Arc::new(config), calculator }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(json!({"status": "healthy", "service": "ezygrocery-pricing"})) }))
        .route("/api/v1/pricing/item", post(price_item))
        .route("/api/v1/coupons/discount", post(coupon_discount))
        .route("/api/v1/delivery/charge", post(delivery_charge))
        .route("/api/v1/checkout/quote", post(checkout_quote))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// =============================================================================
// Errors
// =============================================================================

/// JSON body extractor whose rejections render as [`ApiError`].
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Body(JsonRejection),
    Domain(GroceryError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::Body(rejection) => (rejection.status(), rejection.body_text()),
            ApiError::Domain(err @ (GroceryError::DistanceOutOfRange { .. } | GroceryError::AmountOverflow(_))) => {
                (StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
            }
            ApiError::Domain(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<GroceryError> for ApiError {
    fn from(err: GroceryError) -> Self { Self::Domain(err) }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self { Self::Body(rejection) }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self { Self::Validation(errors.to_string()) }
}

// =============================================================================
// Validation helpers
// =============================================================================

/// Largest accepted money amount: ten digits with two decimal places.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0x540B_E3FF, 0x2, 0, false, 2); // 99_999_999.99
/// Largest accepted distance in km: five digits with two decimal places.
pub const MAX_DISTANCE_KM: Decimal = Decimal::from_parts(99_999, 0, 0, false, 2); // 999.99

fn invalid(code: &'static str) -> ValidationError { ValidationError::new(code) }

fn money(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO { return Err(invalid("negative_amount")); }
    if *value > MAX_AMOUNT { return Err(invalid("amount_too_large")); }
    Ok(())
}

fn distance(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO { return Err(invalid("negative_distance")); }
    if *value > MAX_DISTANCE_KM { return Err(invalid("distance_too_large")); }
    Ok(())
}

fn check_priced(price: &PricedItem) -> Result<(), ValidationError> {
    money(&price.selling_price)?;
    money(&price.cost_price)?;
    if let Some(discount) = &price.discount_price { money(discount)?; }
    Ok(())
}

fn validate_items(items: &[CartItem]) -> Result<(), ValidationError> {
    for item in items {
        if item.quantity == 0 { return Err(invalid("zero_quantity")); }
        check_priced(&item.price)?;
    }
    Ok(())
}

fn validate_coupon(coupon: &Coupon) -> Result<(), ValidationError> {
    money(&coupon.discount_value)?;
    money(&coupon.minimum_amount)?;
    if let Some(cap) = &coupon.maximum_discount { money(cap)?; }
    if coupon.valid_from > coupon.valid_to { return Err(invalid("validity_window_reversed")); }
    Ok(())
}

fn check_zone(zone: &DeliveryZone, distance_km: &Decimal, slabs: &[DistanceSlab]) -> Result<(), ValidationError> {
    money(&zone.base_fare)?;
    distance(distance_km)?;
    for slab in slabs {
        if slab.min_distance >= slab.max_distance { return Err(invalid("empty_slab")); }
        distance(&slab.min_distance)?;
        distance(&slab.max_distance)?;
        money(&slab.additional_charge)?;
    }
    Ok(())
}

fn validate_delivery(delivery: &DeliveryRequest) -> Result<(), ValidationError> {
    match delivery {
        DeliveryRequest::Zone { zone, distance_km, slabs } => check_zone(zone, distance_km, slabs),
        DeliveryRequest::Flat { .. } => Ok(()),
    }
}

fn validate_surge(surge: &SurgeContext) -> Result<(), ValidationError> {
    for policy in &surge.policies {
        money(&policy.min_amount)?;
        money(&policy.max_amount)?;
        if policy.max_amount < policy.min_amount { return Err(invalid("surge_range_reversed")); }
    }
    Ok(())
}

// =============================================================================
// Item pricing
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct ItemPriceRequest {
    #[validate(custom = "money")]
    pub selling_price: Decimal,
    #[validate(custom = "money")]
    pub discount_price: Option<Decimal>,
    #[validate(custom = "money")]
    pub cost_price: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ItemPriceResponse {
    pub final_price: Decimal,
    pub is_on_sale: bool,
    pub discount_percentage: Decimal,
    pub profit_margin: Decimal,
    pub profit_percentage: Decimal,
}

async fn price_item(State(s): State<AppState>, AppJson(r): AppJson<ItemPriceRequest>) -> Result<Json<ItemPriceResponse>, ApiError> {
    r.validate()?;
    let item = PricedItem::new(r.selling_price, r.discount_price, r.cost_price);
    Ok(Json(ItemPriceResponse {
        final_price: s.calculator.final_price(&item),
        is_on_sale: item.is_on_sale(),
        discount_percentage: round_money(s.calculator.discount_percentage(&item)),
        profit_margin: s.calculator.profit_margin(&item),
        profit_percentage: round_money(item.profit_percentage()),
    }))
}

// =============================================================================
// Coupons
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct CouponDiscountRequest {
    #[validate(custom = "validate_coupon")]
    pub coupon: Coupon,
    #[validate(custom = "money")]
    pub order_amount: Decimal,
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CouponDiscountResponse {
    pub code: String,
    pub valid: bool,
    pub discount: Decimal,
}

async fn coupon_discount(State(s): State<AppState>, AppJson(r): AppJson<CouponDiscountRequest>) -> Result<Json<CouponDiscountResponse>, ApiError> {
    r.validate()?;
    let now = r.now.unwrap_or_else(Utc::now);
    Ok(Json(CouponDiscountResponse {
        code: r.coupon.code.to_string(),
        valid: s.calculator.coupon_is_valid(&r.coupon, now),
        discount: round_money(s.calculator.coupon_discount(&r.coupon, r.order_amount, now)?),
    }))
}

// =============================================================================
// Delivery
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct DeliveryChargeRequest {
    pub zone: DeliveryZone,
    #[validate(custom = "distance")]
    pub distance_km: Decimal,
    pub slabs: Vec<DistanceSlab>,
    #[serde(default)]
    #[validate(custom = "validate_surge")]
    pub surge: SurgeContext,
}

#[derive(Debug, Serialize)]
pub struct DeliveryChargeResponse {
    pub delivery_charge: Decimal,
    pub surge_charge: Decimal,
    pub total: Decimal,
}

async fn delivery_charge(State(s): State<AppState>, AppJson(r): AppJson<DeliveryChargeRequest>) -> Result<Json<DeliveryChargeResponse>, ApiError> {
    r.validate()?;
    check_zone(&r.zone, &r.distance_km, &r.slabs).map_err(|e| ApiError::Validation(e.code.to_string()))?;
    let delivery_charge = round_money(s.calculator.delivery_charge(&r.zone, r.distance_km, &r.slabs)?);
    let surge_charge = round_money(s.calculator.surge_charge(&r.surge.policies, &r.surge.conditions, r.surge.intensity)?);
    let total = delivery_charge.checked_add(surge_charge).ok_or(GroceryError::AmountOverflow("delivery total"))?;
    Ok(Json(DeliveryChargeResponse { delivery_charge, surge_charge, total }))
}

// =============================================================================
// Checkout
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct QuoteRequest {
    #[validate(length(min = 1), custom = "validate_items")]
    pub items: Vec<CartItem>,
    #[serde(default)]
    #[validate(custom = "validate_coupon")]
    pub coupon: Option<Coupon>,
    #[validate(custom = "validate_delivery")]
    pub delivery: DeliveryRequest,
    #[serde(default)]
    #[validate(custom = "validate_surge")]
    pub surge: SurgeContext,
    pub now: Option<DateTime<Utc>>,
}

async fn checkout_quote(State(s): State<AppState>, AppJson(r): AppJson<QuoteRequest>) -> Result<Json<CheckoutQuote>, ApiError> {
    r.validate()?;
    let now = r.now.unwrap_or_else(Utc::now);
    let request = CheckoutRequest { items: r.items, coupon: r.coupon, delivery: r.delivery, surge: r.surge };
    let quote = s.calculator.quote(&s.config.store, &request, now)?;
    Ok(Json(quote))
}
