//! Shop Product Aggregate
//!
//! A shop's listing of a master product: its three prices and its stock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::value_objects::Quantity;
use crate::domain::events::{DomainEvent, ProductEvent};

pub const DEFAULT_LOW_STOCK_ALERT: u32 = 10;

/// The price fields of a listing.
///
/// A discount price only puts the item on sale when it is strictly below the
/// selling price; anything else is ignored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedItem {
    pub selling_price: Decimal,
    #[serde(default)]
    pub discount_price: Option<Decimal>,
    pub cost_price: Decimal,
}

impl PricedItem {
    pub fn new(selling_price: Decimal, discount_price: Option<Decimal>, cost_price: Decimal) -> Self {
        Self { selling_price, discount_price, cost_price }
    }

    pub fn is_on_sale(&self) -> bool {
        matches!(self.discount_price, Some(d) if d < self.selling_price)
    }

    pub fn final_price(&self) -> Decimal {
        match self.discount_price {
            Some(d) if d < self.selling_price => d,
            _ => self.selling_price,
        }
    }

    /// Not clamped: selling below cost yields a negative margin.
    pub fn profit_margin(&self) -> Decimal { self.final_price() - self.cost_price }

    pub fn discount_percentage(&self) -> Decimal {
        if !self.is_on_sale() || self.selling_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        (self.selling_price - self.final_price()) / self.selling_price * Decimal::ONE_HUNDRED
    }

    pub fn profit_percentage(&self) -> Decimal {
        if self.cost_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        self.profit_margin() / self.cost_price * Decimal::ONE_HUNDRED
    }
}

#[derive(Clone, Debug)]
pub struct ShopProduct {
    id: String,
    shop_id: String,
    shop_sku: String,
    name: String,
    price: PricedItem,
    stock: Quantity,
    low_stock_alert: u32,
    is_active: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    events: Vec<DomainEvent>,
}

impl ShopProduct {
    pub fn list(shop_id: impl Into<String>, shop_sku: impl Into<String>, name: impl Into<String>, price: PricedItem) -> Self {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let shop_sku = shop_sku.into();
        let mut product = Self {
            id: id.clone(), shop_id: shop_id.into(), shop_sku: shop_sku.clone(), name: name.into(),
            price, stock: Quantity::default(), low_stock_alert: DEFAULT_LOW_STOCK_ALERT,
            is_active: true, is_featured: false, created_at: now, updated_at: now, events: vec![],
        };
        product.raise_event(DomainEvent::Product(ProductEvent::Listed { product_id: id, shop_sku }));
        product
    }

    pub fn with_low_stock_alert(mut self, threshold: u32) -> Self { self.low_stock_alert = threshold; self }

    pub fn id(&self) -> &str { &self.id }
    pub fn shop_id(&self) -> &str { &self.shop_id }
    pub fn shop_sku(&self) -> &str { &self.shop_sku }
    pub fn name(&self) -> &str { &self.name }
    pub fn price(&self) -> &PricedItem { &self.price }
    pub fn stock(&self) -> Quantity { self.stock }
    pub fn is_active(&self) -> bool { self.is_active }
    pub fn is_featured(&self) -> bool { self.is_featured }
    pub fn created_at(&self) -> DateTime<Utc> { self.created_at }

    pub fn final_price(&self) -> Decimal { self.price.final_price() }
    pub fn is_low_stock(&self) -> bool { self.stock.value() <= self.low_stock_alert }
    pub fn is_out_of_stock(&self) -> bool { self.stock.is_zero() }

    pub fn reprice(&mut self, selling_price: Decimal, discount_price: Option<Decimal>) {
        self.price.selling_price = selling_price;
        self.price.discount_price = discount_price;
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::Repriced { product_id: self.id.clone(), final_price: self.price.final_price() }));
    }

    pub fn feature(&mut self) { self.is_featured = true; self.touch(); }
    pub fn deactivate(&mut self) { self.is_active = false; self.touch(); }

    pub fn restock(&mut self, qty: u32) {
        self.stock = self.stock.add(qty);
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::Restocked { product_id: self.id.clone(), quantity: qty }));
    }

    pub fn remove_stock(&mut self, qty: u32) -> Result<(), ProductError> {
        let was_low = self.is_low_stock();
        self.stock = self.stock.subtract(qty).ok_or(ProductError::InsufficientStock { available: self.stock.value(), requested: qty })?;
        self.touch();
        self.raise_event(DomainEvent::Product(ProductEvent::StockRemoved { product_id: self.id.clone(), quantity: qty }));
        if self.is_out_of_stock() {
            self.raise_event(DomainEvent::Product(ProductEvent::OutOfStock { product_id: self.id.clone() }));
        } else if !was_low && self.is_low_stock() {
            self.raise_event(DomainEvent::Product(ProductEvent::LowStock { product_id: self.id.clone(), remaining: self.stock.value() }));
        }
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<DomainEvent> { std::mem::take(&mut self.events) }
    fn raise_event(&mut self, e: DomainEvent) { self.events.push(e); }
    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum ProductError { InsufficientStock { available: u32, requested: u32 } }
impl std::error::Error for ProductError {}
impl std::fmt::Display for ProductError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::InsufficientStock { available, requested } => write!(f, "Insufficient stock: {available} available, {requested} requested") }
    }
}
