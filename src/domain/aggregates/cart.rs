//! Cart Aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::aggregates::shop_product::{PricedItem, ShopProduct};

#[derive(Clone, Debug)]
pub struct Cart {
    id: String,
    customer_id: Option<String>,
    session_key: Option<String>,
    items: Vec<CartItem>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: PricedItem,
}

impl CartItem {
    pub fn from_product(product: &ShopProduct, quantity: u32) -> Self {
        Self { product_id: product.id().to_string(), name: product.name().to_string(), quantity, price: *product.price() }
    }

    pub fn unit_price(&self) -> Decimal { self.price.final_price() }

    /// `None` when the line total does not fit in a `Decimal`.
    pub fn total_price(&self) -> Option<Decimal> { self.unit_price().checked_mul(Decimal::from(self.quantity)) }
}

impl Cart {
    pub fn new() -> Self {
        let now = Utc::now();
        Self { id: Uuid::new_v4().to_string(), customer_id: None, session_key: None, items: vec![], created_at: now, updated_at: now }
    }

    pub fn for_customer(customer_id: impl Into<String>) -> Self {
        let mut cart = Self::new();
        cart.customer_id = Some(customer_id.into());
        cart
    }

    pub fn for_session(session_key: impl Into<String>) -> Self {
        let mut cart = Self::new();
        cart.session_key = Some(session_key.into());
        cart
    }

    pub fn id(&self) -> &str { &self.id }
    pub fn customer_id(&self) -> Option<&str> { self.customer_id.as_deref() }
    pub fn session_key(&self) -> Option<&str> { self.session_key.as_deref() }
    pub fn items(&self) -> &[CartItem] { &self.items }
    pub fn item_count(&self) -> usize { self.items.len() }
    pub fn is_empty(&self) -> bool { self.items.is_empty() }
    pub fn updated_at(&self) -> DateTime<Utc> { self.updated_at }

    pub fn total_price(&self) -> Option<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |total, item| total.checked_add(item.total_price()?))
    }
    pub fn total_items(&self) -> u32 { self.items.iter().fold(0, |n, i| n.saturating_add(i.quantity)) }

    pub fn add_item(&mut self, item: CartItem) -> Result<(), CartError> {
        if item.quantity == 0 { return Err(CartError::InvalidQuantity); }
        if let Some(existing) = self.items.iter_mut().find(|i| i.product_id == item.product_id) {
            existing.quantity = existing.quantity.checked_add(item.quantity).ok_or(CartError::InvalidQuantity)?;
            existing.price = item.price;
        } else {
            self.items.push(item);
        }
        self.touch();
        Ok(())
    }

    pub fn update_quantity(&mut self, product_id: &str, quantity: u32) -> Result<(), CartError> {
        let item = self.items.iter_mut().find(|i| i.product_id == product_id).ok_or(CartError::ItemNotFound)?;
        if quantity == 0 { self.items.retain(|i| i.product_id != product_id); }
        else { item.quantity = quantity; }
        self.touch();
        Ok(())
    }

    pub fn remove_item(&mut self, product_id: &str) -> Result<(), CartError> {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        if self.items.len() == before { return Err(CartError::ItemNotFound); }
        self.touch();
        Ok(())
    }

    pub fn clear(&mut self) { self.items.clear(); self.touch(); }

    fn touch(&mut self) { self.updated_at = Utc::now(); }
}

impl Default for Cart {
    fn default() -> Self { Self::new() }
}

#[derive(Debug, Clone, PartialEq, Eq)] pub enum CartError { ItemNotFound, InvalidQuantity }
impl std::error::Error for CartError {}
impl std::fmt::Display for CartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self { Self::ItemNotFound => write!(f, "Item not found"), Self::InvalidQuantity => write!(f, "Invalid quantity") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(id: &str, qty: u32, selling: Decimal, discount: Option<Decimal>) -> CartItem {
        CartItem { product_id: id.into(), name: id.into(), quantity: qty, price: PricedItem::new(selling, discount, dec!(0)) }
    }

    #[test]
    fn test_cart_operations() {
        let mut cart = Cart::for_session("sess-1");
        cart.add_item(item("P1", 2, dec!(100), Some(dec!(80)))).unwrap();
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_price(), Some(dec!(160)));
        cart.add_item(item("P1", 1, dec!(100), Some(dec!(80)))).unwrap();
        assert_eq!(cart.items()[0].quantity, 3);
        cart.add_item(item("P2", 4, dec!(25), None)).unwrap();
        assert_eq!(cart.total_items(), 7);
        assert_eq!(cart.total_price(), Some(dec!(340)));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut cart = Cart::new();
        assert_eq!(cart.add_item(item("P1", 0, dec!(10), None)), Err(CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_and_remove() {
        let mut cart = Cart::for_customer("C1");
        cart.add_item(item("P1", 2, dec!(10), None)).unwrap();
        cart.update_quantity("P1", 5).unwrap();
        assert_eq!(cart.total_price(), Some(dec!(50)));
        cart.update_quantity("P1", 0).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.remove_item("P1"), Err(CartError::ItemNotFound));
    }

    #[test]
    fn test_from_product_snapshot() {
        let mut product = ShopProduct::list("S1", "EGG-12", "Eggs (dozen)", PricedItem::new(dec!(150), Some(dec!(140)), dec!(120)));
        let line = CartItem::from_product(&product, 2);
        product.reprice(dec!(160), None);
        assert_eq!(line.total_price(), Some(dec!(280)));
    }

    #[test]
    fn test_total_overflow_is_none() {
        let mut cart = Cart::new();
        cart.add_item(item("P1", 1, Decimal::MAX, None)).unwrap();
        assert_eq!(cart.total_price(), Some(Decimal::MAX));
        cart.add_item(item("P2", 1, dec!(1), None)).unwrap();
        assert_eq!(cart.total_price(), None);
        assert_eq!(item("P3", 2, Decimal::MAX, None).total_price(), None);
    }

    #[test]
    fn test_quantity_merge_overflow_rejected() {
        let mut cart = Cart::new();
        cart.add_item(item("P1", u32::MAX, dec!(1), None)).unwrap();
        assert_eq!(cart.add_item(item("P1", 1, dec!(1), None)), Err(CartError::InvalidQuantity));
        assert_eq!(cart.total_items(), u32::MAX);
    }
}
