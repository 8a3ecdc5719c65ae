//! Domain events
use rust_decimal::Decimal;

#[derive(Clone, Debug, PartialEq)]
pub enum DomainEvent {
    Product(ProductEvent),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProductEvent {
    Listed { product_id: String, shop_sku: String },
    Repriced { product_id: String, final_price: Decimal },
    Restocked { product_id: String, quantity: u32 },
    StockRemoved { product_id: String, quantity: u32 },
    LowStock { product_id: String, remaining: u32 },
    OutOfStock { product_id: String },
}
