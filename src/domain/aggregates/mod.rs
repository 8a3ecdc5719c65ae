//! Aggregates module
pub mod shop_product;
pub mod coupon;
pub mod delivery;
pub mod cart;
pub mod promotion;
pub mod rider;

pub use shop_product::{PricedItem, ProductError, ShopProduct};
pub use coupon::{active_coupons, Coupon, DiscountType};
pub use delivery::{find_slab, DeliveryLocation, DeliveryZone, DistanceSlab, SurgePolicy, SurgeType};
pub use cart::{Cart, CartError, CartItem};
pub use promotion::{active_promotions, Promotion};
pub use rider::{RiderCashDeposit, RiderEarning};
