//! Storefront domain: cart, catalog views, checkout.
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod events;
pub mod value_objects;
