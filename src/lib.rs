//! TechStore Storefront
//!
//! Client-side state engine for a small e-commerce storefront.
//!
//! ## Components
//! - Persisted cart store over a durable per-origin slot
//! - Catalog filtering, sorting and pagination
//! - Cart-to-UI synchronization, same tab and cross tab
//! - Checkout step controller with order totals
//! - Product-detail gateway to the backend API

use thiserror::Error;

pub mod domain;
pub mod gateway;
pub mod storage;
pub mod sync;

pub use domain::cart::{CartLineItem, CartStore, CART_SLOT};
pub use domain::catalog::{
    CatalogQuery, CatalogView, Page, PriceRange, ProductCardView, SortMode,
};
pub use domain::checkout::{
    CheckoutFlow, OrderConfirmation, OrderSummary, PaymentForm, PaymentMethod, ShippingForm,
    ShippingMethod, StepForm,
};
pub use domain::events::CartEvent;
pub use domain::value_objects::Money;
pub use gateway::{
    FetchSequencer, FetchToken, HttpProductGateway, ProductDetail, ProductGateway, Specifications,
};
pub use storage::{OriginStorage, StorageEvent, TabHandle};
pub use sync::{CartPanel, CartSynchronizer, CartTotals};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum StorefrontError {
    #[error("invalid quantity: {0}")]
    InvalidQuantity(u32),

    #[error("item not in cart: {0}")]
    ItemNotFound(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("product not found: {0}")]
    ProductNotFound(String),

    #[error("product load failed with status {status}")]
    ProductLoad { status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, StorefrontError>;
