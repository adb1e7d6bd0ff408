//! Product-detail access.
//!
//! One source of truth for detail data: the backend collaborator behind
//! `GET /api/products/{id}`. Responses can arrive out of order while the user
//! keeps navigating, so callers pair each fetch with a [`FetchSequencer`]
//! token and drop any response whose token is no longer current.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::value_objects::Money;
use crate::{Result, StorefrontError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specifications {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graphics: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub battery: Option<String>,
}

/// Detail-page payload, camelCase on the wire (`originalPrice`, `mainImage`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Money>,
    /// Percent off, when discounted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<u32>,
    pub main_image: String,
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specifications: Option<Specifications>,
    /// Units in stock.
    pub quantity: u32,
}

impl ProductDetail {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    pub fn savings(&self) -> Option<Money> {
        self.original_price
            .map(|original| Money::new(original.amount() - self.price.amount()))
    }
}

#[allow(async_fn_in_trait)]
pub trait ProductGateway {
    async fn product(&self, id: &str) -> Result<ProductDetail>;
}

/// HTTP implementation against the storefront backend.
#[derive(Clone)]
pub struct HttpProductGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProductGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl ProductGateway for HttpProductGateway {
    async fn product(&self, id: &str) -> Result<ProductDetail> {
        let url = format!("{}/api/products/{}", self.base_url, id);
        debug!(%url, "fetching product detail");
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StorefrontError::ProductNotFound(id.to_string()));
        }
        Err(StorefrontError::ProductLoad {
            status: status.as_u16(),
        })
    }
}

/// Orders overlapping fetches: only the most recently issued token is
/// current, so a late response for a superseded request gets dropped instead
/// of overwriting fresher state.
#[derive(Debug, Default)]
pub struct FetchSequencer {
    latest: AtomicU64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchToken(u64);

impl FetchSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> FetchToken {
        FetchToken(self.latest.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn is_current(&self, token: FetchToken) -> bool {
        self.latest.load(Ordering::Relaxed) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Path;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use axum::{Json, Router};

    fn macbook() -> ProductDetail {
        ProductDetail {
            id: "macbook-pro-16".to_string(),
            name: "MacBook Pro 16\" M3".to_string(),
            description: "Chip M3, 16GB RAM, 512GB SSD".to_string(),
            price: Money::new(6_200_000),
            original_price: Some(Money::new(7_450_000)),
            discount: Some(15),
            main_image: "/images/macbook-pro-16.webp".to_string(),
            images: vec!["/images/macbook-pro-16-1.webp".to_string()],
            specifications: Some(Specifications {
                processor: Some("Apple M3".to_string()),
                ram: Some("16GB".to_string()),
                ..Specifications::default()
            }),
            quantity: 3,
        }
    }

    async fn serve_fixture() -> String {
        let app = Router::new().route(
            "/api/products/:id",
            get(|Path(id): Path<String>| async move {
                match id.as_str() {
                    "macbook-pro-16" => Json(macbook()).into_response(),
                    "broken" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                    _ => StatusCode::NOT_FOUND.into_response(),
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_fetch_parses_detail_payload() {
        let gateway = HttpProductGateway::new(serve_fixture().await);
        let product = gateway.product("macbook-pro-16").await.unwrap();
        assert_eq!(product, macbook());
        assert!(product.in_stock());
        assert_eq!(product.savings(), Some(Money::new(1_250_000)));
    }

    #[tokio::test]
    async fn test_missing_product_maps_to_not_found() {
        let gateway = HttpProductGateway::new(serve_fixture().await);
        let err = gateway.product("no-such-id").await.unwrap_err();
        assert!(matches!(err, StorefrontError::ProductNotFound(id) if id == "no-such-id"));
    }

    #[tokio::test]
    async fn test_server_error_maps_to_load_failure() {
        let gateway = HttpProductGateway::new(serve_fixture().await);
        let err = gateway.product("broken").await.unwrap_err();
        assert!(matches!(err, StorefrontError::ProductLoad { status: 500 }));
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let json = serde_json::to_value(macbook()).unwrap();
        assert!(json.get("originalPrice").is_some());
        assert!(json.get("mainImage").is_some());
        assert!(json.get("original_price").is_none());

        // originalPrice and specifications are optional on the wire
        let minimal: ProductDetail = serde_json::from_value(serde_json::json!({
            "id": "p", "name": "P", "description": "", "price": 1000,
            "mainImage": "/p.webp", "images": [], "quantity": 0
        }))
        .unwrap();
        assert!(minimal.original_price.is_none());
        assert!(!minimal.in_stock());
    }

    #[test]
    fn test_sequencer_drops_stale_tokens() {
        let sequencer = FetchSequencer::new();
        let first = sequencer.begin();
        let second = sequencer.begin();
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }
}
