//! TechStore product API - demo backend for the storefront pages.
//!
//! Serves the catalog the legacy detail pages used to hard-code, behind the
//! `GET /api/products/{id}` contract the gateway expects.

use anyhow::Result;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use techstore_storefront::{Money, ProductDetail, Specifications};

#[derive(Clone)]
struct AppState {
    catalog: Arc<HashMap<String, ProductDetail>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState {
        catalog: Arc::new(demo_catalog()),
    };

    let app = Router::new()
        .route(
            "/health",
            get(|| async {
                Json(serde_json::json!({"status": "healthy", "service": "techstore-storefront"}))
            }),
        )
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8083".to_string());
    tracing::info!("techstore product API listening on 0.0.0.0:{}", port);
    axum::serve(
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?,
        app,
    )
    .await?;
    Ok(())
}

async fn list_products(State(s): State<AppState>) -> Json<Vec<ProductDetail>> {
    let mut products: Vec<ProductDetail> = s.catalog.values().cloned().collect();
    products.sort_by(|a, b| a.id.cmp(&b.id));
    Json(products)
}

async fn get_product(
    State(s): State<AppState>,
    Path(id): Path<String>,
) -> std::result::Result<Json<ProductDetail>, (StatusCode, Json<serde_json::Value>)> {
    s.catalog.get(&id).cloned().map(Json).ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "product not found", "id": id})),
        )
    })
}

fn demo_catalog() -> HashMap<String, ProductDetail> {
    [
        product(
            "macbook-pro-16",
            "MacBook Pro 16\" M3",
            "Chip M3, 16GB RAM, 512GB SSD",
            6_200_000,
            7_450_000,
            15,
            3,
            Some(Specifications {
                processor: Some("Apple M3".into()),
                ram: Some("16GB".into()),
                storage: Some("512GB SSD".into()),
                display: Some("16\" Liquid Retina XDR".into()),
                battery: Some("22 horas".into()),
                ..Specifications::default()
            }),
        ),
        product(
            "iphone-15-pro",
            "iPhone 15 Pro",
            "128GB, Titanio Natural",
            4_800_000,
            5_200_000,
            8,
            5,
            Some(Specifications {
                processor: Some("A17 Pro".into()),
                storage: Some("128GB".into()),
                display: Some("6.1\" Super Retina XDR".into()),
                ..Specifications::default()
            }),
        ),
        product(
            "nvidia-rtx-4080",
            "NVIDIA RTX 4080",
            "16GB GDDR6X, Gaming OC",
            3_200_000,
            3_600_000,
            11,
            2,
            Some(Specifications {
                graphics: Some("16GB GDDR6X".into()),
                ..Specifications::default()
            }),
        ),
        product(
            "samsung-galaxy-s24",
            "Samsung Galaxy S24",
            "256GB, Phantom Black",
            2_400_000,
            2_800_000,
            14,
            8,
            None,
        ),
        product(
            "dell-xps-13",
            "Dell XPS 13",
            "Intel i7, 16GB RAM, 512GB SSD",
            3_500_000,
            3_900_000,
            10,
            4,
            Some(Specifications {
                processor: Some("Intel Core i7".into()),
                ram: Some("16GB".into()),
                storage: Some("512GB SSD".into()),
                ..Specifications::default()
            }),
        ),
        product(
            "amd-ryzen-7",
            "AMD Ryzen 7 7800X3D",
            "8-Core, 4.2GHz, AM5",
            1_100_000,
            1_250_000,
            12,
            6,
            Some(Specifications {
                processor: Some("8 núcleos, 4.2GHz".into()),
                ..Specifications::default()
            }),
        ),
    ]
    .into_iter()
    .map(|p| (p.id.clone(), p))
    .collect()
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: &str,
    name: &str,
    description: &str,
    price: i64,
    original_price: i64,
    discount: u32,
    quantity: u32,
    specifications: Option<Specifications>,
) -> ProductDetail {
    ProductDetail {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        price: Money::new(price),
        original_price: Some(Money::new(original_price)),
        discount: Some(discount),
        main_image: format!("/images/{id}.webp"),
        images: (1..=3).map(|n| format!("/images/{id}-{n}.webp")).collect(),
        specifications,
        quantity,
    }
}
