//! Catalog service with in-memory caches
//!
//! Fetches the menu collections from the backend and keeps them cached
//! behind `RwLock`s so page renders never wait on the network. The
//! backend is inconsistent about envelopes: a collection arrives either
//! as a bare JSON array or wrapped as `{"data": [...]}`. Anything else
//! is treated as an empty collection, never as an error the guest sees.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use shared::error::{OrderError, OrderResult};
use shared::models::{Banner, Category, Product};

use crate::core::Config;

/// Cached, refreshable view of the menu catalog
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    products: Arc<RwLock<Vec<Product>>>,
    categories: Arc<RwLock<Vec<Category>>>,
    banners: Arc<RwLock<Vec<Banner>>>,
}

impl CatalogClient {
    pub fn new(config: &Config) -> OrderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| OrderError::FetchFailure(e.to_string()))?;
        Ok(Self {
            http,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            products: Arc::new(RwLock::new(Vec::new())),
            categories: Arc::new(RwLock::new(Vec::new())),
            banners: Arc::new(RwLock::new(Vec::new())),
        })
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Refresh every collection
    pub async fn refresh_all(&self) {
        self.refresh_products().await;
        self.refresh_categories().await;
        self.refresh_banners().await;
    }

    pub async fn refresh_products(&self) {
        let items = self.fetch_collection("/api/products").await;
        debug!(count = items.len(), "products refreshed");
        *self.products.write() = items;
    }

    pub async fn refresh_categories(&self) {
        let items = self.fetch_collection("/api/categories").await;
        *self.categories.write() = items;
    }

    pub async fn refresh_banners(&self) {
        let items = self.fetch_collection("/api/banners").await;
        *self.banners.write() = items;
    }

    /// Fetch one collection, degrading to empty on any failure
    async fn fetch_collection<T: DeserializeOwned>(&self, path: &str) -> Vec<T> {
        let url = format!("{}{}", self.base_url, path);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("fetch {path} failed: {e}");
                return Vec::new();
            }
        };
        let body: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!("fetch {path} returned invalid json: {e}");
                return Vec::new();
            }
        };
        normalize_collection(body)
    }

    // ========================================================================
    // Cached reads
    // ========================================================================

    pub fn products(&self) -> Vec<Product> {
        self.products.read().clone()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories.read().clone()
    }

    pub fn banners(&self) -> Vec<Banner> {
        self.banners.read().clone()
    }

    /// Look one product up by id
    pub fn product(&self, id: i64) -> Option<Product> {
        self.products.read().iter().find(|p| p.id == id).cloned()
    }

    /// Filter the menu the way the home screen does
    ///
    /// Inactive products are hidden. The query matches the name case
    /// insensitively; `category` narrows to one category chip.
    pub fn search(&self, query: &str, category: Option<i64>) -> Vec<Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .read()
            .iter()
            .filter(|p| p.is_active)
            .filter(|p| category.is_none_or(|c| p.category_id == Some(c)))
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Replace the product cache directly, bypassing the network
    pub fn replace_products(&self, products: Vec<Product>) {
        *self.products.write() = products;
    }

    pub fn replace_categories(&self, categories: Vec<Category>) {
        *self.categories.write() = categories;
    }

    pub fn replace_banners(&self, banners: Vec<Banner>) {
        *self.banners.write() = banners;
    }
}

/// Unwrap a collection response into its elements
///
/// Accepts a bare array or a `{"data": [...]}` envelope. Elements that
/// fail to deserialize are dropped individually rather than discarding
/// the whole collection.
fn normalize_collection<T: DeserializeOwned>(body: Value) -> Vec<T> {
    let elements = match body {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };
    elements
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect()
}
