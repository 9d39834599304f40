//! Table binding
//!
//! A guest arrives by scanning a QR code that carries a table code.
//! Resolving the code against the backend yields the table record,
//! which is persisted so the header badge survives navigation. A code
//! that fails to resolve leaves the guest unbound rather than blocking
//! the menu.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use shared::error::{OrderError, OrderResult};
use shared::models::DiningTable;

use crate::core::Config;
use crate::storage::{self, KvStore};

/// Resolves table codes and remembers the bound table
#[derive(Clone)]
pub struct TableBindingClient {
    http: reqwest::Client,
    base_url: String,
    kv: KvStore,
}

impl TableBindingClient {
    pub fn new(config: &Config, kv: KvStore) -> OrderResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| OrderError::FetchFailure(e.to_string()))?;
        Ok(Self { http, base_url: config.api_url.trim_end_matches('/').to_string(), kv })
    }

    /// Resolve a scanned code to its table and remember it
    ///
    /// Any failure (network, unknown code, malformed body) leaves the
    /// previous binding untouched and returns `None`.
    pub async fn bind(&self, code: &str) -> Option<DiningTable> {
        let url = format!("{}/api/tables/{}", self.base_url, code);
        let body: Value = match self.http.get(&url).send().await {
            Ok(r) => match r.json().await {
                Ok(v) => v,
                Err(e) => {
                    warn!("table lookup for {code} returned invalid json: {e}");
                    return None;
                }
            },
            Err(e) => {
                warn!("table lookup for {code} failed: {e}");
                return None;
            }
        };

        let table = extract_table(body)?;
        info!(table = %table.display_label(), "table bound");
        if let Err(e) = self.kv.put_json(storage::TABLE_KEY, &table) {
            warn!("failed to remember table: {e}");
        }
        Some(table)
    }

    /// The table remembered from an earlier scan, if any
    pub fn bound_table(&self) -> Option<DiningTable> {
        self.kv.get_json(storage::TABLE_KEY).ok().flatten()
    }

    /// Forget the bound table
    pub fn unbind(&self) {
        if let Err(e) = self.kv.remove(storage::TABLE_KEY) {
            warn!("failed to forget table: {e}");
        }
    }

    /// Remember the guest's display name for the ticket
    ///
    /// A blank name is ignored; the welcome screen requires one.
    pub fn remember_customer_name(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        if let Err(e) = self.kv.put_json(storage::CUSTOMER_NAME_KEY, &name) {
            warn!("failed to remember customer name: {e}");
        }
    }

    pub fn customer_name(&self) -> Option<String> {
        self.kv.get_json(storage::CUSTOMER_NAME_KEY).ok().flatten()
    }
}

/// Accept the table either bare or wrapped in a `data` envelope
fn extract_table(body: Value) -> Option<DiningTable> {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            serde_json::from_value(map.remove("data")?).ok()
        }
        other => serde_json::from_value(other).ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_client() -> (tempfile::TempDir, TableBindingClient) {
        let dir = tempfile::tempdir().expect("tempdir");
        let kv = KvStore::open(dir.path().join("table.redb")).expect("open store");
        let config = Config::with_overrides("http://localhost:0", dir.path().to_string_lossy());
        let client = TableBindingClient::new(&config, kv).expect("build client");
        (dir, client)
    }

    #[test]
    fn extracts_bare_and_enveloped_tables() {
        let bare = extract_table(json!({"id": 1, "name": "Meja 7", "location": "Lantai 2"}));
        assert_eq!(bare.unwrap().name, "Meja 7");

        let wrapped = extract_table(json!({"data": {"id": 2, "name": "Meja 9"}}));
        assert_eq!(wrapped.unwrap().id, 2);

        assert!(extract_table(json!({"error": "not found"})).is_none());
    }

    #[test]
    fn customer_name_roundtrip() {
        let (_dir, client) = temp_client();
        assert_eq!(client.customer_name(), None);
        client.remember_customer_name("Budi");
        assert_eq!(client.customer_name().as_deref(), Some("Budi"));

        // blank names are ignored
        client.remember_customer_name("   ");
        assert_eq!(client.customer_name().as_deref(), Some("Budi"));
    }

    #[test]
    fn unbind_clears_remembered_table() {
        let (_dir, client) = temp_client();
        let table: DiningTable =
            serde_json::from_value(json!({"id": 1, "name": "Meja 7"})).unwrap();
        client.kv.put_json(storage::TABLE_KEY, &table).unwrap();
        assert!(client.bound_table().is_some());
        client.unbind();
        assert!(client.bound_table().is_none());
    }
}
