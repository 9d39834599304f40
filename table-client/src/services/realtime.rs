//! Realtime catalog updates
//!
//! The backend pushes a notification whenever the menu changes; the
//! client reacts by re-fetching the affected collection. The listener
//! runs as a background task over a broadcast channel and treats a
//! lagged receiver as "missed something, refresh everything".

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::catalog::CatalogClient;

/// Pushed notification that part of the catalog changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogUpdate {
    ProductsChanged,
    CategoriesChanged,
    BannersChanged,
}

/// Re-fetch the collection an update names
pub async fn handle_update(catalog: &CatalogClient, update: CatalogUpdate) {
    debug!(?update, "catalog update received");
    match update {
        CatalogUpdate::ProductsChanged => catalog.refresh_products().await,
        CatalogUpdate::CategoriesChanged => catalog.refresh_categories().await,
        CatalogUpdate::BannersChanged => catalog.refresh_banners().await,
    }
}

/// Consume updates until the channel closes
pub async fn run_update_listener(
    catalog: CatalogClient,
    mut updates: broadcast::Receiver<CatalogUpdate>,
) {
    loop {
        match updates.recv().await {
            Ok(update) => handle_update(&catalog, update).await,
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "catalog updates lagged, refreshing everything");
                catalog.refresh_all().await;
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Config;
    use shared::models::{Banner, Product};

    // the backend is unreachable, so every refetch replaces the cache
    // with the empty collection
    fn unreachable_catalog() -> CatalogClient {
        CatalogClient::new(&Config::with_overrides("http://localhost:0", "."))
            .expect("build client")
    }

    fn banner() -> Banner {
        Banner {
            id: 1,
            title: "Promo".into(),
            subtitle: None,
            highlight_text: None,
            image: None,
        }
    }

    #[tokio::test]
    async fn update_refetches_only_the_named_collection() {
        let catalog = unreachable_catalog();
        catalog.replace_products(vec![Product::new(1, "Teh Manis", 3000)]);
        catalog.replace_banners(vec![banner()]);

        handle_update(&catalog, CatalogUpdate::ProductsChanged).await;
        assert!(catalog.products().is_empty());
        assert_eq!(catalog.banners().len(), 1);
    }

    #[tokio::test]
    async fn listener_exits_when_channel_closes() {
        let catalog = unreachable_catalog();
        let (tx, rx) = broadcast::channel(8);
        let handle = tokio::spawn(run_update_listener(catalog, rx));
        drop(tx);
        handle.await.expect("listener task");
    }

    #[tokio::test]
    async fn lagged_listener_refreshes_everything() {
        let catalog = unreachable_catalog();
        catalog.replace_products(vec![Product::new(1, "Teh Manis", 3000)]);
        catalog.replace_banners(vec![banner()]);

        // overflow a capacity-1 channel before the listener starts, so
        // its first recv observes the lag
        let (tx, rx) = broadcast::channel(1);
        for _ in 0..3 {
            tx.send(CatalogUpdate::ProductsChanged).expect("send update");
        }
        drop(tx);

        tokio::spawn(run_update_listener(catalog.clone(), rx))
            .await
            .expect("listener task");
        assert!(catalog.products().is_empty());
        assert!(catalog.banners().is_empty());
    }
}
