//! Backend-facing services
//!
//! - **catalog**: cached product/category/banner collections
//! - **table_binding**: resolving a scanned table code
//! - **realtime**: applying pushed catalog updates

pub mod catalog;
pub mod realtime;
pub mod table_binding;

pub use catalog::CatalogClient;
pub use realtime::CatalogUpdate;
pub use table_binding::TableBindingClient;
