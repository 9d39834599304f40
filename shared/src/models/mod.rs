//! Domain models served by the backend collaborators
//!
//! These mirror the JSON the catalog/banner/table services return. The
//! wire shapes are loose (fields come and go between backend versions),
//! so every optional field carries a serde default.

pub mod banner;
pub mod category;
pub mod dining_table;
pub mod product;

pub use banner::Banner;
pub use category::Category;
pub use dining_table::{DiningTable, TableLocation};
pub use product::Product;
