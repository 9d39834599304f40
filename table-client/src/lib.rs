//! Table Client Core
//!
//! Client-side engine for the table ordering flow: a scanned table code
//! opens the menu, the cart builds up locally, checkout assembles the
//! order, and the tracking stage shows kitchen progress.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   state token   ┌─────────────────┐   state token   ┌──────────────┐
//! │  CartStore    │ ──────────────▶ │ CheckoutSession │ ──────────────▶ │  Tracking    │
//! │  (menu page)  │                 │ (checkout page) │                 │  Projector   │
//! └──────┬───────┘                 └────────┬────────┘                 └──────┬───────┘
//!        │                                  │                                 │
//!        └──────────────┬───────────────────┴───────────────┬────────────────┘
//!                       ▼                                   ▼
//!                 ┌──────────┐                      ┌───────────────┐
//!                 │ KvStore  │                      │ CatalogClient │
//!                 │ (redb)   │                      │ (reqwest)     │
//!                 └──────────┘                      └───────────────┘
//! ```
//!
//! Each stage persists its working state into the [`storage::KvStore`]
//! under a well-known key, so a restarted client resumes where the
//! guest left off.

pub mod cart;
pub mod checkout;
pub mod codec;
pub mod core;
pub mod services;
pub mod storage;
pub mod tracking;
pub mod utils;

pub use cart::CartStore;
pub use checkout::{CheckoutSession, Submission};
pub use codec::{decode_state, encode_state, try_decode_state};
pub use core::Config;
pub use services::catalog::CatalogClient;
pub use storage::KvStore;
pub use tracking::{Clock, SystemClock, TrackingProjector, TrackingStage};
