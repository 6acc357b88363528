//! Lane catalog subsystem.
//!
//! # Data Flow
//! ```text
//! validated config (lanes + default key)
//!     → catalog.rs (Lane values behind Arc, default resolved once)
//!     → shared read-only by resolver, dispatcher and /config
//! ```
//!
//! # Design Decisions
//! - Built once at startup, never mutated afterwards
//! - Lanes are handed out as `Arc<Lane>` so assignments can reference them
//!   without copying headers or content
//! - No locking: the catalog is immutable for the process lifetime

pub mod catalog;

pub use catalog::{Catalog, CatalogError, CatalogView, Lane};
