//! Sticky lane routing library.
//!
//! A client is assigned to one of several configured content lanes and
//! keeps receiving that lane until the assignment expires or is cleared.

pub mod assignments;
pub mod config;
pub mod http;
pub mod lanes;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use assignments::AssignmentStore;
pub use config::LaneChangeConfig;
pub use http::HttpServer;
pub use lanes::Catalog;
pub use lifecycle::Shutdown;
