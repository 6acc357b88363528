//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (x-request-id assigned and propagated)
//!     → client_addr.rs (X-Forwarded-For or peer IP → client key)
//!     → handlers.rs (decode, call routing::LaneDispatcher, render)
//!     → error.rs (DispatchError → 400)
//!     → Send to client
//! ```

pub mod client_addr;
pub mod error;
pub mod handlers;
pub mod request;
pub mod server;

pub use client_addr::ClientKey;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
