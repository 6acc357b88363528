//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout, plain or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (client, lane, expires_at) on every event
//! - Request ID attached by the HTTP layer flows through trace spans
//! - Metrics are cheap and no-ops until an exporter is installed

pub mod logging;
pub mod metrics;
