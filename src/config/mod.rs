//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON, or TOML by extension)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → LaneChangeConfig (validated, immutable)
//!     → Catalog + AssignmentStore built from it at startup
//! ```
//!
//! # Design Decisions
//! - Config is loaded once; there is no hot reload because the catalog
//!   is immutable for the process lifetime
//! - Optional sections have defaults so the historical three-key file
//!   (`port`, `default`, `lanes`) keeps working
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError, ConfigFormat};
pub use schema::AssignmentConfig;
pub use schema::LaneChangeConfig;
pub use schema::LaneDefinition;
pub use schema::ObservabilityConfig;
pub use schema::SecurityConfig;
pub use schema::TimeoutConfig;
pub use validation::{validate_config, ValidationError};
