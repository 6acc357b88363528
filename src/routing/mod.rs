//! Lane routing subsystem.
//!
//! # Data Flow
//! ```text
//! client key (from http::client_addr)
//!     → resolver.rs (live assignment, else catalog default)
//!     → dispatcher.rs (serve / change / introspect)
//!     → outcome rendered by http::handlers
//! ```
//!
//! # Design Decisions
//! - Resolution never fails: the catalog always has a default lane
//! - Lane keys are validated against the catalog before reaching the store
//! - Client errors stop at the dispatcher boundary as `DispatchError`

pub mod dispatcher;
pub mod resolver;

pub use dispatcher::{AssignmentView, ChangeOutcome, ChangeRequest, DispatchError, LaneDispatcher};
pub use resolver::LaneResolver;
