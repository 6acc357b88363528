//! Client lane assignment subsystem.
//!
//! # Data Flow
//! ```text
//! POST /change   → store.rs set (replace whole Assignment)
//! DELETE /change → store.rs delete
//! GET / , /change → store.rs get / get_with_expiration (expiry checked on read)
//! sweeper.rs     → periodic store.rs sweep (memory reclamation only)
//! ```
//!
//! # Design Decisions
//! - Sharded concurrent map (DashMap): per-key operations lock one shard
//!   for a short critical section, unrelated keys proceed in parallel
//! - Assignments are replaced, never mutated in place
//! - Reads compare against the clock, so correctness never depends on
//!   the sweeper having run
//! - Time comes from a `Clock` so expiry is testable without sleeping

pub mod clock;
pub mod store;
pub mod sweeper;

pub use clock::{Clock, SystemClock};
pub use store::{Assignment, AssignmentStore};
pub use sweeper::{Sweeper, MAX_SWEEP_INTERVAL};
