//! Request dispatch: serve, change and introspect operations.
//!
//! # Responsibilities
//! - Serve the resolved lane for a client
//! - Assign, query and clear a client's assignment
//! - Expose the catalog for introspection
//!
//! # Design Decisions
//! - Transport-agnostic: the HTTP layer decodes requests into
//!   `ChangeRequest` and renders `ChangeOutcome`
//! - "No assignment" is an outcome, not an error

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::assignments::AssignmentStore;
use crate::lanes::{Catalog, CatalogView, Lane};
use crate::observability::metrics;
use crate::routing::resolver::LaneResolver;

/// Client-facing failures of the change operation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The request body could not be decoded.
    #[error("{0}")]
    MalformedRequest(String),

    /// The requested lane is not in the catalog.
    #[error("Error with request (Lane key invalid?)")]
    UnknownLane(String),
}

/// The three change sub-operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeRequest {
    Query,
    Assign { lane: String, duration_secs: u64 },
    Clear,
}

/// A client's assignment as reported to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssignmentView {
    pub lane: String,
    /// `None` when the assignment never expires.
    pub expires: Option<DateTime<Utc>>,
    pub ip: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// Query found a live assignment.
    Current(AssignmentView),
    /// Query found nothing.
    Unassigned,
    Assigned(AssignmentView),
    Cleared,
}

/// Entry point for every client-facing operation.
#[derive(Clone)]
pub struct LaneDispatcher {
    resolver: LaneResolver,
}

impl LaneDispatcher {
    pub fn new(catalog: Arc<Catalog>, store: Arc<AssignmentStore>) -> Self {
        Self {
            resolver: LaneResolver::new(catalog, store),
        }
    }

    /// Lane whose headers and content this client should receive.
    pub fn serve(&self, client_key: &str) -> Arc<Lane> {
        self.resolver.resolve(client_key)
    }

    pub fn change(
        &self,
        client_key: &str,
        request: ChangeRequest,
    ) -> Result<ChangeOutcome, DispatchError> {
        match request {
            ChangeRequest::Query => Ok(self.query(client_key)),
            ChangeRequest::Assign { lane, duration_secs } => {
                self.assign(client_key, &lane, duration_secs)
            }
            ChangeRequest::Clear => {
                if self.store().delete(client_key) {
                    tracing::info!(client = %client_key, "Assignment cleared");
                }
                metrics::record_assignment_event("cleared");
                Ok(ChangeOutcome::Cleared)
            }
        }
    }

    /// Full catalog for `GET /config`. Never touches the store.
    pub fn introspect(&self) -> CatalogView<'_> {
        self.resolver.catalog().view()
    }

    fn query(&self, client_key: &str) -> ChangeOutcome {
        match self.store().get_with_expiration(client_key) {
            Some(assignment) => ChangeOutcome::Current(AssignmentView {
                lane: assignment.lane().key.clone(),
                expires: assignment.expires_at(),
                ip: client_key.to_string(),
            }),
            None => ChangeOutcome::Unassigned,
        }
    }

    fn assign(
        &self,
        client_key: &str,
        lane_key: &str,
        duration_secs: u64,
    ) -> Result<ChangeOutcome, DispatchError> {
        let Some(lane) = self.resolver.catalog().lookup(lane_key) else {
            tracing::warn!(client = %client_key, lane = %lane_key, "Rejected unknown lane");
            metrics::record_assignment_event("rejected");
            return Err(DispatchError::UnknownLane(lane_key.to_string()));
        };

        let expires = self
            .store()
            .set(client_key, lane, Duration::from_secs(duration_secs));

        tracing::info!(
            client = %client_key,
            lane = %lane_key,
            expires_at = ?expires,
            "Lane assigned"
        );
        metrics::record_assignment_event("assigned");

        Ok(ChangeOutcome::Assigned(AssignmentView {
            lane: lane_key.to_string(),
            expires,
            ip: client_key.to_string(),
        }))
    }

    fn store(&self) -> &AssignmentStore {
        self.resolver.store()
    }
}
