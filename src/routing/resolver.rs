//! Effective lane resolution.

use std::sync::Arc;

use crate::assignments::AssignmentStore;
use crate::lanes::{Catalog, Lane};

/// Resolves a client to the lane it should be served.
#[derive(Clone)]
pub struct LaneResolver {
    catalog: Arc<Catalog>,
    store: Arc<AssignmentStore>,
}

impl LaneResolver {
    pub fn new(catalog: Arc<Catalog>, store: Arc<AssignmentStore>) -> Self {
        Self { catalog, store }
    }

    /// The client's unexpired assignment, or the catalog default.
    pub fn resolve(&self, client_key: &str) -> Arc<Lane> {
        self.store
            .get(client_key)
            .unwrap_or_else(|| self.catalog.default_lane())
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn store(&self) -> &Arc<AssignmentStore> {
        &self.store
    }
}
