//! Immutable lane catalog.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::config::schema::LaneDefinition;

/// A named content variant a client can be routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lane {
    /// Catalog key of this lane. Not part of the serialized form, the key
    /// is already the map key in `/config` output.
    #[serde(skip)]
    pub key: String,

    /// Response headers applied when this lane is served.
    pub headers: BTreeMap<String, String>,

    /// Response body.
    pub content: String,
}

impl Lane {
    pub fn new(key: impl Into<String>, definition: LaneDefinition) -> Self {
        Self {
            key: key.into(),
            headers: definition.headers,
            content: definition.content,
        }
    }
}

/// Errors raised when a catalog would violate its invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog must contain at least one lane")]
    Empty,

    #[error("default lane \"{0}\" does not exist in lanes")]
    UnknownDefault(String),
}

/// The full set of configured lanes plus the designated default.
#[derive(Debug)]
pub struct Catalog {
    lanes: BTreeMap<String, Arc<Lane>>,
    default_lane: Arc<Lane>,
}

impl Catalog {
    /// Build a catalog, enforcing that it is non-empty and that the default
    /// key names one of its lanes.
    pub fn new<I>(default_key: &str, definitions: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (String, LaneDefinition)>,
    {
        let lanes: BTreeMap<String, Arc<Lane>> = definitions
            .into_iter()
            .map(|(key, definition)| {
                let lane = Arc::new(Lane::new(key.clone(), definition));
                (key, lane)
            })
            .collect();

        if lanes.is_empty() {
            return Err(CatalogError::Empty);
        }

        let default_lane = lanes
            .get(default_key)
            .cloned()
            .ok_or_else(|| CatalogError::UnknownDefault(default_key.to_string()))?;

        Ok(Self { lanes, default_lane })
    }

    /// Look up a lane by key.
    pub fn lookup(&self, key: &str) -> Option<Arc<Lane>> {
        self.lanes.get(key).cloned()
    }

    /// The lane served to clients without an active assignment.
    pub fn default_lane(&self) -> Arc<Lane> {
        self.default_lane.clone()
    }

    pub fn default_key(&self) -> &str {
        &self.default_lane.key
    }

    pub fn lanes(&self) -> &BTreeMap<String, Arc<Lane>> {
        &self.lanes
    }

    pub fn len(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lanes.is_empty()
    }

    /// Serializable snapshot for introspection. Carries no listener details.
    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            default: self.default_key(),
            lanes: &self.lanes,
        }
    }
}

/// Introspection payload for `GET /config`.
#[derive(Debug, Serialize)]
pub struct CatalogView<'a> {
    pub default: &'a str,
    pub lanes: &'a BTreeMap<String, Arc<Lane>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(content: &str) -> LaneDefinition {
        LaneDefinition {
            headers: BTreeMap::from([("X-Lane".to_string(), content.to_string())]),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_catalog_resolves_default() {
        let catalog = Catalog::new(
            "A",
            vec![("A".to_string(), definition("a")), ("B".to_string(), definition("b"))],
        )
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.default_key(), "A");
        assert_eq!(catalog.default_lane().content, "a");
        assert_eq!(catalog.lookup("B").unwrap().key, "B");
        assert!(catalog.lookup("Z").is_none());
    }

    #[test]
    fn test_catalog_rejects_empty() {
        let err = Catalog::new("A", Vec::new()).unwrap_err();
        assert_eq!(err, CatalogError::Empty);
    }

    #[test]
    fn test_catalog_rejects_unknown_default() {
        let err = Catalog::new("Z", vec![("A".to_string(), definition("a"))]).unwrap_err();
        assert_eq!(err, CatalogError::UnknownDefault("Z".to_string()));
    }

    #[test]
    fn test_view_serializes_without_lane_key() {
        let catalog = Catalog::new("A", vec![("A".to_string(), definition("a"))]).unwrap();
        let json = serde_json::to_value(catalog.view()).unwrap();

        assert_eq!(json["default"], "A");
        assert_eq!(json["lanes"]["A"]["content"], "a");
        assert_eq!(json["lanes"]["A"]["headers"]["X-Lane"], "a");
        assert!(json["lanes"]["A"].get("key").is_none());
        assert!(json.get("port").is_none());
    }
}
