//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (default references an existing lane)
//! - Validate value ranges (port > 0, sweep interval > 0)
//! - Reject lane headers that can never be sent
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LaneChangeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;

use crate::assignments::MAX_SWEEP_INTERVAL;
use crate::config::schema::LaneChangeConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("\"port\" must be provided and non-zero")]
    MissingPort,

    #[error("\"default\" must be provided")]
    MissingDefault,

    #[error("\"lanes\" must contain at least one lane")]
    NoLanes,

    #[error("provided default key \"{0}\" does not exist in lanes")]
    UnknownDefault(String),

    #[error("\"host\" is not a valid IP address: {0}")]
    InvalidHost(String),

    #[error("lane \"{lane}\" has invalid header name \"{header}\"")]
    InvalidHeaderName { lane: String, header: String },

    #[error("lane \"{lane}\" has invalid value for header \"{header}\"")]
    InvalidHeaderValue { lane: String, header: String },

    #[error("\"assignments.sweep_interval_secs\" must be greater than zero")]
    ZeroSweepInterval,

    #[error("\"assignments.sweep_interval_secs\" must be at most {max}, got {got}")]
    SweepIntervalTooLarge { got: u64, max: u64 },

    #[error("\"timeouts.request_secs\" must be greater than zero")]
    ZeroRequestTimeout,

    #[error("\"observability.metrics_address\" is not a valid socket address: {0}")]
    InvalidMetricsAddress(String),
}

pub fn validate_config(config: &LaneChangeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.port == 0 {
        errors.push(ValidationError::MissingPort);
    }

    if config.default_lane.is_empty() {
        errors.push(ValidationError::MissingDefault);
    }

    if config.lanes.is_empty() {
        errors.push(ValidationError::NoLanes);
    } else if !config.default_lane.is_empty() && !config.lanes.contains_key(&config.default_lane) {
        errors.push(ValidationError::UnknownDefault(config.default_lane.clone()));
    }

    if config.listen_addr().is_none() {
        errors.push(ValidationError::InvalidHost(config.host.clone()));
    }

    for (lane, definition) in &config.lanes {
        for (header, value) in &definition.headers {
            if HeaderName::from_bytes(header.as_bytes()).is_err() {
                errors.push(ValidationError::InvalidHeaderName {
                    lane: lane.clone(),
                    header: header.clone(),
                });
            } else if HeaderValue::from_str(value).is_err() {
                errors.push(ValidationError::InvalidHeaderValue {
                    lane: lane.clone(),
                    header: header.clone(),
                });
            }
        }
    }

    let sweep_interval_secs = config.assignments.sweep_interval_secs;
    if sweep_interval_secs == 0 {
        errors.push(ValidationError::ZeroSweepInterval);
    } else if sweep_interval_secs > MAX_SWEEP_INTERVAL.as_secs() {
        errors.push(ValidationError::SweepIntervalTooLarge {
            got: sweep_interval_secs,
            max: MAX_SWEEP_INTERVAL.as_secs(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    let metrics_address = &config.observability.metrics_address;
    if config.observability.metrics_enabled && metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(metrics_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
