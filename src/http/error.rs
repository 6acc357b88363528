//! HTTP rendering of dispatch errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routing::DispatchError;

impl IntoResponse for DispatchError {
    fn into_response(self) -> Response {
        let status = match &self {
            DispatchError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            DispatchError::UnknownLane(_) => StatusCode::BAD_REQUEST,
        };

        (status, self.to_string()).into_response()
    }
}
