//! Response envelopes.
//!
//! Successful metadata calls return the bare tree and downloads return CSV,
//! so the only shared shapes are the error envelope and the health payload.

use serde::Serialize;
use utoipa::ToSchema;

/// Message reported by the liveness probe.
pub const HEALTH_MESSAGE: &str = "Delta Sharing gateway is running";

/// Uniform error envelope: `{"error": "<message>"}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable error message. Advisory only.
    pub error: String,
}

impl ErrorBody {
    /// Creates an error envelope.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Liveness payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `healthy`.
    pub status: &'static str,
    /// Fixed message.
    pub message: &'static str,
}

impl HealthResponse {
    /// The fixed healthy payload.
    pub fn healthy() -> Self {
        Self {
            status: "healthy",
            message: HEALTH_MESSAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let json = serde_json::to_value(ErrorBody::new("boom")).unwrap();
        assert_eq!(json, serde_json::json!({"error": "boom"}));
    }

    #[test]
    fn test_health_shape() {
        let json = serde_json::to_value(HealthResponse::healthy()).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["message"], HEALTH_MESSAGE);
        assert_eq!(json.as_object().unwrap().len(), 2);
    }
}
