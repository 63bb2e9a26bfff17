use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Response wrapper shared by every backend endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl<T> ApiEnvelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: None,
        }
    }

    pub fn failure(message: impl Into<String>, status: u16) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            status: Some(status),
        }
    }

    /// Status reported inside the envelope, falling back to the HTTP status.
    pub fn effective_status(&self, http_status: u16) -> u16 {
        self.status.unwrap_or(http_status)
    }

    /// Unwrap `data`, turning `success: false` into [`ClientError::Api`].
    pub fn into_result(self, http_status: u16) -> Result<T, ClientError> {
        let status = self.effective_status(http_status);
        if !self.success {
            return Err(ClientError::Api {
                status,
                message: self.error.unwrap_or_else(|| "request failed".to_string()),
            });
        }
        self.data
            .ok_or_else(|| ClientError::Decode("envelope reported success without data".into()))
    }
}

impl ApiEnvelope<serde_json::Value> {
    /// For endpoints whose `data` is irrelevant (or absent) on success.
    pub fn into_unit_result(self, http_status: u16) -> Result<(), ClientError> {
        if self.success {
            return Ok(());
        }
        self.into_result(http_status).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_yields_data() {
        let env: ApiEnvelope<Vec<u32>> =
            serde_json::from_str(r#"{"success": true, "data": [1, 2, 3]}"#).unwrap();
        assert_eq!(env.into_result(200).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_envelope_maps_to_api_error() {
        let env: ApiEnvelope<Vec<u32>> = serde_json::from_str(
            r#"{"success": false, "error": "Lead not found", "status": 404}"#,
        )
        .unwrap();
        match env.into_result(200) {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 404);
                assert_eq!(message, "Lead not found");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_without_status_uses_http_status() {
        let env: ApiEnvelope<()> = serde_json::from_str(r#"{"success": false}"#).unwrap();
        match env.into_result(500) {
            Err(ClientError::Api { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "request failed");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_success_without_data_is_decode_error() {
        let env: ApiEnvelope<u32> = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(matches!(env.into_result(200), Err(ClientError::Decode(_))));
    }

    #[test]
    fn test_unit_result_tolerates_missing_data() {
        let env: ApiEnvelope<serde_json::Value> =
            serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(env.into_unit_result(200).is_ok());
    }

    #[test]
    fn test_serialize_omits_empty_fields() {
        let json = serde_json::to_string(&ApiEnvelope::ok(7)).unwrap();
        assert_eq!(json, r#"{"success":true,"data":7}"#);
    }
}
