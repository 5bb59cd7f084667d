use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ExportError;

/// Envelope returned to API Gateway or the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

/// Outcome of a successfully submitted export task.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportStarted {
    pub export_task_identifier: String,
    pub status: Option<String>,
}

impl ApiGatewayResponse {
    pub fn success(message: &str, started: &ExportStarted) -> Self {
        Self {
            status_code: 200,
            body: json!({
                "message": message,
                "exportTaskIdentifier": started.export_task_identifier,
            })
            .to_string(),
        }
    }

    pub fn failure(message: &str, err: &ExportError) -> Self {
        Self {
            status_code: 500,
            body: json!({
                "message": message,
                "error": err.detail(),
            })
            .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_success_envelope() {
        let response = ApiGatewayResponse::success(
            "Export task started",
            &ExportStarted {
                export_task_identifier: "snapshot20250115102030".to_string(),
                status: Some("STARTING".to_string()),
            },
        );

        assert_eq!(response.status_code, 200);

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], "Export task started");
        assert_eq!(body["exportTaskIdentifier"], "snapshot20250115102030");
        assert!(body.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope() {
        let response = ApiGatewayResponse::failure(
            "Failed to start export task",
            &ExportError::MissingConfig("SOURCE_ARN"),
        );

        assert_eq!(response.status_code, 500);

        let body: Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(body["message"], "Failed to start export task");
        assert_eq!(body["error"]["kind"], "configuration");
        assert_eq!(
            body["error"]["message"],
            "missing required environment variable SOURCE_ARN"
        );
    }

    #[test]
    fn test_status_code_field_name() {
        let response = ApiGatewayResponse {
            status_code: 200,
            body: "{}".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert!(json.get("status_code").is_none());
    }
}
