//! Inbound message envelope.
//!
//! The surrounding application talks to the engine through JSON request
//! messages with an `action` tag and an action-specific payload. Every
//! request gets a response; failures come back as `success = false` with
//! a message, never as a transport-level error.

use crate::error::EngineError;
use crate::export::{self, ExportFormat};
use crate::orchestrator::SearchOrchestrator;
use demori_core::{AggregatedProfile, ContactQuery};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// An inbound request message.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    /// Action tag, e.g. `searchContact`
    pub action: String,
    /// Action-specific payload
    #[serde(default)]
    pub payload: Value,
}

/// An outbound response message.
#[derive(Debug, Clone, Serialize)]
pub struct Response {
    /// Whether the action succeeded
    pub success: bool,
    /// Action result on success
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
    /// Failure message on error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    fn ok(data: Value) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Value::Null,
            error: Some(message.into()),
        }
    }
}

/// Dispatch a request to the orchestrator.
///
/// Unknown actions and malformed payloads become error responses.
pub async fn handle(orchestrator: &SearchOrchestrator, request: Request) -> Response {
    debug!(action = %request.action, "handling request");
    match dispatch(orchestrator, request).await {
        Ok(data) => Response::ok(data),
        Err(e) => Response::err(e.to_string()),
    }
}

async fn dispatch(
    orchestrator: &SearchOrchestrator,
    request: Request,
) -> Result<Value, EngineError> {
    match request.action.as_str() {
        "searchContact" => {
            let query: ContactQuery = serde_json::from_value(request.payload)
                .map_err(|e| EngineError::InvalidPayload(e.to_string()))?;
            let outcome = orchestrator.search(&query).await?;
            Ok(json!({
                "profile": outcome.profile,
                "origin": outcome.origin,
            }))
        }
        "getHistory" => {
            let limit = request
                .payload
                .get("limit")
                .and_then(Value::as_i64)
                .unwrap_or(20);
            let entries = orchestrator.history(limit).await?;
            Ok(json!({ "entries": entries }))
        }
        "syncPending" => {
            let report = orchestrator.sync().await?;
            Ok(json!({ "report": report }))
        }
        "exportResults" => {
            let profiles: Vec<AggregatedProfile> = request
                .payload
                .get("profiles")
                .cloned()
                .map_or_else(|| Ok(Vec::new()), serde_json::from_value)
                .map_err(|e| EngineError::InvalidPayload(e.to_string()))?;
            let format: ExportFormat = request
                .payload
                .get("format")
                .and_then(Value::as_str)
                .unwrap_or("json")
                .parse()?;
            let rendered = export::render(&profiles, format)?;
            Ok(json!({ "content": rendered }))
        }
        other => Err(EngineError::UnknownAction(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demori_core::settings::EngineSettings;
    use demori_core::SearchOrigin;
    use demori_sources::SourceRegistry;
    use demori_store::Store;
    use std::sync::Arc;

    async fn orchestrator_without_sources() -> SearchOrchestrator {
        let store = Arc::new(Store::in_memory().await.expect("create store"));
        SearchOrchestrator::with_parts(
            EngineSettings::default(),
            SourceRegistry::new(),
            store,
            None,
        )
    }

    #[tokio::test]
    async fn test_search_contact_action() {
        let orchestrator = orchestrator_without_sources().await;
        let request = Request {
            action: "searchContact".to_string(),
            payload: json!({"name": "Ahmed Rashid", "company": "Acme Corp"}),
        };

        let response = handle(&orchestrator, request).await;

        assert!(response.success);
        // No sources registered, so this is the predicted fallback
        assert_eq!(response.data["origin"], json!(SearchOrigin::Fallback));
        assert_eq!(
            response.data["profile"]["emails"][0]["address"],
            "ahmed.rashid@acmecorp.com"
        );
    }

    #[tokio::test]
    async fn test_invalid_query_becomes_error_response() {
        let orchestrator = orchestrator_without_sources().await;
        let request = Request {
            action: "searchContact".to_string(),
            payload: json!({"name": "   "}),
        };

        let response = handle(&orchestrator, request).await;
        assert!(!response.success);
        assert!(response.error.expect("error message").contains("name"));
    }

    #[tokio::test]
    async fn test_unknown_action() {
        let orchestrator = orchestrator_without_sources().await;
        let request = Request {
            action: "launchMissiles".to_string(),
            payload: Value::Null,
        };

        let response = handle(&orchestrator, request).await;
        assert!(!response.success);
        assert!(response
            .error
            .expect("error message")
            .contains("unknown action"));
    }

    #[tokio::test]
    async fn test_get_history_defaults() {
        let orchestrator = orchestrator_without_sources().await;
        let request = Request {
            action: "getHistory".to_string(),
            payload: Value::Null,
        };

        let response = handle(&orchestrator, request).await;
        assert!(response.success);
        assert_eq!(response.data["entries"], json!([]));
    }

    #[tokio::test]
    async fn test_sync_without_remote() {
        let orchestrator = orchestrator_without_sources().await;
        let request = Request {
            action: "syncPending".to_string(),
            payload: Value::Null,
        };

        let response = handle(&orchestrator, request).await;
        assert!(response.success);
        assert_eq!(response.data["report"], Value::Null);
    }

    #[tokio::test]
    async fn test_export_results_action() {
        let orchestrator = orchestrator_without_sources().await;
        let profile = crate::fallback::fallback_profile(
            &ContactQuery::new("Ada Lovelace").with_company("Acme Corp"),
        );
        let request = Request {
            action: "exportResults".to_string(),
            payload: json!({"profiles": [profile], "format": "csv"}),
        };

        let response = handle(&orchestrator, request).await;
        assert!(response.success);
        let content = response.data["content"].as_str().expect("csv content");
        assert!(content.starts_with("name,company"));
        assert!(content.contains("ada.lovelace@acmecorp.com"));
    }

    #[tokio::test]
    async fn test_export_unknown_format() {
        let orchestrator = orchestrator_without_sources().await;
        let request = Request {
            action: "exportResults".to_string(),
            payload: json!({"profiles": [], "format": "xml"}),
        };

        let response = handle(&orchestrator, request).await;
        assert!(!response.success);
    }

    #[test]
    fn test_request_deserializes_without_payload() {
        let request: Request =
            serde_json::from_str(r#"{"action": "getHistory"}"#).expect("parse request");
        assert_eq!(request.action, "getHistory");
        assert!(request.payload.is_null());
    }
}
