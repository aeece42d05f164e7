//! Text-content envelope returned from every tool call.

use rmcp::model::{CallToolResult, Content};

use super::error::ApiFailure;

/// What a client method produced: a JSON document, or a normalized upstream
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Json(String),
    Failure(ApiFailure),
}

impl Reply {
    pub fn is_failure(&self) -> bool {
        matches!(self, Reply::Failure(_))
    }

    pub fn text(&self) -> String {
        match self {
            Reply::Json(s) => s.clone(),
            Reply::Failure(f) => f.to_json(),
        }
    }

    /// Wrap in MCP text content; failures are flagged `isError`.
    pub fn into_call_result(self) -> CallToolResult {
        match self {
            Reply::Json(s) => CallToolResult::success(vec![Content::text(s)]),
            Reply::Failure(f) => CallToolResult::error(vec![Content::text(f.to_json())]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_reply_is_success() {
        let out = Reply::Json("{\"id\":\"1\"}".into()).into_call_result();
        assert_eq!(out.is_error, Some(false));
        let v = serde_json::to_value(&out).unwrap();
        assert_eq!(v["content"][0]["text"], "{\"id\":\"1\"}");
    }

    #[test]
    fn failure_reply_is_flagged() {
        let reply = Reply::Failure(ApiFailure {
            status: 409,
            category: Some("CONFLICT".into()),
            message: "exists".into(),
            correlation_id: Some("abc".into()),
        });
        assert!(reply.is_failure());
        assert!(reply.text().contains("\"status\":409"));
        assert_eq!(reply.into_call_result().is_error, Some(true));
    }
}
