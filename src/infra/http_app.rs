use axum::{
    routing::{any_service, get},
    Router,
};
use std::sync::Arc;

use crate::infra::mcp::HubSpotSvc;
use crate::infra::runtime::mcp_transport::{make_streamable_http_service, LocalSessionManager};

/// `/healthz` + streamable MCP at `/mcp`.
pub fn build_app(svc: HubSpotSvc) -> Router {
    let session_mgr = Arc::new(LocalSessionManager::default());
    let mcp_service = make_streamable_http_service(move || svc.clone(), session_mgr);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route_service("/mcp", any_service(mcp_service))
}
