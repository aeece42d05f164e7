use reqwest::RequestBuilder;

/// Generate a simple request id suitable for logging/correlation.
pub fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("hs-mcp-{}-{}", now.as_secs(), now.subsec_nanos())
}

/// Add bearer auth plus the standard correlation headers. Returns the updated
/// builder and the request id used.
pub fn add_standard_headers(builder: RequestBuilder, access_token: &str) -> (RequestBuilder, String) {
    let rid = generate_request_id();
    let b = builder
        .bearer_auth(access_token)
        .header("x-request-id", rid.as_str())
        .header(
            reqwest::header::USER_AGENT,
            format!("hubspot-mcp-server/{}", env!("CARGO_PKG_VERSION")),
        );
    (b, rid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_carry_prefix() {
        assert!(generate_request_id().starts_with("hs-mcp-"));
    }

    #[test]
    fn sets_auth_and_correlation_headers() {
        let client = reqwest::Client::new();
        let (builder, rid) = add_standard_headers(client.get("http://localhost/x"), "tok");
        let req = builder.build().unwrap();
        assert_eq!(req.headers()["authorization"], "Bearer tok");
        assert_eq!(req.headers()["x-request-id"], rid.as_str());
        assert!(req.headers()["user-agent"]
            .to_str()
            .unwrap()
            .starts_with("hubspot-mcp-server/"));
    }
}
