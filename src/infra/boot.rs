use crate::infra::config::Config;
use crate::infra::mcp::HubSpotSvc;
use std::net::SocketAddr;

pub async fn run_server(cfg: Config) -> anyhow::Result<()> {
    tracing::info!(
        mode = %cfg.mode,
        port = cfg.port,
        base_url = %cfg.hubspot.base_url,
        token_configured = cfg.hubspot.access_token.is_some(),
        "BOOT hubspot-mcp-server"
    );

    let svc = HubSpotSvc::from_config(&cfg.hubspot)?;

    if cfg.mode == "stdio" {
        crate::infra::runtime::mcp_transport::serve_stdio(svc)
            .await
            .map_err(|e| anyhow::anyhow!(e))?;
        return Ok(());
    }

    let app = crate::infra::http_app::build_app(svc);
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.port).into();
    tracing::info!(%addr, "listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;
    Ok(())
}
