use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    hubspot_mcp_server::infra::logging::init();
    hubspot_mcp_server::cli::run().await
}
