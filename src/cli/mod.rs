use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::clients::{HubSpotClient, PropertyClient};
use crate::domain::ObjectType;
use crate::infra::config::Config;

#[derive(Parser)]
#[command(name = "hubspot-mcp-server")]
#[command(about = "HubSpot CRM MCP server - Admin CLI")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the MCP server (default when no command is given)
    Serve,
    /// Health check the service
    Health {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Validate configuration
    Config {
        /// Validate config without starting service
        #[arg(long)]
        validate: bool,
    },
    /// Show service status
    Status {
        /// Service URL to check
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
    },
    /// Check HubSpot connectivity and credentials
    Ping {
        /// HubSpot API base URL (defaults to configuration)
        #[arg(short, long)]
        base_url: Option<String>,
    },
}

pub async fn run() -> ExitCode {
    let cli = Cli::parse();

    run_commands(cli.command.unwrap_or(Commands::Serve)).await
}

pub async fn run_commands(command: Commands) -> ExitCode {
    match command {
        Commands::Serve => match crate::infra::boot::run_server(Config::from_env_and_toml()).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!(error = %e, "server exited with error");
                ExitCode::FAILURE
            }
        },
        Commands::Health { url } => match health_check(&url).await {
            Ok(_) => {
                println!("✅ Service is healthy");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Health check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Config { validate: _ } => match validate_config() {
            Ok(_) => {
                println!("✅ Configuration is valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ Configuration validation failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Status { url } => match show_status(&url).await {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("❌ Status check failed: {}", e);
                ExitCode::FAILURE
            }
        },
        Commands::Ping { base_url } => match ping_hubspot(base_url).await {
            Ok(_) => {
                println!("✅ HubSpot is reachable");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("❌ HubSpot ping failed: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}

async fn health_check(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await?;

    if response.status().is_success() {
        Ok(())
    } else {
        Err(format!("HTTP {}", response.status()).into())
    }
}

fn validate_config() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env_and_toml();

    if !matches!(config.mode.as_str(), "server" | "stdio") {
        return Err(format!("Invalid MODE: {}. Must be 'server' or 'stdio'", config.mode).into());
    }

    if config.mode == "server" && config.port == 0 {
        return Err("PORT cannot be 0".into());
    }

    if !config.hubspot.base_url.starts_with("http://") && !config.hubspot.base_url.starts_with("https://") {
        return Err(format!("Invalid HUBSPOT_BASE_URL: {}", config.hubspot.base_url).into());
    }

    if config.hubspot.access_token.is_none() {
        eprintln!("⚠️  HUBSPOT_ACCESS_TOKEN is not set; tool calls will fail");
    }

    Ok(())
}

async fn show_status(url: &str) -> Result<(), Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();

    let health_response = client
        .get(format!("{}/healthz", url))
        .timeout(std::time::Duration::from_secs(5))
        .send()
        .await?;

    println!(
        "🏥 Health Status: {}",
        if health_response.status().is_success() {
            "✅ Healthy"
        } else {
            "❌ Unhealthy"
        }
    );

    let tools_response = client
        .post(format!("{}/mcp", url))
        .header("content-type", "application/json")
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/list",
            "params": {}
        }))
        .timeout(std::time::Duration::from_millis(500))
        .send()
        .await;

    match tools_response {
        Ok(resp) if resp.status().is_success() => {
            println!("🔧 Tools: ✅ Available");
        }
        Ok(resp) => {
            println!("🔧 Tools: ❌ HTTP {}", resp.status());
        }
        Err(_) => {
            println!("🔧 Tools: ❌ Unavailable");
        }
    }

    let config = Config::from_env_and_toml();
    println!("\n📋 Configuration:");
    println!("  Mode: {}", config.mode);
    println!("  Port: {}", config.port);
    println!(
        "  Log Level: {}",
        std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into())
    );
    println!("  HubSpot API: {}", config.hubspot.base_url);
    println!(
        "  Access Token: {}",
        if config.hubspot.access_token.is_some() { "configured" } else { "Not configured" }
    );

    Ok(())
}

async fn ping_hubspot(base_url: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let mut hubspot = Config::from_env_and_toml().hubspot;
    if let Some(base) = base_url {
        hubspot.base_url = base;
    }

    let client = PropertyClient::new(HubSpotClient::from_config(&hubspot)?);
    let property = client.fetch_property(ObjectType::Contacts, "email").await?;

    println!("🔗 {}", hubspot.base_url);
    println!("📇 contacts.{} ({}/{})", property.name, property.property_type, property.field_type);

    Ok(())
}
