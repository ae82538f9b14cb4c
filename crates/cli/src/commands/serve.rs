//! `bankbot serve` — Start the HTTP server.

use bankbot_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("🏦 Bankbot");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Assistant: {}", config.assistant.url);
    match config.workspace_id() {
        Some(workspace) => println!("   Workspace: {workspace}"),
        None => println!("   Workspace: not configured (set WORKSPACE_ID)"),
    }

    bankbot_gateway::start(config).await?;

    Ok(())
}
