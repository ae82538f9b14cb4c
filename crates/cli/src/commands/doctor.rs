//! `bankbot doctor` — Diagnose configuration.

use bankbot_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 Bankbot Doctor — Configuration Diagnostics");
    println!("=============================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if config_path.exists() {
        println!("  ✅ Config file found: {}", config_path.display());
    } else {
        println!("  ⚠️  No config file, using defaults — run `bankbot config init`");
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Configuration valid");
            config
        }
        Err(e) => {
            println!("  ❌ Configuration invalid: {e}");
            println!("\n  ⚠️  1 issue(s) found. See above for details.");
            return Ok(());
        }
    };

    if config.workspace_id().is_some() {
        println!("  ✅ Workspace configured");
    } else {
        println!("  ❌ No workspace — set WORKSPACE_ID or assistant.workspace_id");
        issues += 1;
    }

    if config.assistant.has_credentials() {
        println!("  ✅ Assistant credentials configured");
    } else {
        println!("  ⚠️  No assistant credentials — set ASSISTANT_APIKEY");
        issues += 1;
    }

    if config.functions.user.is_some() && config.functions.password.is_some() {
        println!("  ✅ Cloud function credentials configured");
    } else {
        println!("  ⚠️  Cloud function credentials incomplete (CLOUD_FUNCTION_USER / CLOUD_FUNCTION_PASS)");
        issues += 1;
    }

    if config.bank.valid_accounts.is_empty() {
        println!("  ⚠️  Account allow-list is empty; every account will be invalid");
        issues += 1;
    } else {
        println!(
            "  ✅ {} account(s) on the allow-list",
            config.bank.valid_accounts.len()
        );
    }

    if std::path::Path::new(&config.gateway.static_dir).is_dir() {
        println!("  ✅ Static UI directory: {}", config.gateway.static_dir);
    } else {
        println!(
            "  ⚠️  Static UI directory '{}' not found; only the API will be served",
            config.gateway.static_dir
        );
    }

    // Summary
    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
