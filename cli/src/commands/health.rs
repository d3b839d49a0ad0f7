use crate::utils::env_paths::{api_port, get_environment, EnvPaths};
use anyhow::Result;
use colored::*;
use database::DatabaseConfig;
use serde_json::json;
use std::time::Duration;

/// Execute the health check command
pub async fn execute(format: String) -> Result<()> {
    let health_status = check_system_health().await;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&health_status)?);
        }
        _ => {
            print_health_status_text(&health_status);
        }
    }

    Ok(())
}

/// Check the health of the database and the running API
async fn check_system_health() -> serde_json::Value {
    let database = check_database_health().await;
    let api = check_api_health().await;

    let overall = if [&database, &api]
        .iter()
        .all(|c| c["status"].as_str() == Some("healthy"))
    {
        "healthy"
    } else {
        "degraded"
    };

    json!({
        "status": overall,
        "environment": get_environment(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "components": {
            "database": database,
            "api": api,
        }
    })
}

async fn check_database_health() -> serde_json::Value {
    let env_paths = match EnvPaths::load() {
        Ok(paths) => paths,
        Err(e) => {
            return json!({
                "status": "unhealthy",
                "message": format!("Failed to load environment paths: {}", e)
            });
        }
    };

    let db_path = env_paths.database_path();
    if !db_path.exists() {
        return json!({
            "status": "not_initialized",
            "message": "Database file does not exist yet",
            "path": db_path.display().to_string()
        });
    }

    let config = DatabaseConfig::new_with_path(db_path.clone()).with_create_tables(false);
    let probe = match database::initialize_database(config).await {
        Ok(db) => db.ping().await,
        Err(e) => Err(e),
    };

    match probe {
        Ok(()) => json!({
            "status": "healthy",
            "message": "Database file exists and is accessible",
            "path": db_path.display().to_string()
        }),
        Err(e) => json!({
            "status": "unhealthy",
            "message": format!("Database exists but cannot be accessed: {}", e),
            "path": db_path.display().to_string()
        }),
    }
}

async fn check_api_health() -> serde_json::Value {
    let port = match api_port() {
        Ok(port) => port,
        Err(e) => {
            return json!({
                "status": "unhealthy",
                "message": e.to_string()
            });
        }
    };
    let endpoint = format!("http://localhost:{}", port);
    let url = format!("{}/api/v1/health", endpoint);

    let client = match reqwest::Client::builder()
        .timeout(Duration::from_secs(3))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            return json!({
                "status": "unhealthy",
                "message": format!("Failed to build HTTP client: {}", e),
                "endpoint": endpoint
            });
        }
    };

    match client.get(&url).send().await {
        Ok(response) if response.status().is_success() => json!({
            "status": "healthy",
            "message": "API server is running and responsive",
            "endpoint": endpoint
        }),
        Ok(response) => json!({
            "status": "unhealthy",
            "message": format!("API server returned status: {}", response.status()),
            "endpoint": endpoint
        }),
        Err(_) => json!({
            "status": "offline",
            "message": "API server is not running or not reachable",
            "endpoint": endpoint
        }),
    }
}

/// Print health status in a formatted text output
fn print_health_status_text(status: &serde_json::Value) {
    println!("{}", "=== Board System Health Check ===".bold());
    println!();

    let overall_status = status["status"].as_str().unwrap_or("unknown");
    let status_display = match overall_status {
        "healthy" => "HEALTHY".green().bold(),
        "degraded" => "DEGRADED".yellow().bold(),
        _ => "UNKNOWN".white().bold(),
    };

    println!("Overall Status: {}", status_display);
    println!("Environment: {}", status["environment"].as_str().unwrap_or(""));
    println!("Timestamp: {}", status["timestamp"].as_str().unwrap_or(""));
    println!();

    println!("{}", "Components:".bold());
    println!("{}", "─".repeat(50));

    if let Some(components) = status["components"].as_object() {
        for (name, component) in components {
            let comp_status = component["status"].as_str().unwrap_or("unknown");
            let status_icon = match comp_status {
                "healthy" => "✓".green(),
                "unhealthy" => "✗".red(),
                "offline" | "not_initialized" => "○".white(),
                _ => "?".white(),
            };

            let status_text = match comp_status {
                "healthy" => comp_status.green(),
                "unhealthy" => comp_status.red(),
                _ => comp_status.white(),
            };

            println!(
                "{} {} ({})",
                status_icon,
                name.to_uppercase().bold(),
                status_text
            );

            if let Some(message) = component["message"].as_str() {
                println!("  {}", message);
            }
            if let Some(path) = component["path"].as_str() {
                println!("  Path: {}", path);
            }
            if let Some(endpoint) = component["endpoint"].as_str() {
                println!("  Endpoint: {}", endpoint);
            }

            println!();
        }
    }
}
