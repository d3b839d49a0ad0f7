use crate::utils::env_paths::{api_port, get_environment, EnvPaths};
use anyhow::{Context, Result};
use api::ApiConfig;
use colored::*;
use serde::Serialize;
use user::SessionConfig;

/// Configuration the server would start with, resolved from the environment
#[derive(Debug, Serialize)]
struct EffectiveConfig {
    environment: String,
    data_path: String,
    database_path: String,
    logs_path: String,
    port: u16,
    init_test_data: bool,
    dev_login: bool,
    session: SessionConfig,
}

impl EffectiveConfig {
    fn resolve() -> Result<Self> {
        let env_paths = EnvPaths::load()?;
        let api = ApiConfig::default();
        let session = SessionConfig::from_env().context("Invalid session configuration")?;

        Ok(Self {
            environment: get_environment(),
            data_path: env_paths.data_path.display().to_string(),
            database_path: env_paths.database_path().display().to_string(),
            logs_path: env_paths.logs_path().display().to_string(),
            port: api_port()?,
            init_test_data: api.init_test_data,
            dev_login: api.dev_login,
            session,
        })
    }
}

/// Print the effective configuration
pub async fn execute(format: String) -> Result<()> {
    let config = EffectiveConfig::resolve()?;

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        "yaml" => {
            println!("{}", serde_yaml::to_string(&config)?);
        }
        _ => {
            print_config_text(&config)?;
        }
    }

    Ok(())
}

fn print_config_text(config: &EffectiveConfig) -> Result<()> {
    println!("{}", "=== Board Configuration ===".bold());
    println!();

    let value = serde_json::to_value(config)?;
    if let Some(entries) = value.as_object() {
        for (key, value) in entries {
            match value.as_object() {
                Some(section) => {
                    println!("{}:", key.cyan().bold());
                    for (inner_key, inner_value) in section {
                        println!("  {}: {}", inner_key.cyan(), format_value(inner_value));
                    }
                }
                None => println!("{}: {}", key.cyan().bold(), format_value(value)),
            }
        }
    }

    Ok(())
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
