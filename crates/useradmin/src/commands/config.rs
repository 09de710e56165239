use crate::cli::{ConfigCommands, OutputFormat};
use crate::config::{config_paths, get_local_config_path, Config, InitConfig};
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::PathBuf;

pub fn handle_config(
    action: &ConfigCommands,
    config_path: Option<PathBuf>,
    cli_url: Option<String>,
    cli_token: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let mut config = Config::load(config_path)?;
            config.merge_with_cli(cli_url, cli_token);
            handle_show(&config, format)
        }
        ConfigCommands::Path => handle_path(config_path, format),
    }
}

fn handle_show(config: &Config, format: OutputFormat) -> Result<()> {
    let redacted = config.redacted();
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&redacted)?);
        }
        OutputFormat::Text => {
            let text = toml::to_string_pretty(&redacted)
                .map_err(|e| anyhow!("Failed to render config: {}", e))?;
            print!("{}", text);
            if config.url.is_none() {
                eprintln!(
                    "{}",
                    "No backend URL configured. Run 'useradmin init --url <URL>'.".yellow()
                );
            }
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct ConfigPath {
    path: String,
    exists: bool,
}

fn handle_path(explicit: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let paths: Vec<ConfigPath> = config_paths(explicit.as_deref())
        .into_iter()
        .map(|p| ConfigPath {
            exists: p.exists(),
            path: p.display().to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&paths)?),
        OutputFormat::Text => {
            for p in &paths {
                let marker = if p.exists {
                    "found".green().to_string()
                } else {
                    "missing".dimmed().to_string()
                };
                println!("{} ({})", p.path, marker);
            }
        }
    }
    Ok(())
}

pub fn handle_init(url: &str, token: Option<&str>, format: OutputFormat) -> Result<()> {
    let path = get_local_config_path()
        .ok_or_else(|| anyhow!("Could not determine the current directory"))?;

    let contents = InitConfig { url, token }.to_toml()?;
    std::fs::write(&path, contents)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({ "success": true, "path": path.display().to_string() })
            );
        }
        OutputFormat::Text => {
            println!("{} Wrote {}", "✓".green().bold(), path.display());
            if token.is_some() {
                eprintln!(
                    "{}",
                    "The token is stored in plain text; keep this file out of version control."
                        .yellow()
                );
            }
        }
    }
    Ok(())
}
