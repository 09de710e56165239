use anyhow::{anyhow, Result};
use directories::{BaseDirs, ProjectDirs};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use useradmin_core::DEFAULT_PAGE_SIZE;

pub const LOCAL_CONFIG_FILE_NAME: &str = ".useradmin.toml";

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Backend API root
    pub url: Option<String>,
    /// Bearer token
    pub token: Option<String>,
    /// Rows per page when none is given
    pub page_size: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Default log filter when RUST_LOG and -v are absent
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: None,
            token: None,
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: 30,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        let explicit_path = config_path.as_deref();
        if let Some(path) = explicit_path {
            if !path.exists() {
                return Err(anyhow!("Config file not found: {}", path.display()));
            }
        }

        for path in config_paths(explicit_path) {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // USERADMIN_CONFIG names the file itself, not a key
        figment = figment.merge(Env::prefixed("USERADMIN_").ignore(&["config"]));

        let config: Config = figment
            .extract()
            .map_err(|e| anyhow!("Failed to load config: {}", e))?;

        Ok(config)
    }

    pub fn merge_with_cli(&mut self, cli_url: Option<String>, cli_token: Option<String>) {
        if let Some(url) = cli_url {
            self.url = Some(url);
        }
        if let Some(token) = cli_token {
            self.token = Some(token);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.is_none() {
            return Err(anyhow!(
                "Backend URL not configured. Set via --url, USERADMIN_URL env var, or config file"
            ));
        }
        if self.page_size == 0 {
            return Err(anyhow!("page_size must be greater than zero"));
        }
        Ok(())
    }

    /// Copy safe to print: the token is masked
    pub fn redacted(&self) -> Config {
        Config {
            url: self.url.clone(),
            token: self.token.as_ref().map(|_| "********".to_string()),
            page_size: self.page_size,
            timeout_secs: self.timeout_secs,
            log_level: self.log_level.clone(),
        }
    }
}

/// Config files in merge order (later files override earlier ones)
pub fn config_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(path) = explicit {
        paths.push(path.to_path_buf());
        return paths;
    }

    if let Some(path) = get_project_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_xdg_config_path() {
        push_unique(&mut paths, path);
    }
    if let Some(path) = get_local_config_path() {
        push_unique(&mut paths, path);
    }

    paths
}

fn push_unique(paths: &mut Vec<PathBuf>, path: PathBuf) {
    if !paths.contains(&path) {
        paths.push(path);
    }
}

fn get_project_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "useradmin").map(|d| d.config_dir().join("config.toml"))
}

fn get_xdg_config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(dir).join("useradmin").join("config.toml"));
    }

    BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("useradmin")
            .join("config.toml")
    })
}

pub fn get_local_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|dir| dir.join(LOCAL_CONFIG_FILE_NAME))
}

/// Contents of a freshly initialized local config file
#[derive(Debug, Serialize)]
pub struct InitConfig<'a> {
    pub url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<&'a str>,
}

impl InitConfig<'_> {
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| anyhow!("Failed to serialize config: {}", e))
    }
}
