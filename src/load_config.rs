use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::{Config, RepositoryConfig, TransfersConfig};

#[derive(Deserialize)]
struct StaticConfig {
    repository: RepositorySection,
    #[serde(default)]
    transfers: TransfersConfig,
}

#[derive(Deserialize)]
struct RepositorySection {
    base_url: String,
}

/// Loads a static YAML config file (no secrets) and injects the auth token
/// from the environment. Returns a fully merged [`Config`] or an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path_ref = path.as_ref();
    info!(config_path = ?path_ref, "Loading configuration from file");

    let config_content = match fs::read_to_string(path_ref) {
        Ok(content) => {
            info!(config_path = ?path_ref, "Config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to read config file");
            return Err(anyhow::anyhow!(
                "Failed to read config file {:?}: {}",
                path_ref,
                e
            ));
        }
    };

    let static_conf: StaticConfig = match serde_yaml::from_str(&config_content) {
        Ok(conf) => {
            info!(config_path = ?path_ref, "Parsed config YAML successfully");
            conf
        }
        Err(e) => {
            error!(error = ?e, config_path = ?path_ref, "Failed to parse config YAML");
            return Err(anyhow::anyhow!("Failed to parse config YAML: {e}"));
        }
    };

    if static_conf.repository.base_url.trim().is_empty() {
        error!("repository.base_url is empty in config");
        anyhow::bail!("repository.base_url must not be empty");
    }

    // Secret never lives in the file; absent token means anonymous access.
    let auth_token = match std::env::var("REPO_AUTH_TOKEN") {
        Ok(token) if !token.is_empty() => {
            info!("REPO_AUTH_TOKEN found in env");
            Some(token)
        }
        _ => {
            info!("REPO_AUTH_TOKEN not set, proceeding without authentication");
            None
        }
    };

    let config = Config {
        repository: RepositoryConfig {
            base_url: static_conf.repository.base_url,
            auth_token,
        },
        transfers: static_conf.transfers,
    };

    config.trace_loaded();
    Ok(config)
}
