use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::vocabulary::{SITE_LIBRARY_RELATIVE_PATH, TRANSFERS_ROOT_NAME};

/// Fully merged runtime configuration: static settings from the config file
/// plus secrets injected from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub repository: RepositoryConfig,
    #[serde(default)]
    pub transfers: TransfersConfig,
}

impl Config {
    pub fn trace_loaded(&self) {
        info!(
            base_url = %self.repository.base_url,
            site_library_path = %self.transfers.site_library_path,
            root_folder_name = %self.transfers.root_folder_name,
            "Loaded Config"
        );
        debug!(
            has_auth_token = self.repository.auth_token.is_some(),
            "Config auth state"
        );
    }
}

/// Where the content repository lives and how to authenticate against it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    /// Base URL of the repository's node API, e.g.
    /// `https://host/api/-default-/public/alfresco/versions/1`.
    pub base_url: String,
    /// Bearer token; comes from the environment, never from the file.
    #[serde(skip)]
    pub auth_token: Option<String>,
}

/// Where transfer containers live inside the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransfersConfig {
    /// Relative path from the repository root to the site document library.
    #[serde(default = "default_site_library_path")]
    pub site_library_path: String,
    /// Name of the folder under the library that holds all transfers.
    #[serde(default = "default_root_folder_name")]
    pub root_folder_name: String,
}

impl Default for TransfersConfig {
    fn default() -> Self {
        TransfersConfig {
            site_library_path: default_site_library_path(),
            root_folder_name: default_root_folder_name(),
        }
    }
}

fn default_site_library_path() -> String {
    SITE_LIBRARY_RELATIVE_PATH.to_string()
}

fn default_root_folder_name() -> String {
    TRANSFERS_ROOT_NAME.to_string()
}
