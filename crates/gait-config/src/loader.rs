//! Layered loading: a template config updated from a user config.
//!
//! The template defines every section and item the application knows
//! about. The user file only changes values; keys it adds are reported and
//! ignored.

use crate::error::{Error, Result};
use crate::io;
use crate::tree::ConfigTree;
use crate::update::UpdateReport;
use std::path::{Path, PathBuf};

/// File name of the per-user config in the home directory.
pub const USER_CONFIG_FILENAME: &str = ".gaitlab.cfg";

/// Loads a template config and applies the user's overrides on top.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    template: PathBuf,
    user_config_override: Option<PathBuf>,
}

/// A loaded config together with what the user file changed.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub tree: ConfigTree,
    /// `None` when no user file was found.
    pub user_update: Option<UpdateReport>,
}

impl ConfigLoader {
    pub fn new(template: impl Into<PathBuf>) -> Self {
        Self {
            template: template.into(),
            user_config_override: None,
        }
    }

    /// Use a specific user config instead of the one in the home directory.
    pub fn with_user_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.user_config_override = Some(path.into());
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template
    }

    /// The override if set, otherwise `~/.gaitlab.cfg`.
    pub fn user_config_path(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.user_config_override {
            return Some(path.clone());
        }
        dirs::home_dir().map(|home| home.join(USER_CONFIG_FILENAME))
    }

    pub fn has_user_config(&self) -> bool {
        self.user_config_path().is_some_and(|p| p.is_file())
    }

    /// Parse the template, then update it from the user file if one exists.
    pub fn load(&self) -> Result<LoadedConfig> {
        tracing::debug!(template = ?self.template, "Loading config template");
        let mut tree = io::load(&self.template)?;

        let user_update = match self.user_config_path() {
            Some(user_path) if user_path.is_file() => {
                tracing::debug!(?user_path, "Applying user config");
                Some(io::update_from_file(&mut tree, &user_path)?)
            }
            user_path => {
                tracing::debug!(?user_path, "No user config found, skipping");
                None
            }
        };

        Ok(LoadedConfig { tree, user_update })
    }

    /// Write `tree` to the user config file.
    pub fn save_user_config(&self, tree: &ConfigTree) -> Result<PathBuf> {
        let path = self.user_config_path().ok_or_else(|| {
            Error::io(
                USER_CONFIG_FILENAME,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no home directory"),
            )
        })?;
        io::save(tree, &path)?;
        Ok(path)
    }
}
