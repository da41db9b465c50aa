// src/core/config_manager.rs
//! Configuration for the template and output locations

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::FsOps;

/// Fixed name of the document template inside the templates directory.
pub const TEMPLATE_FILE_NAME: &str = "resume_template.docx";

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment_name: String,
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub templates_path: PathBuf,
    pub output_path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: EnvironmentConfig,
    production: EnvironmentConfig,
}

impl ConfigManager {
    /// Load configuration from `config.yaml` in the current directory, or
    /// fall back to the default layout when there is none.
    pub fn load() -> Result<Self> {
        let base_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::load_from(&base_dir)
    }

    pub fn load_from(base_dir: &Path) -> Result<Self> {
        let environment_name = Self::get_environment();
        info!("Loading configuration for environment: {}", environment_name);

        let config_path = base_dir.join("config.yaml");
        let environment = if config_path.exists() {
            Self::load_from_file(&config_path, &environment_name, base_dir)?
        } else {
            Self::default_environment(&environment_name, base_dir)
        };

        Ok(Self {
            environment_name,
            environment,
        })
    }

    fn get_environment() -> String {
        std::env::var("RESUME_BUILDER_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn default_environment(environment: &str, base_dir: &Path) -> EnvironmentConfig {
        let base_dir = if environment == "production" {
            PathBuf::from("/app")
        } else {
            base_dir.to_path_buf()
        };

        EnvironmentConfig {
            templates_path: base_dir.join("templates"),
            output_path: base_dir.join("out"),
        }
    }

    fn load_from_file(
        config_path: &Path,
        environment: &str,
        base_dir: &Path,
    ) -> Result<EnvironmentConfig> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        let config_file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        let env_config = match environment {
            "production" => config_file.production,
            _ => config_file.local,
        };

        Ok(EnvironmentConfig {
            templates_path: FsOps::normalize_path(base_dir, &env_config.templates_path),
            output_path: FsOps::normalize_path(base_dir, &env_config.output_path),
        })
    }

    pub fn with_templates_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.environment.templates_path = path;
        }
        self
    }

    pub fn with_output_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.environment.output_path = path;
        }
        self
    }

    pub fn template_file(&self) -> PathBuf {
        self.environment.templates_path.join(TEMPLATE_FILE_NAME)
    }

    /// Ensure all required directories exist
    pub async fn ensure_directories(&self) -> Result<()> {
        FsOps::ensure_dir_exists(&self.environment.templates_path).await?;
        FsOps::ensure_dir_exists(&self.environment.output_path).await?;
        Ok(())
    }
}
