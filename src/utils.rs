// src/utils.rs
use anyhow::{Context, Result};
use std::path::Path;

use crate::core::FsOps;
use crate::types::FormInput;

pub const FORM_INPUT_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    FsOps::get_extension(Path::new(filename))
}

/// Validate file extension against allowed types
pub fn validate_file_extension(filename: &str, allowed: &[&str]) -> Result<String> {
    let ext = get_file_extension(filename)
        .ok_or_else(|| anyhow::anyhow!("File has no extension: {}", filename))?;

    if !allowed.contains(&ext.as_str()) {
        anyhow::bail!(
            "Unsupported file extension: {}. Allowed: {:?}",
            ext,
            allowed
        );
    }

    Ok(ext)
}

/// Parse form input in the format named by `ext`.
pub fn parse_form_input(content: &str, ext: &str) -> Result<FormInput> {
    match ext {
        "toml" => toml::from_str(content).context("Failed to parse TOML form input"),
        "yaml" | "yml" => serde_yaml::from_str(content).context("Failed to parse YAML form input"),
        "json" => serde_json::from_str(content).context("Failed to parse JSON form input"),
        other => anyhow::bail!("Unsupported form input format: {}", other),
    }
}

/// Read a form input file, picking the parser from its extension.
pub async fn load_form_input(path: &Path) -> Result<FormInput> {
    let ext = validate_file_extension(&path.to_string_lossy(), FORM_INPUT_EXTENSIONS)?;
    let content = FsOps::read_file_safe(path).await?;
    parse_form_input(&content, &ext)
        .with_context(|| format!("Invalid form input: {}", path.display()))
}
