// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::generator::PipelineState;

/// Failures of a single generate action.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// One or more required-field rules are unmet.
    #[error("validation failed: {}", .0.join(" "))]
    Validation(Vec<String>),

    #[error("template not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("error generating DOCX: {0}")]
    Render(String),

    /// Non-fatal: the document is still available for download.
    #[error("error previewing DOCX: {0}")]
    Preview(String),
}

impl GenerationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GenerationError::Validation(_) => "VALIDATION_ERROR",
            GenerationError::TemplateMissing(_) => "TEMPLATE_NOT_FOUND",
            GenerationError::Render(_) => "RENDER_ERROR",
            GenerationError::Preview(_) => "PREVIEW_ERROR",
        }
    }

    /// State the pipeline stopped in because of this error.
    pub fn state(&self) -> PipelineState {
        match self {
            GenerationError::Validation(_) => PipelineState::Rejected,
            GenerationError::TemplateMissing(_) | GenerationError::Render(_) => {
                PipelineState::RenderFailed
            }
            GenerationError::Preview(_) => PipelineState::PreviewFailed,
        }
    }

    /// Messages suitable for showing to the user, one per line.
    pub fn messages(&self) -> Vec<String> {
        match self {
            GenerationError::Validation(errors) => errors.clone(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_and_codes() {
        let err = GenerationError::Validation(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.messages(), vec!["a", "b"]);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.state(), PipelineState::Rejected);

        let err = GenerationError::TemplateMissing(PathBuf::from("templates/resume_template.docx"));
        assert!(err.to_string().starts_with("template not found"));
        assert_eq!(err.state(), PipelineState::RenderFailed);
    }
}
