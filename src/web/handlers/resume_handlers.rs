// src/web/handlers/resume_handlers.rs
//! Generate, preview and validate handlers

use base64::Engine;
use rocket::http::Status;
use rocket::response::status::Custom;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

use crate::generator::GeneratedResume;
use crate::sources::{FormSource, ResumeSource, SampleSource};
use crate::types::FormInput;
use crate::web::types::{
    ApiError, DataResponse, DocxResponse, PreviewData, ServerConfig, StandardErrorResponse,
    ValidationData,
};

/// Runs the pipeline on the blocking pool; template I/O and zip work stay off
/// the async workers.
async fn run_pipeline<S>(
    source: S,
    config: &ServerConfig,
    preview: bool,
) -> Result<GeneratedResume, ApiError>
where
    S: ResumeSource + Send + 'static,
{
    let generator = config.generator().with_preview(preview);

    let outcome = tokio::task::spawn_blocking(move || generator.generate(&source))
        .await
        .map_err(|e| {
            error!("Generation task failed: {}", e);
            Custom(
                Status::InternalServerError,
                Json(StandardErrorResponse::new(
                    "Generation task failed".to_string(),
                    "INTERNAL_ERROR".to_string(),
                    vec!["Try again in a few moments".to_string()],
                )),
            )
        })?;

    Ok(outcome?)
}

async fn download<S>(source: S, config: &ServerConfig) -> Result<DocxResponse, ApiError>
where
    S: ResumeSource + Send + 'static,
{
    let generated = run_pipeline(source, config, false).await?;

    info!(
        "Serving {} ({} bytes, id {})",
        generated.document.filename(),
        generated.document.len(),
        generated.id
    );

    let filename = generated.document.filename().to_string();
    Ok(DocxResponse::new(generated.document.into_bytes(), filename))
}

pub async fn generate_resume_handler(
    input: Json<FormInput>,
    config: &State<ServerConfig>,
) -> Result<DocxResponse, ApiError> {
    download(FormSource::new(input.into_inner()), config).await
}

pub async fn sample_resume_handler(config: &State<ServerConfig>) -> Result<DocxResponse, ApiError> {
    download(SampleSource, config).await
}

pub async fn preview_resume_handler(
    input: Json<FormInput>,
    config: &State<ServerConfig>,
) -> Result<Json<DataResponse<PreviewData>>, ApiError> {
    let generated = run_pipeline(FormSource::new(input.into_inner()), config, true).await?;

    let warning = generated.preview_error.as_ref().map(|err| {
        warn!("Preview unavailable for {}: {}", generated.id, err);
        err.to_string()
    });
    let message = if warning.is_some() {
        "Document generated, preview unavailable".to_string()
    } else {
        "Preview ready".to_string()
    };

    let data = PreviewData {
        id: generated.id.to_string(),
        filename: generated.document.filename().to_string(),
        mime_type: generated.document.mime_type().to_string(),
        document: base64::engine::general_purpose::STANDARD.encode(generated.document.bytes()),
        preview_html: generated.preview_html,
        warning,
    };

    Ok(Json(DataResponse::success(message, data)))
}

pub async fn validate_resume_handler(
    input: Json<FormInput>,
    config: &State<ServerConfig>,
) -> Json<DataResponse<ValidationData>> {
    let errors = config
        .generator()
        .check(&FormSource::new(input.into_inner()));

    let message = if errors.is_empty() {
        "Resume data is complete".to_string()
    } else {
        format!("{} field rule(s) failed", errors.len())
    };

    Json(DataResponse::success(
        message,
        ValidationData {
            valid: errors.is_empty(),
            errors,
        },
    ))
}
