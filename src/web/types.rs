// src/web/types.rs
use rocket::http::{ContentType, Status};
use rocket::response::status::Custom;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::serde::Serialize;
use rocket::{Request, Response};
use std::path::PathBuf;
use std::sync::Arc;

use crate::core::{DocxHtmlConverter, DocxTemplateRenderer, PreviewConverter, SharedPreview};
use crate::error::GenerationError;
use crate::generator::ResumeGenerator;

#[derive(Clone)]
pub struct ServerConfig {
    pub template_path: PathBuf,
    pub previewer: SharedPreview,
}

impl ServerConfig {
    pub fn new(template_path: PathBuf) -> Self {
        Self {
            template_path,
            previewer: Arc::new(DocxHtmlConverter),
        }
    }

    pub fn with_previewer<P>(mut self, previewer: P) -> Self
    where
        P: PreviewConverter + Send + Sync + 'static,
    {
        self.previewer = Arc::new(previewer);
        self
    }

    /// A generator for one request, owning everything it needs.
    pub fn generator(&self) -> ResumeGenerator<DocxTemplateRenderer, SharedPreview> {
        ResumeGenerator::with_collaborators(
            self.template_path.clone(),
            DocxTemplateRenderer,
            Arc::clone(&self.previewer),
        )
    }
}

/// A generated DOCX offered as a download.
pub struct DocxResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl DocxResponse {
    pub fn new(data: Vec<u8>, filename: String) -> Self {
        Self { data, filename }
    }
}

impl<'r> Responder<'r, 'static> for DocxResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::new(
                "application",
                "vnd.openxmlformats-officedocument.wordprocessingml.document",
            ))
            .raw_header("Content-Disposition", content_disposition(&self.filename))
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

/// Attachment header with an ASCII fallback name and the exact UTF-8 name
/// as an RFC 5987 `filename*` parameter.
pub fn content_disposition(filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            c if c.is_ascii_graphic() && c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(filename)
    )
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Error,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ValidationData {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Preview result. The document travels along as base64 so it stays
/// available when the HTML conversion fails.
#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct PreviewData {
    pub id: String,
    pub filename: String,
    pub mime_type: String,
    pub document: String,
    pub preview_html: Option<String>,
    pub warning: Option<String>,
}

pub type ApiError = Custom<Json<StandardErrorResponse>>;

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: String, suggestions: Vec<String>) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code,
            details: Vec::new(),
            suggestions,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

impl From<GenerationError> for ApiError {
    fn from(err: GenerationError) -> Self {
        let (status, suggestions) = match &err {
            GenerationError::Validation(_) => (
                Status::UnprocessableEntity,
                vec!["Fill in the fields listed in details and try again".to_string()],
            ),
            GenerationError::TemplateMissing(_) => (
                Status::InternalServerError,
                vec!["Run `resume-builder init-template` on the server".to_string()],
            ),
            GenerationError::Render(_) => (
                Status::InternalServerError,
                vec!["Check the placeholders used in the template".to_string()],
            ),
            GenerationError::Preview(_) => (
                Status::InternalServerError,
                vec!["Download the document from /api/generate instead".to_string()],
            ),
        };

        let error = match &err {
            GenerationError::Validation(_) => "Resume data is incomplete".to_string(),
            other => other.to_string(),
        };
        let details = match &err {
            GenerationError::Validation(messages) => messages.clone(),
            _ => Vec::new(),
        };

        Custom(
            status,
            Json(
                StandardErrorResponse::new(error, err.error_code().to_string(), suggestions)
                    .with_details(details),
            ),
        )
    }
}
