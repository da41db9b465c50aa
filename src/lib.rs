//! Resume builder: assembles form input into a resume record, validates it,
//! and renders it through a DOCX template with an HTML preview.

pub mod core;
pub mod error;
pub mod generator;
pub mod sources;
pub mod types;
pub mod utils;
pub mod web;

pub use crate::core::{ConfigManager, DocumentRenderer, PreviewConverter};
pub use error::GenerationError;
pub use generator::{GeneratedResume, PipelineState, RenderedDocument, ResumeGenerator};
pub use sources::{FormSource, ResumeSource, SampleSource};
pub use types::{FormInput, ResumeRecord};
pub use web::start_web_server;
