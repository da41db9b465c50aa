// src/generator.rs
use chrono::{DateTime, Utc};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use crate::core::docx::{DocumentRenderer, DocxTemplateRenderer, DOCX_MIME_TYPE};
use crate::core::normalizer::normalize;
use crate::core::preview::{styled_preview, DocxHtmlConverter, PreviewConverter};
use crate::core::validator::validate;
use crate::error::GenerationError;
use crate::sources::ResumeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Collecting,
    Validating,
    Rejected,
    Rendering,
    Rendered,
    RenderFailed,
    Previewed,
    PreviewFailed,
    Done,
}

/// A rendered document buffer shared by the preview and download paths.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    buffer: Cursor<Vec<u8>>,
    filename: String,
}

impl RenderedDocument {
    pub fn new(bytes: Vec<u8>, filename: String) -> Self {
        Self {
            buffer: Cursor::new(bytes),
            filename,
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn mime_type(&self) -> &'static str {
        DOCX_MIME_TYPE
    }

    pub fn len(&self) -> usize {
        self.buffer.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.get_ref().is_empty()
    }

    pub fn bytes(&self) -> &[u8] {
        self.buffer.get_ref()
    }

    pub fn position(&self) -> u64 {
        self.buffer.position()
    }

    /// The buffer positioned at its start, ready for a sequential reader.
    pub fn reader(&mut self) -> &mut Cursor<Vec<u8>> {
        self.buffer.set_position(0);
        &mut self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer.into_inner()
    }
}

#[derive(Debug)]
pub struct GeneratedResume {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub document: RenderedDocument,
    /// Full preview page, present when the preview step succeeded.
    pub preview_html: Option<String>,
    pub preview_error: Option<GenerationError>,
    pub trail: Vec<PipelineState>,
}

impl GeneratedResume {
    pub fn final_state(&self) -> PipelineState {
        self.trail.last().copied().unwrap_or(PipelineState::Done)
    }

    pub fn reached(&self, state: PipelineState) -> bool {
        self.trail.contains(&state)
    }
}

/// Runs one generate action: validate, normalize, render, preview.
pub struct ResumeGenerator<R = DocxTemplateRenderer, P = DocxHtmlConverter> {
    template_path: PathBuf,
    renderer: R,
    previewer: P,
    preview_enabled: bool,
}

impl ResumeGenerator {
    pub fn new(template_path: PathBuf) -> Self {
        Self::with_collaborators(template_path, DocxTemplateRenderer, DocxHtmlConverter)
    }
}

impl<R: DocumentRenderer, P: PreviewConverter> ResumeGenerator<R, P> {
    pub fn with_collaborators(template_path: PathBuf, renderer: R, previewer: P) -> Self {
        Self {
            template_path,
            renderer,
            previewer,
            preview_enabled: true,
        }
    }

    pub fn with_preview(mut self, enabled: bool) -> Self {
        self.preview_enabled = enabled;
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Validation only, without rendering anything.
    pub fn check(&self, source: &dyn ResumeSource) -> Vec<String> {
        validate(&source.record())
    }

    pub fn generate(&self, source: &dyn ResumeSource) -> Result<GeneratedResume, GenerationError> {
        let id = Uuid::new_v4();
        let span = info_span!("resume_generation", id = %id, source = source.name());
        let _enter = span.enter();

        let mut trail = vec![PipelineState::Collecting];
        let record = source.record();

        trail.push(PipelineState::Validating);
        let errors = validate(&record);
        if !errors.is_empty() {
            info!("Generation rejected with {} validation error(s)", errors.len());
            return Err(GenerationError::Validation(errors));
        }

        trail.push(PipelineState::Rendering);
        let record = normalize(record);
        debug!(
            "Normalized record: {} education, {} experience, {} project entries",
            record.educations.len(),
            record.experiences.len(),
            record.projects.len()
        );

        if !self.template_path.exists() {
            error!("Template not found: {}", self.template_path.display());
            return Err(GenerationError::TemplateMissing(self.template_path.clone()));
        }

        let bytes = self
            .renderer
            .render(&self.template_path, &record)
            .map_err(|e| {
                error!("Rendering failed: {:#}", e);
                GenerationError::Render(format!("{:#}", e))
            })?;

        let mut document = RenderedDocument::new(bytes, record.download_filename());
        trail.push(PipelineState::Rendered);
        info!(
            "Rendered {} ({} bytes)",
            document.filename(),
            document.len()
        );

        let mut preview_html = None;
        let mut preview_error = None;
        if self.preview_enabled {
            match self.previewer.convert(document.reader()) {
                Ok(body) => {
                    preview_html = Some(styled_preview(&body));
                    trail.push(PipelineState::Previewed);
                }
                Err(e) => {
                    warn!("Preview failed, document still available: {:#}", e);
                    preview_error = Some(GenerationError::Preview(format!("{:#}", e)));
                    trail.push(PipelineState::PreviewFailed);
                }
            }
            // Download consumers read from the start again
            document.reader();
        }

        trail.push(PipelineState::Done);

        Ok(GeneratedResume {
            id,
            generated_at: Utc::now(),
            document,
            preview_html,
            preview_error,
            trail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::docx::DocxPackage;
    use crate::core::validator::EMAIL_INVALID;
    use crate::sources::{FormSource, SampleSource};
    use crate::types::{FormInput, ResumeRecord, SectionCounts};
    use anyhow::Result;
    use std::io::Read;

    struct FailingPreview;

    impl PreviewConverter for FailingPreview {
        fn convert(&self, _document: &mut Cursor<Vec<u8>>) -> Result<String> {
            anyhow::bail!("converter crashed")
        }
    }

    /// Reads part of the buffer and leaves the cursor there.
    struct PartialReader;

    impl PreviewConverter for PartialReader {
        fn convert(&self, document: &mut Cursor<Vec<u8>>) -> Result<String> {
            let mut head = [0u8; 4];
            document.read_exact(&mut head)?;
            Ok(String::from("<p>partial</p>"))
        }
    }

    struct FailingRenderer;

    impl DocumentRenderer for FailingRenderer {
        fn render(&self, _template: &Path, _record: &ResumeRecord) -> Result<Vec<u8>> {
            anyhow::bail!("bad field reference")
        }
    }

    fn jane_form(email: &str) -> FormSource {
        FormSource::new(
            FormInput::new(SectionCounts::new(1, 0, 1))
                .with_field("first_name", "Jane")
                .with_field("last_name", "Doe")
                .with_field("email", email)
                .with_field("degree_0", "BSc Computer Science")
                .with_field("school_0", "State University")
                .with_field("proj_title_0", "Resume Builder")
                .with_field("proj_summary_0", "Generates resumes"),
        )
    }

    fn template_dir() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume_template.docx");
        std::fs::write(&path, DocxPackage::starter_template().to_bytes().unwrap()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_valid_input_reaches_done_with_preview() {
        let (_dir, template) = template_dir();
        let generated = ResumeGenerator::new(template)
            .generate(&jane_form("jane.doe@example.com"))
            .unwrap();

        assert_eq!(
            generated.trail,
            vec![
                PipelineState::Collecting,
                PipelineState::Validating,
                PipelineState::Rendering,
                PipelineState::Rendered,
                PipelineState::Previewed,
                PipelineState::Done,
            ]
        );
        assert_eq!(generated.document.filename(), "Jane_Doe_Resume.docx");
        assert_eq!(generated.document.mime_type(), DOCX_MIME_TYPE);
        let preview = generated.preview_html.unwrap();
        assert!(preview.contains("<h1>Jane Doe</h1>"));
        assert!(preview.contains("font-family: Calibri"));
    }

    #[test]
    fn test_email_without_at_is_rejected() {
        let (_dir, template) = template_dir();
        let err = ResumeGenerator::new(template)
            .generate(&jane_form("janedoe.example.com"))
            .unwrap_err();

        assert_eq!(err.state(), PipelineState::Rejected);
        assert_eq!(err.messages(), vec![EMAIL_INVALID]);
    }

    #[test]
    fn test_missing_template_halts_rendering() {
        let dir = tempfile::tempdir().unwrap();
        let err = ResumeGenerator::new(dir.path().join("resume_template.docx"))
            .generate(&jane_form("jane.doe@example.com"))
            .unwrap_err();

        assert!(matches!(err, GenerationError::TemplateMissing(_)));
        assert_eq!(err.state(), PipelineState::RenderFailed);
        assert!(err.to_string().contains("template not found"));
    }

    #[test]
    fn test_renderer_failure_carries_message() {
        let (_dir, template) = template_dir();
        let err = ResumeGenerator::with_collaborators(template, FailingRenderer, DocxHtmlConverter)
            .generate(&SampleSource)
            .unwrap_err();

        assert_eq!(err.error_code(), "RENDER_ERROR");
        assert!(err.to_string().contains("bad field reference"));
    }

    #[test]
    fn test_preview_failure_keeps_document() {
        let (_dir, template) = template_dir();
        let mut generated =
            ResumeGenerator::with_collaborators(template, DocxTemplateRenderer, FailingPreview)
                .generate(&SampleSource)
                .unwrap();

        assert!(generated.reached(PipelineState::PreviewFailed));
        assert!(!generated.reached(PipelineState::Previewed));
        assert_eq!(generated.final_state(), PipelineState::Done);
        assert!(generated.preview_html.is_none());
        assert!(matches!(
            generated.preview_error,
            Some(GenerationError::Preview(_))
        ));

        let mut bytes = Vec::new();
        generated.document.reader().read_to_end(&mut bytes).unwrap();
        assert!(DocxPackage::from_bytes(&bytes).is_ok());
    }

    #[test]
    fn test_buffer_rewound_after_preview() {
        let (_dir, template) = template_dir();
        let generated =
            ResumeGenerator::with_collaborators(template, DocxTemplateRenderer, PartialReader)
                .generate(&SampleSource)
                .unwrap();

        assert!(generated.reached(PipelineState::Previewed));
        assert_eq!(generated.document.position(), 0);
        assert_eq!(generated.document.bytes()[..2], *b"PK");
    }

    #[test]
    fn test_preview_can_be_disabled() {
        let (_dir, template) = template_dir();
        let generated = ResumeGenerator::new(template)
            .with_preview(false)
            .generate(&SampleSource)
            .unwrap();

        assert_eq!(
            generated.trail[3..],
            [PipelineState::Rendered, PipelineState::Done]
        );
        assert!(generated.preview_html.is_none());
    }

    #[test]
    fn test_sample_and_form_share_the_pipeline() {
        let (_dir, template) = template_dir();
        let generator = ResumeGenerator::new(template);
        let sample = generator.generate(&SampleSource).unwrap();
        let preview = sample.preview_html.unwrap();
        assert!(preview.contains("https://github.com/janedoe"));
        assert!(preview.contains("Acme Corp"));
    }
}
