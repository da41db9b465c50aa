// src/core/docx.rs
//! DOCX package handling and the template-backed document renderer

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core::ooxml;
use crate::core::template_engine::TemplateEngine;
use crate::types::ResumeRecord;

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DOCUMENT_PART: &str = "word/document.xml";
pub const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";

// ===== Renderer Seam =====

/// Merges a resume record into a document template.
pub trait DocumentRenderer {
    fn render(&self, template_path: &Path, record: &ResumeRecord) -> Result<Vec<u8>>;
}

// ===== DOCX Package =====

/// In-memory view of a DOCX (zip) package, parts kept in archive order.
#[derive(Debug, Clone, Default)]
pub struct DocxPackage {
    parts: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader).context("Not a valid DOCX (zip) package")?;
        let mut parts = Vec::with_capacity(archive.len());

        for i in 0..archive.len() {
            let mut file = archive
                .by_index(i)
                .with_context(|| format!("Failed to read package entry {}", i))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)
                .with_context(|| format!("Failed to read package part: {}", name))?;
            parts.push((name, content));
        }

        Ok(Self { parts })
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open template: {}", path.display()))?;
        Self::from_reader(file)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|(name, _)| name.as_str())
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.parts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, content)| content.as_slice())
    }

    pub fn part_text(&self, name: &str) -> Result<&str> {
        let bytes = self
            .part(name)
            .ok_or_else(|| anyhow::anyhow!("Package part missing: {}", name))?;
        std::str::from_utf8(bytes).with_context(|| format!("Part is not UTF-8: {}", name))
    }

    /// Replace a part, or append it when the package does not have it yet.
    pub fn set_part(&mut self, name: &str, content: Vec<u8>) {
        match self.parts.iter_mut().find(|(n, _)| n == name) {
            Some((_, existing)) => *existing = content,
            None => self.parts.push((name.to_string(), content)),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, content) in &self.parts {
            writer
                .start_file(name.as_str(), options)
                .with_context(|| format!("Failed to add package part: {}", name))?;
            writer
                .write_all(content)
                .with_context(|| format!("Failed to write package part: {}", name))?;
        }

        let cursor = writer.finish().context("Failed to finalize DOCX package")?;
        Ok(cursor.into_inner())
    }

    /// Parts that carry document text: the main body plus headers and footers.
    fn text_part_names(&self) -> Vec<String> {
        self.part_names()
            .filter(|name| {
                *name == DOCUMENT_PART
                    || (name.starts_with("word/header") && name.ends_with(".xml"))
                    || (name.starts_with("word/footer") && name.ends_with(".xml"))
            })
            .map(str::to_string)
            .collect()
    }
}

// ===== Template Renderer =====

/// Fills `{{...}}` placeholders in the text parts of a DOCX template.
///
/// A paragraph whose whole text is a section tag (`{{#educations}}`,
/// `{{/educations}}`) is replaced by the bare tag, so loops repeat the
/// paragraphs between the tags without leaving empty lines behind.
/// Placeholders that Word split over several runs are joined back first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxTemplateRenderer;

impl DocxTemplateRenderer {
    pub fn render_package(&self, package: &mut DocxPackage, record: &ResumeRecord) -> Result<()> {
        let context = record.template_context();

        for name in package.text_part_names() {
            let xml = package.part_text(&name)?;
            let prepared = collapse_section_paragraphs(&join_split_placeholders(xml));
            let rendered = TemplateEngine::render_with(&prepared, &context, ooxml::escape)
                .with_context(|| format!("Failed to fill template part {}", name))?;
            debug!("Rendered template part {} ({} bytes)", name, rendered.len());
            package.set_part(&name, rendered.into_bytes());
        }

        Ok(())
    }
}

impl DocumentRenderer for DocxTemplateRenderer {
    fn render(&self, template_path: &Path, record: &ResumeRecord) -> Result<Vec<u8>> {
        let mut package = DocxPackage::open(template_path)?;

        if package.part(DOCUMENT_PART).is_none() {
            anyhow::bail!(
                "Template {} has no {} part",
                template_path.display(),
                DOCUMENT_PART
            );
        }

        self.render_package(&mut package, record)?;
        let bytes = package.to_bytes()?;

        info!(
            "Rendered DOCX from {} ({} bytes)",
            template_path.display(),
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Drops the markup Word leaves inside `{{...}}` when a placeholder spans
/// several runs (spell-check marks, revisions, formatting changes).
fn join_split_placeholders(xml: &str) -> String {
    let joined = join_split_braces(xml);
    let mut out = String::with_capacity(joined.len());
    let mut pos = 0;

    while let Some(open) = joined[pos..].find("{{").map(|i| pos + i) {
        let body_start = open + 2;
        let Some(close) = joined[body_start..].find("}}").map(|i| body_start + i) else {
            break;
        };
        let body = &joined[body_start..close];
        out.push_str(&joined[pos..body_start]);
        if body.contains("{{") || body.contains("</w:p>") {
            // Stray braces, leave them to the template engine
            pos = body_start;
            continue;
        }
        out.push_str(&strip_tags(body));
        pos = close;
    }

    out.push_str(&joined[pos..]);
    out
}

/// `{</w:t></w:r><w:r><w:t>{` becomes `{{`, likewise for closing braces.
fn join_split_braces(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;

    while let Some(offset) = xml[pos..].find(['{', '}']) {
        let brace_at = pos + offset;
        let brace = &xml[brace_at..brace_at + 1];
        out.push_str(&xml[pos..brace_at + 1]);
        pos = brace_at + 1;

        let mut after_tags = pos;
        while xml[after_tags..].starts_with('<') {
            match xml[after_tags..].find('>') {
                Some(end) => after_tags += end + 1,
                None => break,
            }
        }
        if after_tags > pos && xml[after_tags..].starts_with(brace) {
            pos = after_tags;
        }
    }

    out.push_str(&xml[pos..]);
    out
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::with_capacity(fragment.len());
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

fn is_section_tag(text: &str) -> bool {
    let text = text.trim();
    text.starts_with("{{")
        && text.ends_with("}}")
        && text[2..].trim_start().starts_with(['#', '^', '/'])
        && text[2..].find("{{").is_none()
}

fn collapse_section_paragraphs(xml: &str) -> String {
    let mut out = String::with_capacity(xml.len());
    let mut pos = 0;

    while let Some(paragraph) = ooxml::next_element(xml, "w:p", pos) {
        out.push_str(&xml[pos..paragraph.outer.start]);
        let text = ooxml::plain_text(paragraph.inner);
        if is_section_tag(&text) {
            out.push_str(text.trim());
        } else {
            out.push_str(&xml[paragraph.outer.clone()]);
        }
        pos = paragraph.outer.end;
    }

    out.push_str(&xml[pos..]);
    out
}

// ===== Starter Template =====

const CONTENT_TYPES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri"/><w:sz w:val="22"/></w:rPr></w:rPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:spacing w:after="80"/></w:pPr></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="48"/></w:rPr></w:style><w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/><w:basedOn w:val="Normal"/><w:pPr><w:spacing w:before="240"/></w:pPr><w:rPr><w:b/><w:color w:val="1F4E79"/><w:sz w:val="28"/></w:rPr></w:style></w:styles>"#;

fn starter_paragraph(style: Option<&str>, text: &str, bold: bool) -> String {
    let p_pr = style
        .map(|s| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, s))
        .unwrap_or_default();
    let r_pr = if bold { "<w:rPr><w:b/></w:rPr>" } else { "" };
    format!(
        r#"<w:p>{}<w:r>{}<w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        p_pr,
        r_pr,
        ooxml::escape(text)
    )
}

fn starter_document_xml() -> String {
    let body = [
        starter_paragraph(Some("Title"), "{{first_name}} {{last_name}}", false),
        starter_paragraph(
            None,
            "{{email}} | {{phone_number}} | {{linkedin}} | {{github}}",
            false,
        ),
        starter_paragraph(Some("Heading1"), "Professional Summary", false),
        starter_paragraph(None, "{{summary}}", false),
        starter_paragraph(Some("Heading1"), "Education", false),
        starter_paragraph(None, "{{#educations}}", false),
        starter_paragraph(None, "{{degree}}, {{school}} ({{year}})", true),
        starter_paragraph(None, "Score: {{score}}", false),
        starter_paragraph(None, "{{/educations}}", false),
        starter_paragraph(Some("Heading1"), "Experience", false),
        starter_paragraph(None, "{{#experiences}}", false),
        starter_paragraph(None, "{{role}} at {{company}} ({{duration}})", true),
        starter_paragraph(None, "{{desc}}", false),
        starter_paragraph(None, "{{/experiences}}", false),
        starter_paragraph(Some("Heading1"), "Projects", false),
        starter_paragraph(None, "{{#projects}}", false),
        starter_paragraph(None, "{{title}} ({{stack}})", true),
        starter_paragraph(None, "{{summary}}", false),
        starter_paragraph(None, "{{/projects}}", false),
        starter_paragraph(Some("Heading1"), "Skills", false),
        starter_paragraph(
            None,
            "Programming Languages: {{skills.programming_languages}}",
            false,
        ),
        starter_paragraph(None, "Frameworks & Libraries: {{skills.frameworks}}", false),
        starter_paragraph(None, "Databases: {{skills.databases}}", false),
        starter_paragraph(
            None,
            "Other Tools & Technologies: {{skills.other_tools}}",
            false,
        ),
    ]
    .concat();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><w:body>{}<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1080" w:right="1080" w:bottom="1080" w:left="1080" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#,
        body
    )
}

impl DocxPackage {
    /// A working resume template covering every field of the record.
    pub fn starter_template() -> Self {
        let mut package = DocxPackage::default();
        package.set_part("[Content_Types].xml", CONTENT_TYPES_XML.as_bytes().to_vec());
        package.set_part("_rels/.rels", PACKAGE_RELS_XML.as_bytes().to_vec());
        package.set_part(DOCUMENT_PART, starter_document_xml().into_bytes());
        package.set_part(DOCUMENT_RELS_PART, DOCUMENT_RELS_XML.as_bytes().to_vec());
        package.set_part("word/styles.xml", STYLES_XML.as_bytes().to_vec());
        package
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EducationEntry, PersonalInfo, ProjectEntry};

    fn record() -> ResumeRecord {
        ResumeRecord {
            personal: PersonalInfo {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                email: "jane.doe@example.com".to_string(),
                ..Default::default()
            },
            summary: "R&D engineer".to_string(),
            educations: vec![
                EducationEntry {
                    degree: "BSc".to_string(),
                    school: "State University".to_string(),
                    year: "2018".to_string(),
                    score: "3.9".to_string(),
                },
                EducationEntry {
                    degree: "MSc".to_string(),
                    school: "Tech Institute".to_string(),
                    year: "2020".to_string(),
                    score: String::new(),
                },
            ],
            projects: vec![ProjectEntry {
                title: "Compiler".to_string(),
                stack: "Rust".to_string(),
                summary: "Toy compiler".to_string(),
            }],
            ..Default::default()
        }
    }

    fn rendered_text(bytes: &[u8]) -> String {
        let package = DocxPackage::from_bytes(bytes).unwrap();
        ooxml::plain_text(package.part_text(DOCUMENT_PART).unwrap())
    }

    #[test]
    fn test_starter_template_roundtrips_through_zip() {
        let bytes = DocxPackage::starter_template().to_bytes().unwrap();
        let package = DocxPackage::from_bytes(&bytes).unwrap();
        let names: Vec<_> = package.part_names().collect();
        assert_eq!(names[0], "[Content_Types].xml");
        assert!(names.contains(&DOCUMENT_PART));
    }

    #[test]
    fn test_render_fills_fields_and_repeats_sections() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("resume_template.docx");
        std::fs::write(&template, DocxPackage::starter_template().to_bytes().unwrap()).unwrap();

        let bytes = DocxTemplateRenderer.render(&template, &record()).unwrap();
        let text = rendered_text(&bytes);

        assert!(text.starts_with("Jane Doe"));
        assert!(text.contains("R&D engineer"));
        assert!(text.contains("BSc, State University (2018)"));
        assert!(text.contains("MSc, Tech Institute (2020)"));
        assert!(text.contains("Compiler (Rust)Toy compiler"));
        assert!(!text.contains("{{"));

        let xml = DocxPackage::from_bytes(&bytes)
            .unwrap()
            .part_text(DOCUMENT_PART)
            .unwrap()
            .to_string();
        assert!(xml.contains("R&amp;D engineer"));
    }

    #[test]
    fn test_unknown_placeholder_fails() {
        let mut package = DocxPackage::starter_template();
        package.set_part(
            DOCUMENT_PART,
            r#"<w:document><w:body><w:p><w:r><w:t>{{nickname}}</w:t></w:r></w:p></w:body></w:document>"#
                .as_bytes()
                .to_vec(),
        );

        let err = DocxTemplateRenderer
            .render_package(&mut package, &record())
            .unwrap_err();
        assert!(format!("{:#}", err).contains("unknown field 'nickname'"));
    }

    #[test]
    fn test_not_a_zip_fails() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("resume_template.docx");
        std::fs::write(&template, b"plain text, not a package").unwrap();
        assert!(DocxTemplateRenderer.render(&template, &record()).is_err());
    }

    #[test]
    fn test_placeholder_split_across_runs_renders() {
        let mut package = DocxPackage::starter_template();
        package.set_part(
            DOCUMENT_PART,
            concat!(
                r#"<w:document><w:body><w:p><w:r><w:t>{{first_</w:t></w:r>"#,
                r#"<w:proofErr w:type="spellStart"/><w:r><w:rPr><w:b/></w:rPr><w:t>name}}</w:t></w:r>"#,
                r#"<w:r><w:t xml:space="preserve"> {</w:t></w:r><w:r><w:t>{last_name}</w:t></w:r>"#,
                r#"<w:r><w:t>}</w:t></w:r></w:p></w:body></w:document>"#
            )
            .as_bytes()
            .to_vec(),
        );

        DocxTemplateRenderer
            .render_package(&mut package, &record())
            .unwrap();
        let xml = package.part_text(DOCUMENT_PART).unwrap();
        assert_eq!(ooxml::plain_text(xml), "Jane Doe");
        assert_eq!(ooxml::elements(xml, "w:r").len(), 2);
    }

    #[test]
    fn test_join_leaves_unrelated_markup_alone() {
        let xml = r#"<w:p><w:r><w:t>{{email}}</w:t></w:r><w:r><w:t>a { b</w:t></w:r></w:p>"#;
        assert_eq!(join_split_placeholders(xml), xml);

        let split_section = r#"<w:p><w:r><w:t>{{#pro</w:t></w:r><w:r><w:t>jects}}</w:t></w:r></w:p>"#;
        assert_eq!(
            collapse_section_paragraphs(&join_split_placeholders(split_section)),
            "{{#projects}}"
        );
    }

    #[test]
    fn test_section_paragraphs_collapse_to_tags() {
        let xml = r#"<w:body><w:p><w:r><w:t>{{#projects}}</w:t></w:r></w:p><w:p><w:r><w:t>{{title}}</w:t></w:r></w:p><w:p><w:r><w:t>{{/projects}}</w:t></w:r></w:p></w:body>"#;
        assert_eq!(
            collapse_section_paragraphs(xml),
            r#"<w:body>{{#projects}}<w:p><w:r><w:t>{{title}}</w:t></w:r></w:p>{{/projects}}</w:body>"#
        );
    }
}
