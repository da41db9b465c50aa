// src/core/preview.rs
//! DOCX to HTML conversion for the inline resume preview

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;

use crate::core::docx::{DocxPackage, DOCUMENT_PART, DOCUMENT_RELS_PART};
use crate::core::ooxml::{self, Element};

/// Converts a rendered document into HTML body markup.
pub trait PreviewConverter {
    fn convert(&self, document: &mut Cursor<Vec<u8>>) -> Result<String>;
}

/// A converter shared across server requests.
pub type SharedPreview = Arc<dyn PreviewConverter + Send + Sync>;

impl<T: PreviewConverter + ?Sized> PreviewConverter for Arc<T> {
    fn convert(&self, document: &mut Cursor<Vec<u8>>) -> Result<String> {
        (**self).convert(document)
    }
}

/// Semantic conversion in the spirit of mammoth: headings, list items,
/// bold/italic runs and hyperlinks survive, layout does not.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxHtmlConverter;

impl PreviewConverter for DocxHtmlConverter {
    fn convert(&self, document: &mut Cursor<Vec<u8>>) -> Result<String> {
        let package = DocxPackage::from_reader(document).context("Preview could not open document")?;
        let xml = package.part_text(DOCUMENT_PART)?;
        let links = hyperlink_targets(&package);

        let mut html = String::new();
        let mut in_list = false;

        for paragraph in ooxml::elements(xml, "w:p") {
            let content = paragraph_html(paragraph.inner, &links);
            if content.trim().is_empty() {
                continue;
            }

            let tag = block_tag(&paragraph);
            if tag == "li" && !in_list {
                html.push_str("<ul>");
                in_list = true;
            } else if tag != "li" && in_list {
                html.push_str("</ul>");
                in_list = false;
            }
            html.push_str(&format!("<{tag}>{content}</{tag}>"));
        }

        if in_list {
            html.push_str("</ul>");
        }
        Ok(html)
    }
}

/// Wrap converted markup in the fixed preview shell.
pub fn styled_preview(body_html: &str) -> String {
    format!(
        r#"<html>
    <head>
        <style>
            body {{
                background-color: white;
                color: black;
                font-family: Calibri, sans-serif;
                padding: 20px;
                max-width: 800px;
                margin: 0 auto;
            }}
            a {{
                color: #1a73e8;
            }}
        </style>
    </head>
    <body>
        {}
    </body>
</html>"#,
        body_html
    )
}

fn hyperlink_targets(package: &DocxPackage) -> HashMap<String, String> {
    let Ok(rels) = package.part_text(DOCUMENT_RELS_PART) else {
        return HashMap::new();
    };

    ooxml::elements(rels, "Relationship")
        .iter()
        .filter(|rel| {
            ooxml::attribute(rel.open_tag, "Type").is_some_and(|t| t.ends_with("/hyperlink"))
        })
        .filter_map(|rel| {
            let id = ooxml::attribute(rel.open_tag, "Id")?;
            let target = ooxml::attribute(rel.open_tag, "Target")?;
            Some((id.to_string(), ooxml::unescape(target)))
        })
        .collect()
}

fn block_tag(paragraph: &Element<'_>) -> &'static str {
    if ooxml::contains_element(paragraph.inner, "w:numPr") {
        return "li";
    }
    let style = ooxml::next_element(paragraph.inner, "w:pStyle", 0)
        .and_then(|s| ooxml::attribute(s.open_tag, "w:val"));

    match style {
        Some("Title") | Some("Heading1") => "h1",
        Some("Heading2") => "h2",
        Some("Heading3") => "h3",
        Some("Heading4") => "h4",
        Some("ListParagraph") => "li",
        _ => "p",
    }
}

fn paragraph_html(inner: &str, links: &HashMap<String, String>) -> String {
    let mut html = String::new();
    let mut pos = 0;

    loop {
        let run = ooxml::next_element(inner, "w:r", pos);
        let link = ooxml::next_element(inner, "w:hyperlink", pos);

        match (run, link) {
            (Some(run), Some(link)) if link.outer.start < run.outer.start => {
                html.push_str(&hyperlink_html(&link, links));
                pos = link.outer.end;
            }
            (Some(run), _) => {
                html.push_str(&run_html(run.inner));
                pos = run.outer.end;
            }
            (None, Some(link)) => {
                html.push_str(&hyperlink_html(&link, links));
                pos = link.outer.end;
            }
            (None, None) => break,
        }
    }

    html
}

fn hyperlink_html(link: &Element<'_>, links: &HashMap<String, String>) -> String {
    let text: String = ooxml::elements(link.inner, "w:r")
        .iter()
        .map(|run| run_html(run.inner))
        .collect();

    match ooxml::attribute(link.open_tag, "r:id").and_then(|id| links.get(id)) {
        Some(href) => format!(r#"<a href="{}">{}</a>"#, escape_html(href), text),
        None => text,
    }
}

fn run_html(run: &str) -> String {
    let mut text = String::new();
    let mut pos = 0;
    // Text, tabs and breaks in document order
    loop {
        let next = [
            ooxml::next_element(run, "w:t", pos),
            ooxml::next_element(run, "w:tab", pos),
            ooxml::next_element(run, "w:br", pos),
        ]
        .into_iter()
        .flatten()
        .min_by_key(|e| e.outer.start);

        let Some(element) = next else { break };
        if element.open_tag.starts_with("<w:tab") {
            text.push('\t');
        } else if element.open_tag.starts_with("<w:br") {
            text.push_str("<br />");
        } else {
            text.push_str(&escape_html(&ooxml::unescape(element.inner)));
        }
        pos = element.outer.end;
    }

    if text.is_empty() {
        return text;
    }

    let props = ooxml::next_element(run, "w:rPr", 0)
        .map(|p| p.inner)
        .unwrap_or_default();
    if is_on(props, "w:i") {
        text = format!("<em>{}</em>", text);
    }
    if is_on(props, "w:b") {
        text = format!("<strong>{}</strong>", text);
    }
    text
}

fn is_on(props: &str, name: &str) -> bool {
    match ooxml::next_element(props, name, 0) {
        Some(toggle) => !matches!(
            ooxml::attribute(toggle.open_tag, "w:val"),
            Some("0") | Some("false") | Some("off")
        ),
        None => false,
    }
}

fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
