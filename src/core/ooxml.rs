// src/core/ooxml.rs
//! Minimal scanning helpers for WordprocessingML parts.
//!
//! These only handle the flat element shapes Word writes for paragraphs,
//! runs and text (`w:p`, `w:r`, `w:t`, `w:hyperlink`, `Relationship`), none of
//! which nest inside themselves.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    /// Byte range of the whole element, open tag to close tag.
    pub outer: Range<usize>,
    /// The opening tag including `<` and `>`.
    pub open_tag: &'a str,
    /// Content between the tags, empty for self-closing elements.
    pub inner: &'a str,
}

/// Find the next `<name ...>` element at or after `from`.
pub fn next_element<'a>(xml: &'a str, name: &str, from: usize) -> Option<Element<'a>> {
    let needle = format!("<{}", name);
    let close = format!("</{}>", name);
    let mut pos = from;

    loop {
        let start = pos + xml.get(pos..)?.find(&needle)?;
        let after_name = start + needle.len();
        match xml[after_name..].chars().next() {
            Some('>') | Some('/') | Some(' ') | Some('\n') | Some('\r') | Some('\t') => {}
            _ => {
                pos = after_name;
                continue;
            }
        }

        let open_end = after_name + xml[after_name..].find('>')? + 1;
        let open_tag = &xml[start..open_end];

        if open_tag.ends_with("/>") {
            return Some(Element {
                outer: start..open_end,
                open_tag,
                inner: "",
            });
        }

        let close_start = open_end + xml[open_end..].find(&close)?;
        return Some(Element {
            outer: start..close_start + close.len(),
            open_tag,
            inner: &xml[open_end..close_start],
        });
    }
}

/// All `<name>` elements in document order.
pub fn elements<'a>(xml: &'a str, name: &str) -> Vec<Element<'a>> {
    let mut found = Vec::new();
    let mut pos = 0;
    while let Some(element) = next_element(xml, name, pos) {
        pos = element.outer.end;
        found.push(element);
    }
    found
}

/// Whether an element with this exact name appears anywhere in `xml`.
pub fn contains_element(xml: &str, name: &str) -> bool {
    next_element(xml, name, 0).is_some()
}

/// Value of `attr="..."` inside an opening tag.
pub fn attribute<'a>(open_tag: &'a str, attr: &str) -> Option<&'a str> {
    let needle = format!(" {}=\"", attr);
    let start = open_tag.find(&needle)? + needle.len();
    let len = open_tag[start..].find('"')?;
    Some(&open_tag[start..start + len])
}

/// Concatenated, unescaped `w:t` text of a fragment.
pub fn plain_text(xml: &str) -> String {
    elements(xml, "w:t")
        .iter()
        .map(|t| unescape(t.inner))
        .collect()
}

pub fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

pub fn unescape(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARA: &str = r#"<w:body><w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Edu</w:t></w:r><w:r><w:tab/><w:t xml:space="preserve">cation &amp; more</w:t></w:r></w:p><w:tbl><w:tr/></w:tbl><w:p/></w:body>"#;

    #[test]
    fn test_paragraphs_skip_similar_prefixes() {
        let paragraphs = elements(PARA, "w:p");
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].inner.starts_with("<w:pPr>"));
        assert_eq!(paragraphs[1].inner, "");
    }

    #[test]
    fn test_plain_text_ignores_tabs_and_tables() {
        assert_eq!(plain_text(PARA), "Education & more");
    }

    #[test]
    fn test_attribute_lookup() {
        let style = next_element(PARA, "w:pStyle", 0).unwrap();
        assert_eq!(attribute(style.open_tag, "w:val"), Some("Heading1"));
        assert_eq!(attribute(style.open_tag, "w:missing"), None);
    }

    #[test]
    fn test_escape_roundtrip_on_specials() {
        let raw = r#"R&D <team> "quoted" it's"#;
        assert_eq!(unescape(&escape(raw)), raw);
        assert_eq!(escape("a<b"), "a&lt;b");
    }
}
