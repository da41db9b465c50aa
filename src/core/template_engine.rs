// src/core/template_engine.rs
//! Placeholder engine used to fill document templates
//!
//! Supported syntax:
//! - `{{name}}` and dotted paths such as `{{skills.frameworks}}`
//! - `{{#list}}...{{/list}}` repeats the body for every item of an array, or
//!   renders it once for a truthy value
//! - `{{^name}}...{{/name}}` renders the body only when the value is falsy
//! - `{{.}}` refers to the current item
//!
//! Referencing a field the data does not define is an error.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unclosed tag starting at byte {0}")]
    UnclosedTag(usize),
    #[error("empty tag at byte {0}")]
    EmptyTag(usize),
    #[error("section '{0}' is never closed")]
    UnclosedSection(String),
    #[error("closing tag '{found}' does not match open section '{expected}'")]
    MismatchedSection { expected: String, found: String },
    #[error("closing tag '{0}' without an open section")]
    UnexpectedClose(String),
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("field '{0}' is a list or table and cannot be printed")]
    NotPrintable(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    Section {
        name: String,
        inverted: bool,
        children: Vec<Node>,
    },
}

// ===== Main Template Engine =====

pub struct TemplateEngine;

impl TemplateEngine {
    /// Render without escaping substituted values.
    pub fn render(template: &str, data: &Value) -> Result<String, TemplateError> {
        Self::render_with(template, data, |s| s.to_string())
    }

    /// Render, passing every substituted value through `escape`.
    pub fn render_with<F>(template: &str, data: &Value, escape: F) -> Result<String, TemplateError>
    where
        F: Fn(&str) -> String,
    {
        let nodes = parse(template)?;
        let mut out = String::with_capacity(template.len());
        let mut scopes = vec![data];
        render_nodes(&nodes, &mut scopes, &escape, &mut out)?;
        Ok(out)
    }

    /// Every field name referenced by a template, in order of appearance.
    pub fn referenced_fields(template: &str) -> Result<Vec<String>, TemplateError> {
        fn collect(nodes: &[Node], fields: &mut Vec<String>) {
            for node in nodes {
                match node {
                    Node::Text(_) => {}
                    Node::Var(name) => {
                        if !fields.contains(name) {
                            fields.push(name.clone());
                        }
                    }
                    Node::Section { name, children, .. } => {
                        if !fields.contains(name) {
                            fields.push(name.clone());
                        }
                        collect(children, fields);
                    }
                }
            }
        }

        let nodes = parse(template)?;
        let mut fields = Vec::new();
        collect(&nodes, &mut fields);
        Ok(fields)
    }
}

// ===== Parsing =====

fn parse(template: &str) -> Result<Vec<Node>, TemplateError> {
    // Stack of (section name, inverted, nodes collected so far)
    let mut stack: Vec<(String, bool, Vec<Node>)> = vec![(String::new(), false, Vec::new())];
    let mut rest = template;
    let mut offset = 0;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            push_node(&mut stack, Node::Text(rest[..start].to_string()));
        }
        let after_open = &rest[start + 2..];
        let end = after_open
            .find("}}")
            .ok_or(TemplateError::UnclosedTag(offset + start))?;
        let tag = after_open[..end].trim();
        if tag.is_empty() {
            return Err(TemplateError::EmptyTag(offset + start));
        }

        if let Some(name) = tag.strip_prefix('#') {
            stack.push((name.trim().to_string(), false, Vec::new()));
        } else if let Some(name) = tag.strip_prefix('^') {
            stack.push((name.trim().to_string(), true, Vec::new()));
        } else if let Some(name) = tag.strip_prefix('/') {
            let name = name.trim();
            if stack.len() == 1 {
                return Err(TemplateError::UnexpectedClose(name.to_string()));
            }
            let (open, inverted, children) = stack.pop().unwrap_or_default();
            if open != name {
                return Err(TemplateError::MismatchedSection {
                    expected: open,
                    found: name.to_string(),
                });
            }
            push_node(
                &mut stack,
                Node::Section {
                    name: open,
                    inverted,
                    children,
                },
            );
        } else {
            push_node(&mut stack, Node::Var(tag.to_string()));
        }

        let consumed = start + 2 + end + 2;
        offset += consumed;
        rest = &rest[consumed..];
    }

    if !rest.is_empty() {
        push_node(&mut stack, Node::Text(rest.to_string()));
    }

    if stack.len() > 1 {
        let (open, _, _) = stack.pop().unwrap_or_default();
        return Err(TemplateError::UnclosedSection(open));
    }

    Ok(stack.pop().map(|(_, _, nodes)| nodes).unwrap_or_default())
}

fn push_node(stack: &mut [(String, bool, Vec<Node>)], node: Node) {
    if let Some((_, _, nodes)) = stack.last_mut() {
        nodes.push(node);
    }
}

// ===== Rendering =====

fn render_nodes<'a, F>(
    nodes: &[Node],
    scopes: &mut Vec<&'a Value>,
    escape: &F,
    out: &mut String,
) -> Result<(), TemplateError>
where
    F: Fn(&str) -> String,
{
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => {
                let value = lookup(scopes, name)?;
                out.push_str(&escape(&printable(name, value)?));
            }
            Node::Section {
                name,
                inverted,
                children,
            } => {
                let value = lookup(scopes, name)?;
                if *inverted {
                    if !is_truthy(value) {
                        render_nodes(children, scopes, escape, out)?;
                    }
                    continue;
                }
                match value {
                    Value::Array(items) => {
                        for item in items {
                            scopes.push(item);
                            let result = render_nodes(children, scopes, escape, out);
                            scopes.pop();
                            result?;
                        }
                    }
                    v if is_truthy(v) => {
                        scopes.push(v);
                        let result = render_nodes(children, scopes, escape, out);
                        scopes.pop();
                        result?;
                    }
                    _ => {}
                }
            }
        }
    }
    Ok(())
}

/// Resolve a (possibly dotted) name against the innermost scope that
/// defines its first segment.
fn lookup<'a>(scopes: &[&'a Value], name: &str) -> Result<&'a Value, TemplateError> {
    if name == "." {
        return scopes
            .last()
            .copied()
            .ok_or_else(|| TemplateError::UnknownField(name.to_string()));
    }

    let mut segments = name.split('.');
    let head = segments.next().unwrap_or_default();

    let mut current = scopes
        .iter()
        .rev()
        .find_map(|scope| scope.as_object().and_then(|obj| obj.get(head)))
        .ok_or_else(|| TemplateError::UnknownField(name.to_string()))?;

    for segment in segments {
        current = current
            .as_object()
            .and_then(|obj| obj.get(segment))
            .ok_or_else(|| TemplateError::UnknownField(name.to_string()))?;
    }

    Ok(current)
}

fn printable(name: &str, value: &Value) -> Result<String, TemplateError> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Array(_) | Value::Object(_) => Err(TemplateError::NotPrintable(name.to_string())),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Number(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data() -> Value {
        json!({
            "first_name": "Jane",
            "summary": "Top level",
            "skills": { "frameworks": "Axum, Rocket" },
            "projects": [
                { "title": "A", "summary": "first" },
                { "title": "B", "summary": "second" }
            ],
            "github": ""
        })
    }

    #[test]
    fn test_substitutes_simple_and_dotted_fields() {
        let out = TemplateEngine::render(
            "Hi {{ first_name }}, you know {{skills.frameworks}}.",
            &data(),
        )
        .unwrap();
        assert_eq!(out, "Hi Jane, you know Axum, Rocket.");
    }

    #[test]
    fn test_sections_iterate_with_inner_scope_first() {
        let out =
            TemplateEngine::render("{{#projects}}[{{title}}: {{summary}}]{{/projects}} {{summary}}", &data())
                .unwrap();
        assert_eq!(out, "[A: first][B: second] Top level");
    }

    #[test]
    fn test_inverted_and_falsy_sections() {
        let out = TemplateEngine::render("{{#github}}gh{{/github}}{{^github}}none{{/github}}", &data())
            .unwrap();
        assert_eq!(out, "none");
    }

    #[test]
    fn test_unknown_field_is_an_error() {
        let err = TemplateEngine::render("{{ middle_name }}", &data()).unwrap_err();
        assert_eq!(err, TemplateError::UnknownField("middle_name".to_string()));

        let err = TemplateEngine::render("{{skills.cooking}}", &data()).unwrap_err();
        assert_eq!(err, TemplateError::UnknownField("skills.cooking".to_string()));
    }

    #[test]
    fn test_structural_errors() {
        assert_eq!(
            TemplateEngine::render("{{#projects}}x", &data()).unwrap_err(),
            TemplateError::UnclosedSection("projects".to_string())
        );
        assert!(matches!(
            TemplateEngine::render("{{#projects}}x{{/skills}}", &data()).unwrap_err(),
            TemplateError::MismatchedSection { .. }
        ));
        assert_eq!(
            TemplateEngine::render("oops {{first_name", &data()).unwrap_err(),
            TemplateError::UnclosedTag(5)
        );
        assert_eq!(
            TemplateEngine::render("{{skills}}", &data()).unwrap_err(),
            TemplateError::NotPrintable("skills".to_string())
        );
    }

    #[test]
    fn test_escape_applies_to_values_only() {
        let out = TemplateEngine::render_with("<b>{{first_name}}</b>", &json!({"first_name": "A&B"}), |s| {
            s.replace('&', "&amp;")
        })
        .unwrap();
        assert_eq!(out, "<b>A&amp;B</b>");
    }

    #[test]
    fn test_referenced_fields() {
        let fields =
            TemplateEngine::referenced_fields("{{first_name}} {{#projects}}{{title}}{{/projects}} {{first_name}}")
                .unwrap();
        assert_eq!(fields, vec!["first_name", "projects", "title"]);
    }
}
