//! Prompt templates with `{name}` placeholders.
//!
//! Templates are parsed once; rendering is a single pass, so substituted
//! values are never themselves scanned for placeholders. Braces that do not
//! wrap an identifier (`{ "json": 1 }`, `{}`) are kept literally.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::core::errors::ApiError;

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

#[derive(Debug, Clone)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        let source = fs::read_to_string(path).map_err(|e| {
            ApiError::Internal(format!(
                "Failed to read prompt template {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::parse(&source))
    }

    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find('}') {
                Some(close) if is_identifier(&after[..close]) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Placeholder(after[..close].to_string()));
                    rest = &after[close + 1..];
                }
                _ => {
                    literal.push('{');
                    rest = after;
                }
            }
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Self { segments }
    }

    /// Placeholder names in order of first appearance.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitutes every placeholder. A placeholder without a value is an error.
    pub fn render(&self, params: &HashMap<&str, &str>) -> Result<String, ApiError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Placeholder(name) => {
                    let value = params.get(name.as_str()).ok_or_else(|| {
                        ApiError::Internal(format!(
                            "Prompt template variable '{}' has no value",
                            name
                        ))
                    })?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}

fn is_identifier(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
