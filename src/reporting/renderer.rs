use serde::Serialize;

use crate::models::{ReportValue, Scalar};

/// Rendering-ready tree derived from a [`ReportValue`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum DisplayNode {
    Text(String),
    BulletList(Vec<DisplayNode>),
    KeyedGroup(Vec<(String, DisplayNode)>),
}

impl DisplayNode {
    pub fn is_empty(&self) -> bool {
        match self {
            DisplayNode::Text(t) => t.trim().is_empty(),
            DisplayNode::BulletList(items) => items.is_empty(),
            DisplayNode::KeyedGroup(entries) => entries.is_empty(),
        }
    }
}

/// Render any decoded value. Total over every value shape.
///
/// - text and other scalars become a leaf
/// - sequences become a bullet list, with mapping elements as keyed groups
/// - mappings become keyed groups in source order with humanized labels
pub fn render_value(value: &ReportValue) -> DisplayNode {
    match value {
        ReportValue::Scalar(Scalar::Text(s)) => DisplayNode::Text(s.clone()),
        ReportValue::Scalar(other) => DisplayNode::Text(other.to_string()),
        ReportValue::Sequence(items) => {
            DisplayNode::BulletList(items.iter().map(render_value).collect())
        }
        ReportValue::Mapping(entries) => DisplayNode::KeyedGroup(
            entries
                .iter()
                .map(|(key, v)| (humanize_key(key), render_value(v)))
                .collect(),
        ),
    }
}

/// Turn a JSON key into a label: a space before each internal capital,
/// underscores to spaces, every word capitalized.
///
/// `cac_ltv_ratio` → `Cac Ltv Ratio`, `marketGrowth` → `Market Growth`.
pub fn humanize_key(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch == '_' {
            spaced.push(' ');
            continue;
        }
        if i > 0 && ch.is_uppercase() {
            spaced.push(' ');
        }
        spaced.push(ch);
    }

    spaced
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Render a loosely formatted markdown section body.
///
/// Blank lines separate paragraphs, `-`/`*`/`•`/`1.` lines become bullets,
/// `**bold**` markers are dropped.
pub fn render_markdown(text: &str) -> Vec<DisplayNode> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<String> = Vec::new();
    let mut bullets: Vec<DisplayNode> = Vec::new();

    fn flush(paragraph: &mut Vec<String>, bullets: &mut Vec<DisplayNode>, blocks: &mut Vec<DisplayNode>) {
        if !paragraph.is_empty() {
            blocks.push(DisplayNode::Text(paragraph.join(" ")));
            paragraph.clear();
        }
        if !bullets.is_empty() {
            blocks.push(DisplayNode::BulletList(std::mem::take(bullets)));
        }
    }

    for line in text.lines() {
        let line = strip_emphasis(line.trim());
        if line.is_empty() {
            flush(&mut paragraph, &mut bullets, &mut blocks);
            continue;
        }
        match bullet_body(&line) {
            Some(body) => {
                if !paragraph.is_empty() {
                    blocks.push(DisplayNode::Text(paragraph.join(" ")));
                    paragraph.clear();
                }
                bullets.push(DisplayNode::Text(body.to_string()));
            }
            None => {
                if !bullets.is_empty() {
                    blocks.push(DisplayNode::BulletList(std::mem::take(&mut bullets)));
                }
                paragraph.push(line);
            }
        }
    }
    flush(&mut paragraph, &mut bullets, &mut blocks);
    blocks
}

fn bullet_body(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(". ") {
            return Some(rest.trim());
        }
    }
    None
}

fn strip_emphasis(line: &str) -> String {
    line.replace("**", "")
}
