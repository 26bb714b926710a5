use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::IdeaError;
use crate::models::{ReportKind, ReportSet};
use crate::reporting::layout::{Block, DecisionTone};
use crate::reporting::{build_view, DisplayNode, RenderedReport, ReportView};
use crate::utils::formatting::{format_count, format_timestamp};

pub fn render_markdown_view(kind: ReportKind, view: &ReportView) -> String {
    match view {
        ReportView::Pending => format!("# {}\n\n_No report yet._\n", kind.display_name()),
        ReportView::Unavailable { reason } => {
            format!("# {}\n\n**Report unavailable.** {}\n", kind.display_name(), reason)
        }
        ReportView::Ready(report) => render_markdown_report(report),
    }
}

pub fn render_markdown_report(report: &RenderedReport) -> String {
    let mut out = format!("# {}\n\n", report.kind.display_name());

    let meta = &report.metadata;
    out.push_str(&format!("- Model: {}\n", if meta.model.is_empty() { "N/A" } else { &meta.model }));
    out.push_str(&format!("- Generated: {}\n", format_timestamp(meta.created)));
    out.push_str(&format!("- Tokens: {}\n", format_count(meta.total_tokens)));
    if !meta.id.is_empty() {
        out.push_str(&format!("- ID: `{}`\n", meta.id));
    }

    for section in &report.sections {
        out.push_str(&format!("\n## {}\n\n", section.title));
        for block in &section.blocks {
            write_block(block, 3, &mut out);
        }
    }

    if !report.citations.is_empty() {
        out.push_str("\n## Citations\n\n");
        for (i, url) in report.citations.iter().enumerate() {
            out.push_str(&format!("{}. <{}>\n", i + 1, url));
        }
    }
    if !report.search_results.is_empty() {
        out.push_str("\n## Search Results\n\n");
        for result in &report.search_results {
            let date = result.date.as_deref().map(|d| format!(" ({})", d)).unwrap_or_default();
            out.push_str(&format!("- [{}]({}){}\n", result.title, result.url, date));
        }
    }

    out
}

fn write_block(block: &Block, level: usize, out: &mut String) {
    match block {
        Block::Node { node } => {
            write_node(node, 0, out);
            out.push('\n');
        }
        Block::Subsection { title, blocks } => {
            out.push_str(&format!("{} {}\n\n", "#".repeat(level.min(6)), title));
            for inner in blocks {
                write_block(inner, level + 1, out);
            }
        }
        Block::Metrics { metrics } => {
            out.push_str("| Metric | Value |\n|---|---|\n");
            for m in metrics {
                out.push_str(&format!("| {} | {} |\n", escape_cell(&m.label), escape_cell(&m.value)));
            }
            out.push('\n');
        }
        Block::Scores { grid } => {
            out.push_str("| Score | Value | Justification |\n|---|---|---|\n");
            for s in &grid.scores {
                out.push_str(&format!(
                    "| {} | {} | {} |\n",
                    escape_cell(&s.label),
                    escape_cell(&s.value),
                    escape_cell(s.justification.as_deref().unwrap_or("")),
                ));
            }
            out.push('\n');
            if let Some(average) = &grid.average {
                let threshold = grid.threshold.map(|t| format!(" (threshold {})", t)).unwrap_or_default();
                out.push_str(&format!("**Average:** {}{}\n\n", average, threshold));
            }
            if let Some(decision) = &grid.decision {
                out.push_str(&format!("**Decision:** {} {}\n\n", tone_marker(decision.tone), decision.label));
            }
        }
        Block::Decision { decision } => {
            out.push_str(&format!("**{}** {}\n\n", decision.label, tone_marker(decision.tone)));
        }
        Block::Cards { cards } => {
            for card in cards {
                out.push_str(&format!("{} {}\n\n", "#".repeat(level.min(6)), card.title));
                if let Some(description) = &card.description {
                    out.push_str(&format!("{}\n\n", description));
                }
                if !card.details.is_empty() {
                    write_node(&DisplayNode::KeyedGroup(card.details.clone()), 0, out);
                    out.push('\n');
                }
            }
        }
        Block::Quotes { quotes } => {
            for q in quotes {
                out.push_str(&format!("> {}\n", q.text));
                if let Some(source) = &q.source {
                    out.push_str(&format!(">\n> _{}_\n", source));
                }
                out.push('\n');
            }
        }
    }
}

fn write_node(node: &DisplayNode, depth: usize, out: &mut String) {
    let pad = "  ".repeat(depth);
    match node {
        DisplayNode::Text(text) if depth == 0 => {
            out.push_str(text);
            out.push('\n');
        }
        DisplayNode::Text(text) => out.push_str(&format!("{}{}\n", pad, text)),
        DisplayNode::BulletList(items) => {
            for item in items {
                match item {
                    DisplayNode::Text(text) => out.push_str(&format!("{}- {}\n", pad, text)),
                    nested => {
                        out.push_str(&format!("{}-\n", pad));
                        write_node(nested, depth + 1, out);
                    }
                }
            }
        }
        DisplayNode::KeyedGroup(entries) => {
            for (label, value) in entries {
                match value {
                    DisplayNode::Text(text) if !text.contains('\n') => {
                        out.push_str(&format!("{}- **{}:** {}\n", pad, label, text));
                    }
                    nested => {
                        out.push_str(&format!("{}- **{}:**\n", pad, label));
                        write_node(nested, depth + 1, out);
                    }
                }
            }
        }
    }
}

fn tone_marker(tone: DecisionTone) -> &'static str {
    match tone {
        DecisionTone::Positive => "✅",
        DecisionTone::Caution => "⚠️",
        DecisionTone::Negative => "❌",
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Write `<kind>.md` and the raw `<kind>.json` envelope for every report.
pub async fn write_reports(dir: &Path, reports: &ReportSet) -> Result<Vec<PathBuf>, IdeaError> {
    tokio::fs::create_dir_all(dir).await?;
    let mut written = Vec::new();

    for kind in ReportKind::ALL {
        let payload = reports.get(kind);
        let view = build_view(kind, payload);

        let md_path = dir.join(format!("{}.md", kind.file_stem()));
        tokio::fs::write(&md_path, render_markdown_view(kind, &view)).await?;
        info!(path = %md_path.display(), "Wrote markdown report");
        written.push(md_path);

        if let Some(raw) = &payload.raw_report_data {
            let json_path = dir.join(format!("{}.json", kind.file_stem()));
            tokio::fs::write(&json_path, raw).await?;
            written.push(json_path);
        }
    }

    Ok(written)
}
