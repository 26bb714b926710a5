use console::style;

use crate::models::ReportKind;
use crate::reporting::layout::{Block, Card, Decision, DecisionTone, Metric, Quote, ScoreGrid};
use crate::reporting::{DisplayNode, RenderedReport, ReportView};
use crate::utils::formatting::{format_count, format_timestamp};

const INDENT: &str = "  ";

/// Render one report view as styled terminal text.
pub fn render_view(kind: ReportKind, view: &ReportView) -> String {
    match view {
        ReportView::Pending => format!(
            "\n{}\n  {}\n",
            style(kind.display_name()).white().bold(),
            style("No report yet.").dim(),
        ),
        ReportView::Unavailable { reason } => format!(
            "\n{}\n  {} {}\n  {}\n",
            style(kind.display_name()).white().bold(),
            style("✗").red(),
            style("Report unavailable").red().bold(),
            style(reason).dim(),
        ),
        ReportView::Ready(report) => render_report(report),
    }
}

pub fn render_report(report: &RenderedReport) -> String {
    let mut out = String::new();
    let rule = "═".repeat(60);

    out.push_str(&format!("\n{}\n", style(&rule).cyan()));
    out.push_str(&format!("{}\n", style(report.kind.display_name()).cyan().bold()));
    out.push_str(&format!("{}\n", style(&rule).cyan()));

    let meta = &report.metadata;
    out.push_str(&format!(
        "{} {}  {} {}  {} {}\n",
        style("Model:").dim(),
        if meta.model.is_empty() { "N/A" } else { meta.model.as_str() },
        style("Generated:").dim(),
        format_timestamp(meta.created),
        style("Tokens:").dim(),
        format_count(meta.total_tokens),
    ));
    if !meta.id.is_empty() {
        out.push_str(&format!("{} {}\n", style("ID:").dim(), style(&meta.id).dim()));
    }
    out.push_str(&format!("{} {}\n", style("Parsed as:").dim(), style(report.decoded.source).dim()));

    if report.sections.is_empty() {
        out.push_str(&format!("\n  {}\n", style("The response contained no report content.").dim()));
    }

    for section in &report.sections {
        out.push_str(&format!("\n{}\n", style(&section.title).white().bold().underlined()));
        for block in &section.blocks {
            render_block(block, 1, &mut out);
        }
    }

    render_sources(report, &mut out);
    out
}

fn render_block(block: &Block, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    match block {
        Block::Node { node } => render_node(node, depth, out),
        Block::Subsection { title, blocks } => {
            out.push_str(&format!("{}{}\n", pad, style(title).cyan().bold()));
            for inner in blocks {
                render_block(inner, depth + 1, out);
            }
        }
        Block::Metrics { metrics } => {
            for Metric { label, value } in metrics {
                out.push_str(&format!("{}{} {}\n", pad, style(format!("{}:", label)).dim(), style(value).white().bold()));
            }
        }
        Block::Scores { grid } => render_scores(grid, &pad, out),
        Block::Decision { decision } => {
            out.push_str(&format!("{}{}\n", pad, decision_badge(decision)));
        }
        Block::Cards { cards } => {
            for card in cards {
                render_card(card, depth, out);
            }
        }
        Block::Quotes { quotes } => {
            for Quote { text, source } in quotes {
                out.push_str(&format!("{}{} {}\n", pad, style("❝").dim(), style(text).italic()));
                if let Some(source) = source {
                    out.push_str(&format!("{}  {}\n", pad, style(format!("- {}", source)).dim()));
                }
            }
        }
    }
}

fn render_node(node: &DisplayNode, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    match node {
        DisplayNode::Text(text) => {
            for line in text.lines() {
                out.push_str(&format!("{}{}\n", pad, line));
            }
        }
        DisplayNode::BulletList(items) => {
            for item in items {
                match item {
                    DisplayNode::Text(text) => {
                        out.push_str(&format!("{}{} {}\n", pad, style("•").cyan(), text));
                    }
                    nested => {
                        out.push_str(&format!("{}{}\n", pad, style("•").cyan()));
                        render_node(nested, depth + 1, out);
                    }
                }
            }
        }
        DisplayNode::KeyedGroup(entries) => {
            for (label, value) in entries {
                match value {
                    DisplayNode::Text(text) if !text.contains('\n') => {
                        out.push_str(&format!("{}{} {}\n", pad, style(format!("{}:", label)).bold(), text));
                    }
                    nested => {
                        out.push_str(&format!("{}{}\n", pad, style(format!("{}:", label)).bold()));
                        render_node(nested, depth + 1, out);
                    }
                }
            }
        }
    }
}

fn render_scores(grid: &ScoreGrid, pad: &str, out: &mut String) {
    let width = grid.scores.iter().map(|s| s.label.chars().count()).max().unwrap_or(0);
    for score in &grid.scores {
        out.push_str(&format!(
            "{}{:<width$}  {}\n",
            pad,
            score.label,
            style(&score.value).white().bold(),
            width = width,
        ));
        if let Some(justification) = &score.justification {
            out.push_str(&format!("{}  {}\n", pad, style(justification).dim()));
        }
    }

    if let Some(average) = &grid.average {
        let passes = match (average.parse::<f64>(), grid.threshold) {
            (Ok(avg), Some(threshold)) => Some(avg >= threshold),
            _ => None,
        };
        let avg_styled = match passes {
            Some(true) => style(average).green().bold(),
            Some(false) => style(average).yellow().bold(),
            None => style(average).white().bold(),
        };
        let threshold = grid
            .threshold
            .map(|t| format!(" (threshold {})", t))
            .unwrap_or_default();
        out.push_str(&format!("{}{} {}{}\n", pad, style("Average:").bold(), avg_styled, style(threshold).dim()));
    }

    if let Some(decision) = &grid.decision {
        out.push_str(&format!("{}{}\n", pad, decision_badge(decision)));
    }
}

fn render_card(card: &Card, depth: usize, out: &mut String) {
    let pad = INDENT.repeat(depth);
    out.push_str(&format!("{}{} {}\n", pad, style("▸").cyan(), style(&card.title).white().bold()));
    if let Some(description) = &card.description {
        out.push_str(&format!("{}  {}\n", pad, description));
    }
    if !card.details.is_empty() {
        render_node(&DisplayNode::KeyedGroup(card.details.clone()), depth + 1, out);
    }
}

pub fn decision_badge(decision: &Decision) -> String {
    let label = format!(" {} ", decision.label.to_uppercase());
    match decision.tone {
        DecisionTone::Positive => style(label).on_green().black().bold().to_string(),
        DecisionTone::Caution => style(label).on_yellow().black().bold().to_string(),
        DecisionTone::Negative => style(label).on_red().white().bold().to_string(),
    }
}

fn render_sources(report: &RenderedReport, out: &mut String) {
    if !report.citations.is_empty() {
        out.push_str(&format!("\n{}\n", style("Citations").white().bold().underlined()));
        for (i, url) in report.citations.iter().enumerate() {
            out.push_str(&format!("{}[{}] {}\n", INDENT, i + 1, style(url).blue()));
        }
    }
    if !report.search_results.is_empty() {
        out.push_str(&format!("\n{}\n", style("Search Results").white().bold().underlined()));
        for result in &report.search_results {
            let date = result
                .date
                .as_deref()
                .map(|d| format!(" ({})", d))
                .unwrap_or_default();
            out.push_str(&format!(
                "{}{} {}{}\n{}  {}\n",
                INDENT,
                style("•").cyan(),
                result.title,
                style(date).dim(),
                INDENT,
                style(&result.url).blue(),
            ));
        }
    }
}

/// Render the version info.
pub fn render_version() -> String {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("dev");
    let build_ts = option_env!("BUILD_TIMESTAMP").unwrap_or("unknown");

    format!(
        "\n  {} {}\n  {} {}\n  {} {}\n",
        style("Version:").dim(),
        style(version).white().bold(),
        style("Commit:").dim(),
        style(git_hash).white(),
        style("Built:").dim(),
        style(build_ts).white(),
    )
}
