use serde::Serialize;

use crate::models::ReportValue;
use super::profile::KindProfile;
use super::renderer::{humanize_key, render_value, DisplayNode};

/// A titled part of a rendered report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Report key the section was built from, if any.
    pub key: Option<String>,
    pub title: String,
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Node { node: DisplayNode },
    Subsection { title: String, blocks: Vec<Block> },
    Metrics { metrics: Vec<Metric> },
    Scores { grid: ScoreGrid },
    Decision { decision: Decision },
    Cards { cards: Vec<Card> },
    Quotes { quotes: Vec<Quote> },
}

impl Block {
    pub fn node(node: DisplayNode) -> Self {
        Block::Node { node }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub label: String,
    pub value: String,
    pub justification: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreGrid {
    pub scores: Vec<Score>,
    pub average: Option<String>,
    pub threshold: Option<f64>,
    pub decision: Option<Decision>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionTone {
    Positive,
    Caution,
    Negative,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Decision {
    pub label: String,
    pub tone: DecisionTone,
}

impl Decision {
    pub fn new(label: &str) -> Self {
        let tone = match label.trim().to_lowercase().as_str() {
            "proceed" => DecisionTone::Positive,
            "pivot" => DecisionTone::Caution,
            _ => DecisionTone::Negative,
        };
        Self { label: label.trim().to_string(), tone }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub title: String,
    pub description: Option<String>,
    pub details: Vec<(String, DisplayNode)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub text: String,
    pub source: Option<String>,
}

/// What a specialized layout sees besides its own value.
pub struct LayoutContext<'a> {
    pub report: &'a ReportValue,
    pub profile: &'a KindProfile,
}

/// Renders the value of one known key. An empty result drops the section.
pub type LayoutFn = fn(&LayoutContext<'_>, &ReportValue) -> Vec<Block>;

pub fn generic(_ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    let node = render_value(value);
    if node.is_empty() {
        Vec::new()
    } else {
        vec![Block::node(node)]
    }
}

pub fn bullets(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    match value {
        ReportValue::Sequence(items) if items.is_empty() => Vec::new(),
        ReportValue::Sequence(items) => {
            vec![Block::node(DisplayNode::BulletList(items.iter().map(render_value).collect()))]
        }
        ReportValue::Scalar(_) => vec![Block::node(DisplayNode::BulletList(vec![render_value(value)]))],
        _ => generic(ctx, value),
    }
}

pub fn decision_badge(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    match value.as_str() {
        Some(label) if !label.trim().is_empty() => {
            vec![Block::Decision { decision: Decision::new(label) }]
        }
        _ => generic(ctx, value),
    }
}

const AVERAGE_KEYS: &[&str] = &["average", "average_score"];
const DECISION_KEY: &str = "decision";

/// Score grid with the average and decision pulled out of the individual scores.
pub fn score_grid(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    let Some(entries) = value.as_mapping() else {
        return generic(ctx, value);
    };

    let mut grid = ScoreGrid {
        scores: Vec::new(),
        average: None,
        threshold: ctx.profile.score_threshold,
        decision: None,
    };

    for (key, entry) in entries {
        if entry.is_null() {
            continue;
        }
        if AVERAGE_KEYS.contains(&key.as_str()) {
            grid.average = Some(score_value(entry));
            continue;
        }
        if key == DECISION_KEY {
            if let Some(label) = entry.as_str() {
                grid.decision = Some(Decision::new(label));
                continue;
            }
        }
        grid.scores.push(Score {
            label: humanize_key(key),
            value: score_value(entry),
            justification: entry
                .get_present("justification")
                .map(ReportValue::to_display_string),
        });
    }

    vec![Block::Scores { grid }]
}

/// A score may be a bare number or `{score, justification}`.
fn score_value(entry: &ReportValue) -> String {
    entry
        .get_present("score")
        .unwrap_or(entry)
        .to_display_string()
}

pub fn evidence_summary(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    let Some(entries) = value.as_mapping() else {
        return generic(ctx, value);
    };

    let mut blocks = Vec::new();
    for (key, entry) in entries {
        if entry.is_null() {
            continue;
        }
        let inner = match key.as_str() {
            "themes" => bullets(ctx, entry),
            "complaints" => quotes(ctx, entry),
            _ => generic(ctx, entry),
        };
        if inner.is_empty() {
            continue;
        }
        let title = match key.as_str() {
            "themes" => "Key Themes".to_string(),
            "complaints" => "User Complaints".to_string(),
            other => humanize_key(other),
        };
        blocks.push(Block::Subsection { title, blocks: inner });
    }
    blocks
}

fn quotes(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    let Some(items) = value.as_sequence() else {
        return generic(ctx, value);
    };
    let quotes: Vec<Quote> = items
        .iter()
        .map(|item| match item.get_present("quote") {
            Some(text) => Quote {
                text: text.to_display_string(),
                source: item.get_present("source").map(ReportValue::to_display_string),
            },
            None => Quote { text: item.to_display_string(), source: None },
        })
        .collect();
    if quotes.is_empty() {
        Vec::new()
    } else {
        vec![Block::Quotes { quotes }]
    }
}

/// Labelled metric cards for the listed fields; anything else in the mapping
/// still renders generically below them.
fn metric_cards(ctx: &LayoutContext<'_>, value: &ReportValue, fields: &[(&str, &str)]) -> Vec<Block> {
    let Some(entries) = value.as_mapping() else {
        return generic(ctx, value);
    };

    let metrics: Vec<Metric> = fields
        .iter()
        .filter_map(|(key, label)| {
            let field = value.get_present(key)?;
            field.is_scalar().then(|| Metric {
                label: label.to_string(),
                value: field.to_display_string(),
            })
        })
        .collect();

    let mut blocks = Vec::new();
    if !metrics.is_empty() {
        blocks.push(Block::Metrics { metrics });
    }
    for (key, entry) in entries {
        let is_card = fields
            .iter()
            .any(|(field, _)| field == key && entry.is_scalar());
        if is_card || entry.is_null() {
            continue;
        }
        let title = fields
            .iter()
            .find(|(field, _)| field == key)
            .map(|(_, label)| label.to_string())
            .unwrap_or_else(|| humanize_key(key));
        let inner = match entry {
            ReportValue::Sequence(_) => bullets(ctx, entry),
            _ => generic(ctx, entry),
        };
        if !inner.is_empty() {
            blocks.push(Block::Subsection { title, blocks: inner });
        }
    }
    blocks
}

pub fn market_size_estimates(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    metric_cards(ctx, value, &[
        ("tam", "TAM (Total Addressable Market)"),
        ("sam", "SAM (Serviceable Addressable Market)"),
        ("som", "SOM (Serviceable Obtainable Market)"),
    ])
}

pub fn market_growth(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    metric_cards(ctx, value, &[
        ("annual_growth", "Annual Growth Rate"),
        ("cagr", "Projected 5-Year CAGR"),
        ("key_trends", "Key Trends"),
    ])
}

pub fn customer_acquisition(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    metric_cards(ctx, value, &[
        ("cac", "Estimated CAC"),
        ("cac_ltv_ratio", "CAC:LTV Ratio"),
        ("strategy", "Acquisition Strategy"),
    ])
}

pub fn revenue_potential(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    metric_cards(ctx, value, &[
        ("model", "Recommended Model"),
        ("pricing", "Expected Pricing"),
        ("arpu", "ARPU (Average Revenue Per User)"),
        ("ltv", "LTV (Lifetime Value)"),
    ])
}

pub fn competitor_cards(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    let Some(items) = value.as_sequence() else {
        return generic(ctx, value);
    };

    let cards: Vec<Card> = items
        .iter()
        .map(|item| match item.as_mapping() {
            Some(entries) => Card {
                title: item
                    .get_present("name")
                    .map(ReportValue::to_display_string)
                    .unwrap_or_else(|| "Unnamed competitor".to_string()),
                description: item.get_present("description").map(ReportValue::to_display_string),
                details: entries
                    .iter()
                    .filter(|(k, v)| k != "name" && k != "description" && !v.is_null())
                    .map(|(k, v)| (humanize_key(k), render_value(v)))
                    .collect(),
            },
            None => Card {
                title: item.to_display_string(),
                description: None,
                details: Vec::new(),
            },
        })
        .collect();

    if cards.is_empty() {
        Vec::new()
    } else {
        vec![Block::Cards { cards }]
    }
}

const NEXT_STEPS_KEY: &str = "next_steps";
const KEY_INSIGHTS_KEY: &str = "key_insights";

/// Insights as bullets, with the report's next steps folded in underneath.
pub fn insights_with_next_steps(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    let mut blocks = bullets(ctx, value);
    if let Some(steps) = ctx.report.get_present(NEXT_STEPS_KEY) {
        let inner = next_steps_body(ctx, steps);
        if !inner.is_empty() {
            blocks.push(Block::Subsection {
                title: "Recommended Next Steps".to_string(),
                blocks: inner,
            });
        }
    }
    blocks
}

/// Next steps on their own, only when no insights section absorbed them.
pub fn orphan_next_steps(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    if ctx.report.get_present(KEY_INSIGHTS_KEY).is_some() {
        return Vec::new();
    }
    next_steps_body(ctx, value)
}

fn next_steps_body(ctx: &LayoutContext<'_>, value: &ReportValue) -> Vec<Block> {
    match value {
        ReportValue::Sequence(_) => bullets(ctx, value),
        _ => generic(ctx, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportKind;
    use crate::reporting::profile::profile_for;
    use serde_json::json;

    fn run(kind: ReportKind, layout: LayoutFn, report: serde_json::Value, key: &str) -> Vec<Block> {
        let report = ReportValue::from(report);
        let profile = profile_for(kind);
        let ctx = LayoutContext { report: &report, profile };
        let value = report.get(key).cloned().unwrap_or_else(ReportValue::null);
        layout(&ctx, &value)
    }

    #[test]
    fn test_score_grid_pulls_out_average_and_decision() {
        let blocks = run(
            ReportKind::MarketSize,
            score_grid,
            json!({"metric_scoring": {
                "tam_score": {"score": 8, "justification": "large"},
                "sam_score": 7,
                "average": 7.5,
                "decision": "Proceed"
            }}),
            "metric_scoring",
        );
        let Block::Scores { grid } = &blocks[0] else { panic!("expected score grid") };
        assert_eq!(grid.scores.len(), 2);
        assert_eq!(grid.scores[0].label, "Tam Score");
        assert_eq!(grid.scores[0].value, "8");
        assert_eq!(grid.scores[0].justification.as_deref(), Some("large"));
        assert_eq!(grid.scores[1].value, "7");
        assert_eq!(grid.average.as_deref(), Some("7.5"));
        assert_eq!(grid.threshold, Some(6.5));
        assert_eq!(grid.decision.as_ref().map(|d| d.tone), Some(DecisionTone::Positive));
    }

    #[test]
    fn test_score_grid_text_falls_back_to_generic() {
        let blocks = run(
            ReportKind::CompetitorAnalysis,
            score_grid,
            json!({"metric_scoring": "Saturation 4/10"}),
            "metric_scoring",
        );
        assert_eq!(blocks, vec![Block::node(DisplayNode::Text("Saturation 4/10".into()))]);
    }

    #[test]
    fn test_decision_tones() {
        assert_eq!(Decision::new("Proceed").tone, DecisionTone::Positive);
        assert_eq!(Decision::new(" pivot ").tone, DecisionTone::Caution);
        assert_eq!(Decision::new("Abandon").tone, DecisionTone::Negative);
        assert_eq!(Decision::new("Reconsider").tone, DecisionTone::Negative);
    }

    #[test]
    fn test_metric_cards_keep_unlisted_fields() {
        let blocks = run(
            ReportKind::MarketSize,
            market_growth,
            json!({"market_growth": {
                "annual_growth": "12%",
                "cagr": "15%",
                "key_trends": ["AI", "Remote work"],
                "drivers": "Regulation"
            }}),
            "market_growth",
        );
        let Block::Metrics { metrics } = &blocks[0] else { panic!("expected metrics") };
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[1].label, "Projected 5-Year CAGR");
        assert!(matches!(&blocks[1], Block::Subsection { title, .. } if title == "Key Trends"));
        assert!(matches!(&blocks[2], Block::Subsection { title, .. } if title == "Drivers"));
    }

    #[test]
    fn test_competitor_cards() {
        let blocks = run(
            ReportKind::CompetitorAnalysis,
            competitor_cards,
            json!({"top_competitors": [
                {"name": "Acme", "description": "Big player", "pricing": "$10/mo"},
                "Globex"
            ]}),
            "top_competitors",
        );
        let Block::Cards { cards } = &blocks[0] else { panic!("expected cards") };
        assert_eq!(cards[0].title, "Acme");
        assert_eq!(cards[0].description.as_deref(), Some("Big player"));
        assert_eq!(cards[0].details, vec![("Pricing".to_string(), DisplayNode::Text("$10/mo".into()))]);
        assert_eq!(cards[1].title, "Globex");
    }

    #[test]
    fn test_insights_absorb_next_steps() {
        let report = json!({"key_insights": ["a"], "next_steps": "Build an MVP"});
        let blocks = run(ReportKind::MarketSize, insights_with_next_steps, report.clone(), "key_insights");
        assert_eq!(blocks.len(), 2);
        assert!(run(ReportKind::MarketSize, orphan_next_steps, report, "next_steps").is_empty());

        let alone = run(
            ReportKind::MarketSize,
            orphan_next_steps,
            json!({"next_steps": ["Interview users"]}),
            "next_steps",
        );
        assert_eq!(alone.len(), 1);
    }

    #[test]
    fn test_evidence_summary() {
        let blocks = run(
            ReportKind::Validation,
            evidence_summary,
            json!({"evidence_collection_summary": {
                "themes": ["cost"],
                "complaints": [{"quote": "too slow", "source": "reddit"}]
            }}),
            "evidence_collection_summary",
        );
        assert_eq!(blocks.len(), 2);
        let Block::Subsection { title, blocks: inner } = &blocks[1] else { panic!("expected subsection") };
        assert_eq!(title, "User Complaints");
        assert_eq!(
            inner[0],
            Block::Quotes { quotes: vec![Quote { text: "too slow".into(), source: Some("reddit".into()) }] }
        );
    }

    #[test]
    fn test_empty_bullets_drop_section() {
        assert!(run(ReportKind::Validation, bullets, json!({"key_insights": []}), "key_insights").is_empty());
    }
}
