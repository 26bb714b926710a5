use tracing::debug;

use crate::models::{ReportKind, ReportValue};
use super::extractor::{DecodedReport, ExtractionSource};
use super::layout::{Block, LayoutContext, Section};
use super::profile::{profile_for, KindProfile};
use super::renderer::{humanize_key, render_markdown, render_value, DisplayNode};

const RAW_SECTION_TITLE: &str = "Analysis";

/// Lay a decoded report out as ordered sections.
///
/// Known keys come first in the kind's fixed order, each through its own
/// layout. Every other non-null key follows in source order, rendered
/// generically, unless it is on the already-rendered denylist.
pub fn route_sections(kind: ReportKind, decoded: &DecodedReport) -> Vec<Section> {
    let profile = profile_for(kind);

    let sections = match decoded.source {
        ExtractionSource::RawText => raw_sections(decoded),
        ExtractionSource::Sections => heading_sections(profile, &decoded.value),
        ExtractionSource::DirectJson | ExtractionSource::FencedJson => match &decoded.value {
            ReportValue::Mapping(_) => mapping_sections(profile, &decoded.value),
            other => whole_value_section(kind, other),
        },
    };

    debug!(
        kind = %kind,
        source = %decoded.source,
        sections = sections.len(),
        "Routed report sections"
    );
    sections
}

fn raw_sections(decoded: &DecodedReport) -> Vec<Section> {
    let text = decoded.raw_content().unwrap_or_default();
    if text.trim().is_empty() {
        return Vec::new();
    }
    vec![Section {
        key: None,
        title: RAW_SECTION_TITLE.to_string(),
        blocks: vec![Block::node(DisplayNode::Text(text.to_string()))],
    }]
}

fn heading_sections(profile: &KindProfile, value: &ReportValue) -> Vec<Section> {
    let Some(entries) = value.as_mapping() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|(key, body)| {
            let title = match profile.heading_title(key) {
                Some((number, title)) => format!("{}. {}", number, title),
                None => humanize_key(key),
            };
            let blocks: Vec<Block> = render_markdown(body.as_str().unwrap_or_default())
                .into_iter()
                .map(Block::node)
                .collect();
            (!blocks.is_empty()).then(|| Section { key: Some(key.clone()), title, blocks })
        })
        .collect()
}

fn mapping_sections(profile: &KindProfile, report: &ReportValue) -> Vec<Section> {
    let ctx = LayoutContext { report, profile };
    let mut sections = Vec::new();

    for known in profile.known {
        let Some(value) = report.get_present(known.key) else {
            continue;
        };
        let blocks = (known.layout)(&ctx, value);
        if blocks.is_empty() {
            continue;
        }
        sections.push(Section {
            key: Some(known.key.to_string()),
            title: known.title.to_string(),
            blocks,
        });
    }

    let entries = report.as_mapping().unwrap_or_default();
    for (key, value) in entries {
        if value.is_null() || profile.is_already_rendered(key) {
            continue;
        }
        sections.push(Section {
            key: Some(key.clone()),
            title: humanize_key(key),
            blocks: vec![Block::node(render_value(value))],
        });
    }

    sections
}

fn whole_value_section(kind: ReportKind, value: &ReportValue) -> Vec<Section> {
    if value.is_null() {
        return Vec::new();
    }
    vec![Section {
        key: None,
        title: kind.display_name().to_string(),
        blocks: vec![Block::node(render_value(value))],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::extractor::extract;

    fn route(kind: ReportKind, text: &str) -> Vec<Section> {
        route_sections(kind, &extract(text, kind))
    }

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_known_keys_come_first_in_profile_order() {
        let sections = route(
            ReportKind::Validation,
            r#"{"custom_note": "hi", "key_insights": ["a"], "problem_statement": "X"}"#,
        );
        assert_eq!(titles(&sections), vec!["Problem Statement", "Key Insights", "Custom Note"]);
    }

    #[test]
    fn test_unknown_keys_keep_source_order() {
        let sections = route(ReportKind::MarketSize, r#"{"zeta_risk": "z", "alphaRisk": "a"}"#);
        assert_eq!(titles(&sections), vec!["Zeta Risk", "Alpha Risk"]);
    }

    #[test]
    fn test_top_level_nulls_and_denylist_are_skipped() {
        let sections = route(
            ReportKind::CompetitorAnalysis,
            r#"{"final_report": null, "rawContent": "dup", "_raw_content": "dup", "extra": null, "note": "kept"}"#,
        );
        assert_eq!(titles(&sections), vec!["Note"]);
    }

    #[test]
    fn test_nested_nulls_are_rendered() {
        let sections = route(ReportKind::Validation, r#"{"details": {"a": null}}"#);
        assert_eq!(
            sections[0].blocks,
            vec![Block::node(DisplayNode::KeyedGroup(vec![(
                "A".into(),
                DisplayNode::Text("null".into())
            )]))]
        );
    }

    #[test]
    fn test_raw_text_is_one_paragraph() {
        let sections = route(ReportKind::Validation, "not json at all");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].blocks, vec![Block::node(DisplayNode::Text("not json at all".into()))]);
    }

    #[test]
    fn test_heading_sections_are_numbered_and_formatted() {
        let sections = route(
            ReportKind::MarketSize,
            "## 1. Market Size Estimates\nTAM is **$4B**\n\n## 7. Key Insights & Next Steps\n- one\n- two",
        );
        assert_eq!(titles(&sections), vec!["1. Market Size Estimates", "7. Key Insights & Next Steps"]);
        assert_eq!(sections[0].blocks, vec![Block::node(DisplayNode::Text("TAM is $4B".into()))]);
        assert_eq!(
            sections[1].blocks,
            vec![Block::node(DisplayNode::BulletList(vec![
                DisplayNode::Text("one".into()),
                DisplayNode::Text("two".into()),
            ]))]
        );
    }

    #[test]
    fn test_non_mapping_json_gets_one_section() {
        let sections = route(ReportKind::CompetitorAnalysis, r#"["Acme", "Globex"]"#);
        assert_eq!(titles(&sections), vec!["Competitor Analysis"]);
    }

    #[test]
    fn test_empty_object_has_no_sections() {
        assert!(route(ReportKind::MarketSize, "{}").is_empty());
    }

    #[test]
    fn test_routing_is_repeatable() {
        let text = r#"{"metric_scoring": {"a": 7, "average": 7, "decision": "Pivot"}, "x": [1, {"y": 2}]}"#;
        assert_eq!(route(ReportKind::MarketSize, text), route(ReportKind::MarketSize, text));
    }
}
