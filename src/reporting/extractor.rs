use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::models::{ReportKind, ReportValue};
use super::profile::profile_for;

/// How a [`DecodedReport`] was recovered from the assistant text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExtractionSource {
    #[serde(rename = "direct-json")]
    DirectJson,
    #[serde(rename = "fenced-json")]
    FencedJson,
    #[serde(rename = "sections")]
    Sections,
    #[serde(rename = "raw-text")]
    RawText,
}

impl ExtractionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectJson => "direct-json",
            Self::FencedJson => "fenced-json",
            Self::Sections => "sections",
            Self::RawText => "raw-text",
        }
    }
}

impl std::fmt::Display for ExtractionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key under which unparseable text is carried.
pub const RAW_CONTENT_KEY: &str = "rawContent";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedReport {
    pub source: ExtractionSource,
    pub value: ReportValue,
}

impl DecodedReport {
    /// The fallback text, when nothing structured could be recovered.
    pub fn raw_content(&self) -> Option<&str> {
        match self.source {
            ExtractionSource::RawText => self.value.get(RAW_CONTENT_KEY)?.as_str(),
            _ => None,
        }
    }
}

/// One parsing strategy. Each either yields a value or declines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    DirectJson,
    FencedJson,
    Sections,
}

impl Strategy {
    /// Attempted in this order; the first success wins.
    const ORDER: [Strategy; 3] = [Strategy::DirectJson, Strategy::FencedJson, Strategy::Sections];

    fn source(self) -> ExtractionSource {
        match self {
            Strategy::DirectJson => ExtractionSource::DirectJson,
            Strategy::FencedJson => ExtractionSource::FencedJson,
            Strategy::Sections => ExtractionSource::Sections,
        }
    }

    fn attempt(self, text: &str, kind: ReportKind) -> Option<ReportValue> {
        match self {
            Strategy::DirectJson => parse_json(text.trim()),
            Strategy::FencedJson => parse_fenced(text),
            Strategy::Sections => parse_sections(text, kind),
        }
    }
}

/// Recover a structured report from free-form assistant text.
///
/// Never fails: when no strategy applies, the original text is returned under
/// [`RAW_CONTENT_KEY`].
pub fn extract(text: &str, kind: ReportKind) -> DecodedReport {
    let decoded = Strategy::ORDER.iter().find_map(|strategy| {
        let value = strategy.attempt(text, kind);
        debug!(
            kind = %kind,
            strategy = ?strategy,
            matched = value.is_some(),
            "Extraction strategy attempted"
        );
        value.map(|value| DecodedReport { source: strategy.source(), value })
    });

    decoded.unwrap_or_else(|| DecodedReport {
        source: ExtractionSource::RawText,
        value: ReportValue::Mapping(vec![(RAW_CONTENT_KEY.to_string(), ReportValue::text(text))]),
    })
}

fn parse_json(candidate: &str) -> Option<ReportValue> {
    serde_json::from_str::<Value>(candidate).ok().map(ReportValue::from)
}

/// Fences that open and close on their own lines.
static LINE_FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^[ \t]*```[\w-]*[ \t]*\r?\n(.*?)^[ \t]*```[ \t]*\r?$")
        .expect("line fence pattern is valid")
});

static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("fence pattern is valid")
});

/// First fenced block whose body parses as JSON. Line-anchored fences are
/// tried first so a stray inline ``` cannot swallow a real opener.
fn parse_fenced(text: &str) -> Option<ReportValue> {
    [&*LINE_FENCE_RE, &*FENCE_RE].into_iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|body| parse_json(body.as_str()))
    })
}

static NUMBERED_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*##[ \t]*\d+\.").expect("heading pattern is valid")
});

/// Slice the text between the numbered headings a report kind's prompt asks
/// for. Sections whose heading is missing are left out; declines when none
/// are present.
fn parse_sections(text: &str, kind: ReportKind) -> Option<ReportValue> {
    let heading_starts: Vec<usize> = NUMBERED_HEADING_RE
        .find_iter(text)
        .map(|m| m.start())
        .collect();
    if heading_starts.is_empty() {
        return None;
    }

    let mut sections = Vec::new();
    for (number, heading) in profile_for(kind).headings.iter().enumerate() {
        let pattern = format!(
            r"(?im)^[ \t]*##[ \t]*{}\.[ \t]*{}",
            number + 1,
            regex::escape(heading.title)
        );
        let Ok(re) = Regex::new(&pattern) else { continue };
        let Some(found) = re.find(text) else { continue };

        // Body starts after the heading line and stops at the next numbered heading.
        let body_start = text[found.end()..]
            .find('\n')
            .map(|i| found.end() + i + 1)
            .unwrap_or(text.len());
        let body_end = heading_starts
            .iter()
            .copied()
            .find(|&start| start > found.start())
            .unwrap_or(text.len())
            .max(body_start);

        sections.push((
            heading.key.to_string(),
            ReportValue::text(text[body_start..body_end].trim()),
        ));
    }

    if sections.is_empty() {
        None
    } else {
        Some(ReportValue::Mapping(sections))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_json_object() {
        let decoded = extract(r#"{"problem_statement":"X"}"#, ReportKind::Validation);
        assert_eq!(decoded.source, ExtractionSource::DirectJson);
        assert_eq!(decoded.value, ReportValue::from(json!({"problem_statement": "X"})));
    }

    #[test]
    fn test_direct_json_any_value() {
        for text in ["42", "[1, 2]", "\"quoted\"", "null", "  {\"a\": true}\n"] {
            let decoded = extract(text, ReportKind::MarketSize);
            assert_eq!(decoded.source, ExtractionSource::DirectJson, "input {:?}", text);
            let expected: Value = serde_json::from_str(text.trim()).unwrap();
            assert_eq!(decoded.value, ReportValue::from(expected));
        }
    }

    #[test]
    fn test_fenced_json_with_tag() {
        let text = "Intro\n```json\n{\"key_insights\":[\"a\",\"b\"]}\n```\nOutro";
        let decoded = extract(text, ReportKind::MarketSize);
        assert_eq!(decoded.source, ExtractionSource::FencedJson);
        assert_eq!(decoded.value, ReportValue::from(json!({"key_insights": ["a", "b"]})));
    }

    #[test]
    fn test_fenced_json_without_tag() {
        let text = "Here you go:\n```\n{\"a\": 1}\n```";
        let decoded = extract(text, ReportKind::Validation);
        assert_eq!(decoded.source, ExtractionSource::FencedJson);
        assert_eq!(decoded.value.get("a"), Some(&ReportValue::from(json!(1))));
    }

    #[test]
    fn test_fenced_skips_non_json_block() {
        let text = "```bash\nls -la\n```\nthen\n```json\n{\"ok\": true}\n```";
        let decoded = extract(text, ReportKind::Validation);
        assert_eq!(decoded.source, ExtractionSource::FencedJson);
        assert_eq!(decoded.value, ReportValue::from(json!({"ok": true})));
    }

    #[test]
    fn test_inline_backticks_do_not_swallow_fence() {
        let text = "Wrap code in ``` marks.\n```json\n{\"ok\": true}\n```\nDone";
        let decoded = extract(text, ReportKind::Validation);
        assert_eq!(decoded.source, ExtractionSource::FencedJson);
        assert_eq!(decoded.value, ReportValue::from(json!({"ok": true})));
    }

    #[test]
    fn test_inline_fence_still_recognized() {
        let decoded = extract("Result: ```json {\"a\": 1}```", ReportKind::Validation);
        assert_eq!(decoded.source, ExtractionSource::FencedJson);
        assert_eq!(decoded.value, ReportValue::from(json!({"a": 1})));
    }

    #[test]
    fn test_raw_text_fallback() {
        let decoded = extract("not json at all", ReportKind::Validation);
        assert_eq!(decoded.source, ExtractionSource::RawText);
        assert_eq!(decoded.value, ReportValue::from(json!({"rawContent": "not json at all"})));
        assert_eq!(decoded.raw_content(), Some("not json at all"));
    }

    #[test]
    fn test_broken_fence_falls_through_to_raw() {
        let text = "```json\n{\"unterminated\": \n```";
        let decoded = extract(text, ReportKind::CompetitorAnalysis);
        assert_eq!(decoded.source, ExtractionSource::RawText);
        assert_eq!(decoded.raw_content(), Some(text));
    }

    #[test]
    fn test_market_size_sections() {
        let text = "Preamble\n\
            ## 1. Market Size Estimates\nTAM is **$4B**\n- SAM $1B\n\n\
            ## 2. Market Growth & Trend Analysis\nGrowing 12% a year\n\
            ## 6. Metric Scoring (0-10 with justification)\nTAM Score - 8\n\
            ## 7. Key Insights & Next Steps\n- Insight one\n";
        let decoded = extract(text, ReportKind::MarketSize);
        assert_eq!(decoded.source, ExtractionSource::Sections);

        let keys: Vec<&str> = decoded.value.as_mapping().unwrap().iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["market_size_estimates", "market_growth", "metric_scoring", "key_insights"]);
        assert_eq!(
            decoded.value.get("market_size_estimates").and_then(|v| v.as_str()),
            Some("TAM is **$4B**\n- SAM $1B")
        );
        assert_eq!(decoded.value.get("market_growth").and_then(|v| v.as_str()), Some("Growing 12% a year"));
        assert_eq!(decoded.value.get("metric_scoring").and_then(|v| v.as_str()), Some("TAM Score - 8"));
        assert_eq!(decoded.value.get("key_insights").and_then(|v| v.as_str()), Some("- Insight one"));
    }

    #[test]
    fn test_section_headings_case_insensitive() {
        let text = "## 1. top competitors\nAcme\n## 2. WEBSITE ANALYSIS\nClean site";
        let decoded = extract(text, ReportKind::CompetitorAnalysis);
        assert_eq!(decoded.source, ExtractionSource::Sections);
        assert_eq!(decoded.value.get("top_competitors").and_then(|v| v.as_str()), Some("Acme"));
        assert_eq!(decoded.value.get("website_analysis").and_then(|v| v.as_str()), Some("Clean site"));
    }

    #[test]
    fn test_unrecognized_headings_are_raw_text() {
        let text = "## 1. Something Else\nbody\n## 2. Another\nmore";
        let decoded = extract(text, ReportKind::MarketSize);
        assert_eq!(decoded.source, ExtractionSource::RawText);
    }

    #[test]
    fn test_extraction_is_repeatable() {
        let text = "## 1. Problem Statement\nPeople lose keys\n## 4. Final Decision\nProceed";
        assert_eq!(extract(text, ReportKind::Validation), extract(text, ReportKind::Validation));
    }

    #[test]
    fn test_source_serializes_to_tag() {
        assert_eq!(serde_json::to_string(&ExtractionSource::FencedJson).unwrap(), "\"fenced-json\"");
        assert_eq!(ExtractionSource::RawText.to_string(), "raw-text");
    }
}
