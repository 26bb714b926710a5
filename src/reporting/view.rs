use serde::Serialize;
use tracing::warn;

use crate::models::{ReportKind, ReportPayload, SearchResult};
use super::envelope::decode_envelope;
use super::extractor::{extract, DecodedReport};
use super::layout::Section;
use super::router::route_sections;

/// Envelope fields shown above a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub model: String,
    /// Unix seconds, 0 when the API did not send one.
    pub created: i64,
    pub total_tokens: u64,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedReport {
    pub kind: ReportKind,
    pub metadata: ReportMetadata,
    pub decoded: DecodedReport,
    pub sections: Vec<Section>,
    pub citations: Vec<String>,
    pub search_results: Vec<SearchResult>,
}

/// What a report view shows for one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ReportView {
    /// No report produced yet.
    Pending,
    /// The payload is not a usable envelope.
    Unavailable { reason: String },
    Ready(Box<RenderedReport>),
}

impl ReportView {
    pub fn is_ready(&self) -> bool {
        matches!(self, ReportView::Ready(_))
    }
}

/// Decode, extract and route one payload. Recomputed on every call; a
/// decode failure only affects this report.
pub fn build_view(kind: ReportKind, payload: &ReportPayload) -> ReportView {
    let Some(raw) = payload.raw_report_data.as_deref() else {
        return ReportView::Pending;
    };

    let envelope = match decode_envelope(raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(kind = %kind, error = %e, "Report unavailable");
            return ReportView::Unavailable { reason: e.to_string() };
        }
    };

    let content = envelope.raw_content().unwrap_or_default();
    let decoded = extract(content, kind);
    let sections = route_sections(kind, &decoded);

    ReportView::Ready(Box::new(RenderedReport {
        kind,
        metadata: ReportMetadata {
            model: envelope.model.clone(),
            created: envelope.created,
            total_tokens: envelope.usage.total_tokens,
            id: envelope.id.clone(),
        },
        decoded,
        sections,
        citations: envelope.citations,
        search_results: envelope.search_results,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(content: &str) -> ReportPayload {
        ReportPayload::new(
            json!({
                "id": "r1",
                "model": "sonar-pro",
                "created": 1717000000,
                "usage": {"total_tokens": 42},
                "citations": ["https://example.com"],
                "choices": [{"message": {"role": "assistant", "content": content}}]
            })
            .to_string(),
        )
    }

    #[test]
    fn test_missing_payload_is_pending() {
        assert_eq!(build_view(ReportKind::Validation, &ReportPayload::default()), ReportView::Pending);
    }

    #[test]
    fn test_placeholders_are_unavailable() {
        for kind in ReportKind::ALL {
            let view = build_view(kind, &ReportPayload::placeholder(kind));
            assert!(matches!(view, ReportView::Unavailable { .. }), "{:?}", kind);
            assert!(!view.is_ready());
        }
        let ReportView::Unavailable { reason } =
            build_view(ReportKind::Validation, &ReportPayload::placeholder(ReportKind::Validation))
        else {
            panic!("expected unavailable");
        };
        assert!(reason.contains("Failed to get a valid response from the AI"));
    }

    #[test]
    fn test_ready_view_carries_metadata() {
        let view = build_view(ReportKind::Validation, &payload(r#"{"problem_statement":"X"}"#));
        let ReportView::Ready(report) = view else { panic!("expected ready") };
        assert_eq!(report.metadata.model, "sonar-pro");
        assert_eq!(report.metadata.total_tokens, 42);
        assert_eq!(report.citations, vec!["https://example.com".to_string()]);
        assert_eq!(report.sections[0].title, "Problem Statement");
    }

    #[test]
    fn test_view_is_recomputed_identically() {
        let p = payload("## 1. Problem Statement\nKeys get lost");
        assert_eq!(build_view(ReportKind::Validation, &p), build_view(ReportKind::Validation, &p));
    }
}
