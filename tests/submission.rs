use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use ideascope::errors::{IdeaError, RetryConfig};
use ideascope::llm::{LLMProvider, LLMResponse};
use ideascope::models::{ReportKind, ReportPayload, StartupIdeaInput};
use ideascope::pipeline::{Submission, SubmissionPolicy, SUBMISSION_FAILED_MESSAGE};
use ideascope::prompts::PromptLoader;
use ideascope::reporting::{build_view, ReportView};
use serde_json::json;

/// Answers by report kind, recognised from the system prompt.
struct ScriptedProvider {
    fail: Option<&'static str>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    fn new(fail: Option<&'static str>) -> Self {
        Self { fail, calls: AtomicUsize::new(0) }
    }
}

fn kind_marker(system: &str) -> &'static str {
    if system.contains("validate startup ideas") {
        "validation"
    } else if system.contains("market opportunities") {
        "market"
    } else {
        "competitors"
    }
}

#[async_trait]
impl LLMProvider for ScriptedProvider {
    async fn complete(&self, system: &str, _prompt: &str) -> Result<LLMResponse, IdeaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let marker = kind_marker(system);
        if self.fail == Some(marker) {
            return Err(IdeaError::Authentication("401 Unauthorized".into()));
        }
        let body = json!({
            "model": "sonar-pro",
            "usage": {"total_tokens": 10},
            "choices": [{"message": {"content": format!("{{\"summary\": \"{}\"}}", marker)}}]
        });
        Ok(LLMResponse {
            raw_body: body.to_string(),
            model: "sonar-pro".into(),
            total_tokens: Some(10),
        })
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "sonar-pro"
    }
}

fn input() -> StartupIdeaInput {
    StartupIdeaInput::new("A bluetooth key tag", "People lose their keys")
}

#[tokio::test]
async fn test_all_reports_succeed() {
    let provider = Arc::new(ScriptedProvider::new(None));
    let outcome = Submission::new(provider.clone(), PromptLoader::default())
        .run(&input())
        .await
        .unwrap();

    assert!(outcome.is_success());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    for kind in ReportKind::ALL {
        assert!(build_view(kind, outcome.reports.get(kind)).is_ready(), "{}", kind);
    }
}

#[tokio::test]
async fn test_one_failure_replaces_every_report() {
    let provider = Arc::new(ScriptedProvider::new(Some("validation")));
    let outcome = Submission::new(provider, PromptLoader::default())
        .with_retry(RetryConfig::none())
        .run(&input())
        .await
        .unwrap();

    assert_eq!(outcome.user_message(), Some(SUBMISSION_FAILED_MESSAGE));
    assert_eq!(outcome.failures.len(), 1);
    assert!(outcome.failed(ReportKind::Validation));
    for kind in ReportKind::ALL {
        assert_eq!(outcome.reports.get(kind), &ReportPayload::placeholder(kind));
        assert!(matches!(
            build_view(kind, outcome.reports.get(kind)),
            ReportView::Unavailable { .. }
        ));
    }
}

#[tokio::test]
async fn test_partial_success_keeps_other_reports() {
    let provider = Arc::new(ScriptedProvider::new(Some("market")));
    let outcome = Submission::new(provider, PromptLoader::default())
        .with_policy(SubmissionPolicy::PartialSuccess)
        .run(&input())
        .await
        .unwrap();

    assert!(!outcome.is_success());
    assert!(build_view(ReportKind::Validation, outcome.reports.get(ReportKind::Validation)).is_ready());
    assert!(build_view(ReportKind::CompetitorAnalysis, outcome.reports.get(ReportKind::CompetitorAnalysis)).is_ready());
    assert_eq!(
        outcome.reports.get(ReportKind::MarketSize),
        &ReportPayload::placeholder(ReportKind::MarketSize)
    );
}

#[tokio::test]
async fn test_invalid_input_makes_no_calls() {
    let provider = Arc::new(ScriptedProvider::new(None));
    let result = Submission::new(provider.clone(), PromptLoader::default())
        .run(&StartupIdeaInput::new("  ", "People lose their keys"))
        .await;

    assert!(matches!(result, Err(IdeaError::InvalidInput(_))));
    assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
}
