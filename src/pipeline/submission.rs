use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use crate::errors::{with_retry, IdeaError, RetryConfig};
use crate::llm::LLMProvider;
use crate::models::{ReportKind, ReportPayload, ReportSet, StartupIdeaInput};
use crate::prompts::{PromptLoader, PromptPair, PromptVariables};

/// Shown whenever a submission had to fall back to placeholders.
pub const SUBMISSION_FAILED_MESSAGE: &str =
    "There was an error analyzing your startup idea. Please check your API key and try again.";

/// What happens to the successful reports when one of the three calls fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionPolicy {
    /// Any failure replaces all three reports with placeholders.
    #[default]
    AllOrNothing,
    /// Only failed kinds get a placeholder.
    PartialSuccess,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindFailure {
    pub kind: ReportKind,
    pub error_type: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub id: String,
    pub reports: ReportSet,
    pub failures: Vec<KindFailure>,
    pub policy: SubmissionPolicy,
    pub elapsed_ms: u64,
}

impl SubmissionOutcome {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// The alert for the user, if anything failed.
    pub fn user_message(&self) -> Option<&'static str> {
        (!self.is_success()).then_some(SUBMISSION_FAILED_MESSAGE)
    }

    pub fn failed(&self, kind: ReportKind) -> bool {
        self.failures.iter().any(|f| f.kind == kind)
    }
}

/// Progress notifications emitted while a submission runs.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionEvent {
    Started { kind: ReportKind },
    Completed { kind: ReportKind, total_tokens: Option<u64> },
    Failed { kind: ReportKind, error: String },
}

/// Issues the three analysis requests for one idea and joins them.
pub struct Submission {
    llm: Arc<dyn LLMProvider>,
    prompts: PromptLoader,
    retry: RetryConfig,
    policy: SubmissionPolicy,
    events: Option<UnboundedSender<SubmissionEvent>>,
}

impl Submission {
    pub fn new(llm: Arc<dyn LLMProvider>, prompts: PromptLoader) -> Self {
        Self {
            llm,
            prompts,
            retry: RetryConfig::default(),
            policy: SubmissionPolicy::default(),
            events: None,
        }
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_policy(mut self, policy: SubmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_events(mut self, tx: UnboundedSender<SubmissionEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, event: SubmissionEvent) {
        if let Some(tx) = &self.events {
            // A closed receiver only means nobody is watching.
            let _ = tx.send(event);
        }
    }

    /// Validate the input, then run all three requests concurrently and wait
    /// for every one of them. Transport failures never surface as `Err`;
    /// they become placeholders according to the policy.
    pub async fn run(&self, input: &StartupIdeaInput) -> Result<SubmissionOutcome, IdeaError> {
        input.validate()?;

        let vars = PromptVariables::from_input(input);
        let prompts: Vec<(ReportKind, PromptPair)> = ReportKind::ALL
            .iter()
            .map(|&kind| self.prompts.build(kind, &vars).map(|pair| (kind, pair)))
            .collect::<Result<_, IdeaError>>()?;

        let id = uuid::Uuid::new_v4().to_string();
        info!(
            submission_id = %id,
            provider = self.llm.provider_name(),
            model = self.llm.model_name(),
            policy = ?self.policy,
            "Submitting startup idea for analysis"
        );
        let started = Instant::now();

        let calls = prompts.iter().map(|(kind, pair)| {
            let llm = Arc::clone(&self.llm);
            self.emit(SubmissionEvent::Started { kind: *kind });
            async move {
                let result = with_retry(kind.as_str(), &self.retry, || {
                    let llm = Arc::clone(&llm);
                    async move { llm.complete(&pair.system, &pair.user).await }
                })
                .await;
                match &result {
                    Ok(response) => self.emit(SubmissionEvent::Completed {
                        kind: *kind,
                        total_tokens: response.total_tokens,
                    }),
                    Err(e) => self.emit(SubmissionEvent::Failed { kind: *kind, error: e.to_string() }),
                }
                (*kind, result)
            }
        });
        let results = futures::future::join_all(calls).await;

        let mut reports = ReportSet::default();
        let mut failures = Vec::new();
        for (kind, result) in results {
            match result {
                Ok(response) => {
                    info!(kind = %kind, total_tokens = response.total_tokens, "Report received");
                    reports.set(kind, ReportPayload::new(response.raw_body));
                }
                Err(e) => {
                    warn!(kind = %kind, error = %e, "Report request failed");
                    failures.push(KindFailure {
                        kind,
                        error_type: e.classify().error_type,
                        message: e.to_string(),
                    });
                    reports.set(kind, ReportPayload::placeholder(kind));
                }
            }
        }

        if !failures.is_empty() && self.policy == SubmissionPolicy::AllOrNothing {
            reports = ReportSet::placeholders();
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(submission_id = %id, failed = failures.len(), elapsed_ms, "Submission complete");

        Ok(SubmissionOutcome {
            id,
            reports,
            failures,
            policy: self.policy,
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_message() {
        let mut outcome = SubmissionOutcome {
            id: "test".into(),
            reports: ReportSet::default(),
            failures: Vec::new(),
            policy: SubmissionPolicy::AllOrNothing,
            elapsed_ms: 0,
        };
        assert_eq!(outcome.user_message(), None);

        outcome.failures.push(KindFailure {
            kind: ReportKind::MarketSize,
            error_type: "NetworkError",
            message: "down".into(),
        });
        assert_eq!(outcome.user_message(), Some(SUBMISSION_FAILED_MESSAGE));
        assert!(outcome.failed(ReportKind::MarketSize));
        assert!(!outcome.failed(ReportKind::Validation));
    }

    #[test]
    fn test_default_policy_is_all_or_nothing() {
        assert_eq!(SubmissionPolicy::default(), SubmissionPolicy::AllOrNothing);
    }
}
