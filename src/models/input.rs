use serde::{Deserialize, Serialize};
use crate::errors::IdeaError;

/// The idea description collected from the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupIdeaInput {
    /// The proposed solution.
    pub idea: String,
    /// The problem the idea addresses.
    pub problem: String,
    pub target_audience: Option<String>,
    pub additional_context: Option<String>,
}

impl StartupIdeaInput {
    pub fn new(idea: impl Into<String>, problem: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            problem: problem.into(),
            ..Default::default()
        }
    }

    pub fn with_target_audience(mut self, audience: Option<String>) -> Self {
        self.target_audience = audience;
        self
    }

    pub fn with_additional_context(mut self, context: Option<String>) -> Self {
        self.additional_context = context;
        self
    }

    /// Both `idea` and `problem` must be non-blank before anything is sent.
    pub fn validate(&self) -> Result<(), IdeaError> {
        if self.idea.trim().is_empty() || self.problem.trim().is_empty() {
            return Err(IdeaError::InvalidInput(
                "Please provide both your idea and the problem it solves.".into(),
            ));
        }
        Ok(())
    }

    pub fn problem_statement(&self) -> &str {
        self.problem.trim()
    }

    pub fn solution(&self) -> &str {
        self.idea.trim()
    }

    pub fn target_audience(&self) -> Option<&str> {
        non_blank(self.target_audience.as_deref())
    }

    pub fn additional_context(&self) -> Option<&str> {
        non_blank(self.additional_context.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
