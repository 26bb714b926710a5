use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::IdeaError;
use crate::models::{ReportKind, StartupIdeaInput};

/// Variables available for template interpolation in prompt files.
#[derive(Debug, Clone, Default)]
pub struct PromptVariables {
    pub problem_statement: String,
    pub solution: String,
    pub target_audience: Option<String>,
    pub additional_context: Option<String>,
}

impl PromptVariables {
    pub fn from_input(input: &StartupIdeaInput) -> Self {
        Self {
            problem_statement: input.problem_statement().to_string(),
            solution: input.solution().to_string(),
            target_audience: input.target_audience().map(str::to_string),
            additional_context: input.additional_context().map(str::to_string),
        }
    }
}

/// The two messages sent for one report kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub system: String,
    pub user: String,
}

const VALIDATION_TEMPLATE: &str = include_str!("../../prompts/validation.txt");
const MARKET_SIZE_TEMPLATE: &str = include_str!("../../prompts/market-size.txt");
const COMPETITOR_TEMPLATE: &str = include_str!("../../prompts/competitor-analysis.txt");

fn system_prompt(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Validation => {
            "You are a business analyst and startup consultant who helps validate startup ideas."
        }
        ReportKind::MarketSize => {
            "You are a business analyst and market research specialist who helps analyze market opportunities for startups."
        }
        ReportKind::CompetitorAnalysis => {
            "You are a business analyst and market research specialist who helps analyze competitive landscapes for startups."
        }
    }
}

fn builtin_template(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Validation => VALIDATION_TEMPLATE,
        ReportKind::MarketSize => MARKET_SIZE_TEMPLATE,
        ReportKind::CompetitorAnalysis => COMPETITOR_TEMPLATE,
    }
}

/// Resolves the user prompt for each report kind. Templates are built in;
/// a `<kind>.txt` file in the override directory replaces the built-in one.
#[derive(Debug, Clone, Default)]
pub struct PromptLoader {
    override_dir: Option<PathBuf>,
}

impl PromptLoader {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = &override_dir {
            debug!(dir = %dir.display(), "PromptLoader using override directory");
        }
        Self { override_dir }
    }

    /// Load the raw template for a report kind.
    pub fn load(&self, kind: ReportKind) -> Result<String, IdeaError> {
        if let Some(path) = self.override_path(kind) {
            if path.exists() {
                debug!(kind = %kind, path = %path.display(), "Loading prompt override");
                return std::fs::read_to_string(&path).map_err(|e| {
                    IdeaError::Prompt(format!("Failed to read prompt {}: {}", path.display(), e))
                });
            }
        }
        Ok(builtin_template(kind).to_string())
    }

    /// Replace {{VARIABLE}} placeholders, then append the optional fields
    /// that were filled in.
    pub fn interpolate(&self, template: &str, vars: &PromptVariables) -> String {
        let mut result = template
            .replace("{{PROBLEM_STATEMENT}}", &vars.problem_statement)
            .replace("{{SOLUTION}}", &vars.solution);

        let extras: [(&str, &Option<String>); 2] = [
            ("Target audience", &vars.target_audience),
            ("Additional context", &vars.additional_context),
        ];
        for (label, value) in extras {
            if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
                result.push_str(&format!("\n\n{}:\n{}", label, value.trim()));
            }
        }

        result
    }

    pub fn build(&self, kind: ReportKind, vars: &PromptVariables) -> Result<PromptPair, IdeaError> {
        let template = self.load(kind)?;
        Ok(PromptPair {
            system: system_prompt(kind).to_string(),
            user: self.interpolate(&template, vars),
        })
    }

    fn override_path(&self, kind: ReportKind) -> Option<PathBuf> {
        self.override_dir
            .as_deref()
            .map(|dir: &Path| dir.join(format!("{}.txt", kind.as_str())))
    }
}
