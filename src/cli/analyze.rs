use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::commands::{AnalyzeArgs, GlobalOptions};
use crate::config::resolve::{API_KEY_ENV, DB_PATH_ENV};
use crate::config::{load_config, resolve_api_key_with, resolve_db_path, AnalysisSettings, IdeaConfig, OutputFormat};
use crate::db::Database;
use crate::errors::IdeaError;
use crate::keystore::ApiKeyStore;
use crate::llm::create_provider;
use crate::models::{ReportKind, StartupIdeaInput};
use crate::output::{render_markdown_view, render_view, write_reports, AnalysisProgress};
use crate::pipeline::{Submission, SubmissionOutcome};
use crate::prompts::PromptLoader;
use crate::reporting::{build_view, ReportView};
use crate::utils::formatting::format_duration;

pub async fn handle_analyze(args: AnalyzeArgs, globals: &GlobalOptions) -> Result<(), IdeaError> {
    let input = StartupIdeaInput::new(args.idea.clone(), args.problem.clone())
        .with_target_audience(args.audience.clone())
        .with_additional_context(args.context.clone());
    input.validate()?;

    let config = load_config(globals.config.as_deref()).await?;
    let settings = AnalysisSettings::resolve(&config, args.model.as_deref(), args.partial);

    let (api_key, source) = resolve_api_key_with(
        args.api_key.as_deref(),
        std::env::var(API_KEY_ENV).ok(),
        &config,
        || {
            let db = Database::new(&resolve_db_path(std::env::var(DB_PATH_ENV).ok(), &config))?;
            Ok(ApiKeyStore::load(db)?.api_key().map(str::to_string))
        },
    )?
    .ok_or_else(|| {
        IdeaError::Authentication(format!(
            "No API key configured. Run `ideascope key set <KEY>`, set {}, or pass --api-key",
            API_KEY_ENV
        ))
    })?;
    debug!(source = source.as_str(), "Resolved API key");

    let provider = create_provider(
        &settings.provider,
        &api_key,
        Some(&settings.model),
        settings.base_url.as_deref(),
        settings.params.clone(),
    )?;
    info!(provider = %settings.provider, model = %settings.model, "Starting analysis");

    let format = if args.json {
        OutputFormat::Json
    } else {
        config.output.as_ref().and_then(|o| o.format).unwrap_or_default()
    };
    let show_progress = !globals.quiet && format == OutputFormat::Terminal;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let submission = Submission::new(Arc::from(provider), PromptLoader::new(settings.prompts_dir.clone()))
        .with_retry(settings.retry.clone())
        .with_policy(settings.policy)
        .with_events(tx);

    let progress_task = tokio::spawn(async move {
        let mut progress = show_progress.then(AnalysisProgress::new);
        while let Some(event) = rx.recv().await {
            if let Some(p) = progress.as_mut() {
                p.handle_event(&event);
            }
        }
        if let Some(p) = progress {
            p.finish();
        }
    });

    let outcome = submission.run(&input).await;
    // Dropping the submission closes the event channel.
    drop(submission);
    let _ = progress_task.await;
    let outcome = outcome?;

    if let Some(message) = outcome.user_message() {
        eprintln!("\n  {} {}", style("✗").red().bold(), style(message).red());
        for failure in &outcome.failures {
            eprintln!(
                "    {} {}",
                style(format!("{}:", failure.kind.display_name())).dim(),
                style(&failure.message).dim()
            );
        }
    }

    print_outcome(&outcome, format);

    if let Some(dir) = output_dir(&args, &config) {
        let written = write_reports(&dir, &outcome.reports).await?;
        if !globals.quiet {
            eprintln!(
                "\n  {} Saved {} files to {}",
                style("✓").green(),
                written.len(),
                style(dir.display()).cyan()
            );
        }
    }

    if !globals.quiet && format == OutputFormat::Terminal {
        eprintln!(
            "\n  {} {}",
            style("Completed in").dim(),
            style(format_duration(outcome.elapsed_ms)).white()
        );
    }

    Ok(())
}

fn output_dir(args: &AnalyzeArgs, config: &IdeaConfig) -> Option<PathBuf> {
    args.output
        .clone()
        .or_else(|| config.output.as_ref().and_then(|o| o.directory.as_ref()).map(PathBuf::from))
}

fn views(outcome: &SubmissionOutcome) -> Vec<(ReportKind, ReportView)> {
    ReportKind::ALL
        .iter()
        .map(|&kind| (kind, build_view(kind, outcome.reports.get(kind))))
        .collect()
}

fn print_outcome(outcome: &SubmissionOutcome, format: OutputFormat) {
    let views = views(outcome);
    match format {
        OutputFormat::Terminal => {
            for (kind, view) in &views {
                print!("{}", render_view(*kind, view));
            }
        }
        OutputFormat::Markdown => {
            for (kind, view) in &views {
                println!("{}", render_markdown_view(*kind, view));
            }
        }
        OutputFormat::Json => println!("{}", outcome_json(outcome, &views)),
    }
}

/// Machine-readable summary: submission metadata plus one view per kind.
pub fn outcome_json(outcome: &SubmissionOutcome, views: &[(ReportKind, ReportView)]) -> serde_json::Value {
    let reports: serde_json::Map<String, serde_json::Value> = views
        .iter()
        .map(|(kind, view)| {
            (
                kind.as_str().to_string(),
                serde_json::to_value(view).unwrap_or(serde_json::Value::Null),
            )
        })
        .collect();

    serde_json::json!({
        "id": outcome.id,
        "policy": outcome.policy,
        "elapsed_ms": outcome.elapsed_ms,
        "message": outcome.user_message(),
        "failures": outcome.failures,
        "reports": reports,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ReportPayload, ReportSet};
    use crate::pipeline::{KindFailure, SubmissionPolicy};

    fn outcome(reports: ReportSet, failures: Vec<KindFailure>) -> SubmissionOutcome {
        SubmissionOutcome {
            id: "sub-1".into(),
            reports,
            failures,
            policy: SubmissionPolicy::AllOrNothing,
            elapsed_ms: 42,
        }
    }

    #[test]
    fn test_outcome_json_all_ready() {
        let mut reports = ReportSet::default();
        let raw = serde_json::json!({
            "model": "sonar-pro",
            "choices": [{"message": {"content": "{\"problem_statement\": \"Keys\"}"}}]
        })
        .to_string();
        for kind in ReportKind::ALL {
            reports.set(kind, ReportPayload::new(raw.clone()));
        }
        let o = outcome(reports, Vec::new());
        let json = outcome_json(&o, &views(&o));

        assert_eq!(json["id"], "sub-1");
        assert!(json["message"].is_null());
        assert_eq!(json["reports"]["validation"]["state"], "ready");
        assert_eq!(
            json["reports"]["market-size"]["decoded"]["source"],
            "direct-json"
        );
    }

    #[test]
    fn test_outcome_json_with_failure() {
        let o = outcome(
            ReportSet::placeholders(),
            vec![KindFailure {
                kind: ReportKind::Validation,
                error_type: "AuthenticationError",
                message: "bad key".into(),
            }],
        );
        let json = outcome_json(&o, &views(&o));

        assert_eq!(json["failures"][0]["kind"], "validation");
        assert_eq!(json["reports"]["competitor-analysis"]["state"], "unavailable");
        assert!(json["message"].as_str().unwrap().contains("check your API key"));
    }

    #[test]
    fn test_output_dir_prefers_flag() {
        let args = AnalyzeArgs {
            idea: "i".into(),
            problem: "p".into(),
            audience: None,
            context: None,
            api_key: None,
            model: None,
            partial: false,
            json: false,
            output: Some(PathBuf::from("/tmp/flag")),
        };
        let config = IdeaConfig {
            output: Some(crate::config::OutputConfig { directory: Some("/tmp/cfg".into()), format: None }),
            ..Default::default()
        };
        assert_eq!(output_dir(&args, &config), Some(PathBuf::from("/tmp/flag")));
        let args = AnalyzeArgs { output: None, ..args };
        assert_eq!(output_dir(&args, &config), Some(PathBuf::from("/tmp/cfg")));
    }
}
