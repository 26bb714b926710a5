use tracing::debug;

use crate::cli::commands::RenderArgs;
use crate::errors::IdeaError;
use crate::models::ReportPayload;
use crate::output::{render_markdown_view, render_view};
use crate::reporting::build_view;

/// Maximum size of a saved response accepted for rendering.
const MAX_RESPONSE_BYTES: u64 = 16 * 1024 * 1024;

pub async fn handle_render(args: RenderArgs) -> Result<(), IdeaError> {
    let metadata = tokio::fs::metadata(&args.file).await.map_err(|e| {
        IdeaError::InvalidInput(format!("Cannot read {}: {}", args.file.display(), e))
    })?;
    if metadata.len() > MAX_RESPONSE_BYTES {
        return Err(IdeaError::InvalidInput(format!(
            "{} is too large ({} bytes)",
            args.file.display(),
            metadata.len()
        )));
    }

    let raw = tokio::fs::read_to_string(&args.file).await?;
    debug!(path = %args.file.display(), kind = %args.kind, bytes = raw.len(), "Rendering saved response");

    let view = build_view(args.kind, &ReportPayload::new(raw));
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else if args.markdown {
        println!("{}", render_markdown_view(args.kind, &view));
    } else {
        print!("{}", render_view(args.kind, &view));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReportKind;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_render_missing_file() {
        let args = RenderArgs {
            file: PathBuf::from("/nonexistent/response.json"),
            kind: ReportKind::Validation,
            json: false,
            markdown: false,
        };
        assert!(matches!(handle_render(args).await, Err(IdeaError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_render_saved_response() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("validation.json");
        std::fs::write(
            &path,
            r#"{"choices": [{"message": {"content": "{\"problem_statement\": \"Keys\"}"}}]}"#,
        )
        .unwrap();
        let args = RenderArgs { file: path, kind: ReportKind::Validation, json: true, markdown: false };
        handle_render(args).await.unwrap();
    }
}
