use console::style;

use crate::cli::commands::CheckConfigArgs;
use crate::config::{parse_config, AnalysisSettings};
use crate::errors::IdeaError;

pub async fn handle_check_config(args: CheckConfigArgs) -> Result<(), IdeaError> {
    let config = parse_config(&args.file).await?;
    let settings = AnalysisSettings::resolve(&config, None, false);

    println!("  {} Configuration is valid: {}", style("✓").green(), args.file.display());
    println!("  {} {}", style("Provider:").dim(), settings.provider);
    println!("  {} {}", style("Model:").dim(), settings.model);
    println!("  {} {:?}", style("Policy:").dim(), settings.policy);
    Ok(())
}
