use clap::Parser;
use tracing_subscriber::EnvFilter;

use ideascope::cli::{self, Commands};
use ideascope::errors::IdeaError;
use ideascope::output::render_version;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    if cli.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(!cli.no_color)
            .with_writer(std::io::stderr)
            .init();
    }

    let globals = cli.globals();
    let result = match cli.command {
        Commands::Analyze(args) => cli::analyze::handle_analyze(args, &globals).await,
        Commands::Key(args) => cli::key::handle_key(args, &globals).await,
        Commands::Render(args) => cli::render::handle_render(args).await,
        Commands::CheckConfig(args) => cli::check_config::handle_check_config(args).await,
        Commands::Version => {
            print!("{}", render_version());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        let exit_code = match &e {
            IdeaError::Config(_) => 2,
            IdeaError::Authentication(_) => 4,
            IdeaError::InvalidInput(_) => 5,
            _ => 1,
        };
        std::process::exit(exit_code);
    }
}
