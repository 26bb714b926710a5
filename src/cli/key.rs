use console::style;

use crate::cli::commands::{GlobalOptions, KeyAction, KeyArgs};
use crate::config::resolve::DB_PATH_ENV;
use crate::config::{load_config, resolve_db_path};
use crate::db::Database;
use crate::errors::IdeaError;
use crate::keystore::ApiKeyStore;

pub async fn handle_key(args: KeyArgs, globals: &GlobalOptions) -> Result<(), IdeaError> {
    let config = load_config(globals.config.as_deref()).await?;
    let db = Database::new(&resolve_db_path(std::env::var(DB_PATH_ENV).ok(), &config))?;
    let mut store = ApiKeyStore::load(db)?;
    apply(args.action, &mut store, globals.quiet)
}

fn apply(action: KeyAction, store: &mut ApiKeyStore, quiet: bool) -> Result<(), IdeaError> {
    match action {
        KeyAction::Set { key } => {
            store.save(&key)?;
            if !quiet {
                println!("  {} API key saved", style("✓").green());
            }
        }
        KeyAction::Show => match store.masked() {
            Some(masked) => println!("  {} {}", style("API key:").dim(), masked),
            None => println!("  {}", style("No API key saved.").dim()),
        },
        KeyAction::Clear => {
            store.clear()?;
            if !quiet {
                println!("  {} API key removed", style("✓").green());
            }
        }
    }
    Ok(())
}
