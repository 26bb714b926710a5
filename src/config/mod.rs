pub mod credentials;
pub mod parser;
pub mod resolve;
pub mod schema;
pub mod types;

pub use types::*;
pub use parser::{load_config, parse_config};
pub use resolve::{resolve_api_key, resolve_api_key_with, resolve_db_path, AnalysisSettings, KeySource};
