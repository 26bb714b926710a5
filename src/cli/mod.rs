pub mod analyze;
pub mod check_config;
pub mod commands;
pub mod key;
pub mod render;

pub use commands::{Cli, Commands, GlobalOptions};
