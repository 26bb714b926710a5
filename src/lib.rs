pub mod cli;
pub mod config;
pub mod db;
pub mod errors;
pub mod keystore;
pub mod llm;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod reporting;
pub mod utils;
