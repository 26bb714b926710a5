pub mod loader;

pub use loader::{PromptLoader, PromptPair, PromptVariables};
