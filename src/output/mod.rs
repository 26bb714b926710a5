pub mod markdown;
pub mod progress;
pub mod terminal;

pub use markdown::{render_markdown_view, write_reports};
pub use progress::AnalysisProgress;
pub use terminal::{render_version, render_view};
