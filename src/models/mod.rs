pub mod envelope;
pub mod input;
pub mod report;
pub mod value;

pub use envelope::*;
pub use input::StartupIdeaInput;
pub use report::*;
pub use value::{ReportValue, Scalar};
