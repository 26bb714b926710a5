pub mod envelope;
pub mod extractor;
pub mod layout;
pub mod profile;
pub mod renderer;
pub mod router;
pub mod view;

pub use envelope::decode_envelope;
pub use extractor::{extract, DecodedReport, ExtractionSource};
pub use layout::{Block, Section};
pub use renderer::{humanize_key, render_value, DisplayNode};
pub use router::route_sections;
pub use view::{build_view, RenderedReport, ReportMetadata, ReportView};
