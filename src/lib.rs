//! Extract a subset of pages from a PDF, either as a new PDF or as one
//! 300 DPI image per page.

pub mod error;
pub mod format;
pub mod page_range;
pub mod pdf;
pub mod pipeline;
pub mod render;
pub mod settings;

pub use error::{ExtractError, RangeError, SettingsError};
pub use format::OutputFormat;
pub use page_range::{parse, PageSet};
pub use pipeline::{ExtractionPipeline, OutputRequest, ProgressEvent, ProgressObserver};
