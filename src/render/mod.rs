//! Per-format page output.
//!
//! A run picks one [`PageRenderer`] up front from the requested format and
//! then feeds it pages in ascending order.

pub mod images;

#[cfg(test)]
pub(crate) mod fakes;

pub use images::{render_images, ImageEncoding, ImageRenderer};

use crate::error::ExtractError;
use crate::format::OutputFormat;
use crate::page_range::PageSet;
use crate::pdf::{PdfAssembler, Rasterizer, SourceDocument};
use crate::pipeline::OutputRequest;
use std::path::PathBuf;

pub trait PageRenderer {
    /// Process one 1-indexed page of the source
    fn render_page(&mut self, page: u32) -> Result<(), ExtractError>;

    /// Flush anything still pending and report the files written
    fn finish(self: Box<Self>) -> Result<Vec<PathBuf>, ExtractError>;
}

/// The renderer matching `request`'s format
///
/// Image formats load `source` into `rasterizer` here, once for the run.
pub fn renderer_for<'a>(
    request: &OutputRequest,
    pages: &PageSet,
    source: &'a SourceDocument,
    rasterizer: &'a dyn Rasterizer,
) -> Result<Box<dyn PageRenderer + 'a>, ExtractError> {
    let encoding = match request.format() {
        OutputFormat::Pdf => {
            let dest = request.pdf_output_path(pages);
            return Ok(Box::new(PdfAssembler::new(source, dest)));
        }
        OutputFormat::Jpeg => ImageEncoding::default_jpeg(),
        OutputFormat::Png => ImageEncoding::Png,
    };
    let renderer = ImageRenderer::open(
        source,
        rasterizer,
        request.output_dir(),
        request.stem(),
        encoding,
    )?;
    Ok(Box::new(renderer))
}
