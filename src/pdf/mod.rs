pub mod assemble;
pub mod document;
pub mod raster;

#[cfg(test)]
pub(crate) mod fixtures;

pub use assemble::{assemble, PdfAssembler};
pub use document::SourceDocument;
pub use raster::{PageRasterizer, PdfiumRasterizer, Rasterizer};
