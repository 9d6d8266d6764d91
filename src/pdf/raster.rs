use super::SourceDocument;
use crate::error::ExtractError;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::sync::OnceLock;

/// Resolution of exported page images.
pub const RENDER_DPI: f32 = 300.0;

/// PDF user space is 1/72 inch per unit.
pub const PDF_UNITS_PER_INCH: f32 = 72.0;

/// Scale factor that takes a page from PDF units to `dpi`
pub fn scale_for_dpi(dpi: f32) -> f32 {
    dpi / PDF_UNITS_PER_INCH
}

/// Turns pages of a source document into pixels.
pub trait Rasterizer: Send + Sync {
    /// Load `source` once; the returned pages are rendered from that load
    fn open<'a>(
        &'a self,
        source: &'a SourceDocument,
    ) -> Result<Box<dyn PageRasterizer + 'a>, ExtractError>;
}

/// A source document loaded by a [`Rasterizer`] for the length of one run.
pub trait PageRasterizer {
    /// Render a 1-indexed page at `scale` times its native size
    fn rasterize(&mut self, page: u32, scale: f32) -> Result<RgbImage, ExtractError>;
}

/// Rasterizer backed by the PDFium library (dynamically linked).
///
/// The library is bound on first use, so runs that only assemble PDFs never
/// need it installed. Searches for libpdfium in:
/// 1. Current directory (./libpdfium.so)
/// 2. vendor/pdfium/lib/
/// 3. System library paths
#[derive(Default)]
pub struct PdfiumRasterizer {
    pdfium: OnceLock<Pdfium>,
}

impl PdfiumRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    fn bind() -> Result<Pdfium, PdfiumError> {
        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(
                    "./vendor/pdfium/lib/",
                ))
            })
            .or_else(|_| Pdfium::bind_to_system_library())?;
        Ok(Pdfium::new(bindings))
    }

    fn pdfium(&self) -> Result<&Pdfium, PdfiumError> {
        if let Some(pdfium) = self.pdfium.get() {
            return Ok(pdfium);
        }
        let pdfium = Self::bind()?;
        log::debug!("Bound PDFium library");
        Ok(self.pdfium.get_or_init(|| pdfium))
    }
}

impl Rasterizer for PdfiumRasterizer {
    fn open<'a>(
        &'a self,
        source: &'a SourceDocument,
    ) -> Result<Box<dyn PageRasterizer + 'a>, ExtractError> {
        let fail = |reason: String| ExtractError::DocumentOpen {
            path: source.path().to_path_buf(),
            reason,
        };
        let pdfium = self
            .pdfium()
            .map_err(|e| fail(format!("Failed to load PDFium library: {:?}", e)))?;
        let document = pdfium
            .load_pdf_from_byte_slice(source.bytes(), None)
            .map_err(|e| fail(format!("PDFium could not load the document: {:?}", e)))?;
        Ok(Box::new(PdfiumPages { document }))
    }
}

struct PdfiumPages<'a> {
    document: PdfDocument<'a>,
}

impl PageRasterizer for PdfiumPages<'_> {
    fn rasterize(&mut self, page: u32, scale: f32) -> Result<RgbImage, ExtractError> {
        let fail = |e: PdfiumError| ExtractError::page(page, format!("{:?}", e));

        let index = (page - 1)
            .try_into()
            .map_err(|_| ExtractError::page(page, "page index out of range for PDFium"))?;
        let pdf_page = self.document.pages().get(index).map_err(fail)?;

        let config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = pdf_page.render_with_config(&config).map_err(fail)?;

        Ok(bitmap.as_image().into_rgb8())
    }
}
