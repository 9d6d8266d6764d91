use super::PageRenderer;
use crate::error::ExtractError;
use crate::format::OutputFormat;
use crate::page_range::PageSet;
use crate::pdf::raster::{scale_for_dpi, RENDER_DPI};
use crate::pdf::{PageRasterizer, Rasterizer, SourceDocument};
use crate::pipeline::{file_stem, image_file_name};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageResult, RgbImage};
use std::path::PathBuf;

/// Quality used for JPEG output; the encoder's customary default.
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// How a rasterized page is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageEncoding {
    Jpeg { quality: u8 },
    Png,
}

impl ImageEncoding {
    pub fn default_jpeg() -> Self {
        ImageEncoding::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn format(self) -> OutputFormat {
        match self {
            ImageEncoding::Jpeg { .. } => OutputFormat::Jpeg,
            ImageEncoding::Png => OutputFormat::Png,
        }
    }

    /// Encode into memory
    pub fn encode(self, image: RgbImage) -> ImageResult<Vec<u8>> {
        let image = DynamicImage::ImageRgb8(image);
        let mut bytes = Vec::new();
        match self {
            ImageEncoding::Jpeg { quality } => {
                image.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?
            }
            ImageEncoding::Png => image.write_with_encoder(PngEncoder::new(&mut bytes))?,
        }
        Ok(bytes)
    }
}

/// Writes one image file per page.
///
/// Each page is rasterized and encoded completely in memory before its file
/// is created, so a page that fails leaves nothing behind. Files written for
/// earlier pages are kept.
pub struct ImageRenderer<'a> {
    pages: Box<dyn PageRasterizer + 'a>,
    dest_dir: PathBuf,
    stem: String,
    encoding: ImageEncoding,
    dpi: f32,
    written: Vec<PathBuf>,
}

impl<'a> ImageRenderer<'a> {
    /// Load `source` into `rasterizer`; every page is rendered from that load
    pub fn open<P: Into<PathBuf>, S: Into<String>>(
        source: &'a SourceDocument,
        rasterizer: &'a dyn Rasterizer,
        dest_dir: P,
        stem: S,
        encoding: ImageEncoding,
    ) -> Result<Self, ExtractError> {
        Ok(ImageRenderer {
            pages: rasterizer.open(source)?,
            dest_dir: dest_dir.into(),
            stem: stem.into(),
            encoding,
            dpi: RENDER_DPI,
            written: Vec::new(),
        })
    }

    /// Rasterize, encode and write a single page
    pub fn render(&mut self, page: u32) -> Result<PathBuf, ExtractError> {
        let image = self.pages.rasterize(page, scale_for_dpi(self.dpi))?;
        let bytes = self
            .encoding
            .encode(image)
            .map_err(|e| ExtractError::page(page, e))?;

        if self.written.is_empty() {
            std::fs::create_dir_all(&self.dest_dir)
                .map_err(|e| ExtractError::write(&self.dest_dir, e))?;
        }
        let path = self
            .dest_dir
            .join(image_file_name(&self.stem, page, self.encoding.format()));
        std::fs::write(&path, bytes).map_err(|e| ExtractError::write(&path, e))?;

        log::debug!("Wrote page {} to {}", page, path.display());
        self.written.push(path.clone());
        Ok(path)
    }
}

impl PageRenderer for ImageRenderer<'_> {
    fn render_page(&mut self, page: u32) -> Result<(), ExtractError> {
        self.render(page).map(|_| ())
    }

    fn finish(self: Box<Self>) -> Result<Vec<PathBuf>, ExtractError> {
        Ok(self.written)
    }
}

/// Write `pages` of `source` as images into `dest_dir`
pub fn render_images<P: Into<PathBuf>>(
    source: &SourceDocument,
    pages: &PageSet,
    dest_dir: P,
    encoding: ImageEncoding,
    rasterizer: &dyn Rasterizer,
) -> Result<Vec<PathBuf>, ExtractError> {
    let stem = file_stem(source.path());
    let mut renderer = ImageRenderer::open(source, rasterizer, dest_dir, stem, encoding)?;
    for page in pages.iter() {
        renderer.render(page)?;
    }
    Ok(renderer.written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::sample_source;
    use crate::render::fakes::SolidRasterizer;
    use std::path::Path;

    fn renderer<'a>(
        dir: &Path,
        source: &'a SourceDocument,
        encoding: ImageEncoding,
        rasterizer: &'a SolidRasterizer,
    ) -> ImageRenderer<'a> {
        ImageRenderer::open(source, rasterizer, dir.join("images"), "report", encoding).unwrap()
    }

    #[test]
    fn test_png_pages_are_named_and_decodable() {
        let dir = tempfile::tempdir().unwrap();
        let source = sample_source(4);
        let rasterizer = SolidRasterizer::default();
        let mut renderer = renderer(dir.path(), &source, ImageEncoding::Png, &rasterizer);

        let written: Vec<PathBuf> = [2, 3, 4]
            .into_iter()
            .map(|page| renderer.render(page).unwrap())
            .collect();

        let names: Vec<_> = written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["report_p2.png", "report_p3.png", "report_p4.png"]);

        let decoded = image::open(&written[0]).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_jpeg_output() {
        let dir = tempfile::tempdir().unwrap();
        let source = sample_source(1);
        let rasterizer = SolidRasterizer::default();
        let mut renderer = renderer(dir.path(), &source, ImageEncoding::default_jpeg(), &rasterizer);

        let path = renderer.render(1).unwrap();
        assert_eq!(path.file_name().unwrap(), "report_p1.jpeg");

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn test_rasterizes_at_300_dpi() {
        let dir = tempfile::tempdir().unwrap();
        let source = sample_source(2);
        let rasterizer = SolidRasterizer::default();
        let mut renderer = renderer(dir.path(), &source, ImageEncoding::Png, &rasterizer);

        renderer.render(2).unwrap();

        let calls = rasterizer.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 2);
        assert!((calls[0].1 - 300.0 / 72.0).abs() < 1e-6);
    }

    #[test]
    fn test_document_loaded_once_for_all_pages() {
        let dir = tempfile::tempdir().unwrap();
        let source = sample_source(5);
        let rasterizer = SolidRasterizer::default();
        let pages = crate::page_range::parse("1-5", 5).unwrap();

        render_images(&source, &pages, dir.path(), ImageEncoding::Png, &rasterizer).unwrap();

        assert_eq!(rasterizer.opens(), 1);
        assert_eq!(rasterizer.calls().len(), 5);
    }

    #[test]
    fn test_failed_page_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = sample_source(3);
        let rasterizer = SolidRasterizer::failing_on(2);
        let mut renderer = renderer(dir.path(), &source, ImageEncoding::Png, &rasterizer);

        renderer.render(1).unwrap();
        let err = renderer.render(2).unwrap_err();

        assert!(matches!(err, ExtractError::PageRender { page: 2, .. }));
        assert!(dir.path().join("images/report_p1.png").exists());
        assert!(!dir.path().join("images/report_p2.png").exists());
    }

    #[test]
    fn test_render_images_names_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let source = sample_source(5);
        let pages = crate::page_range::parse("4-5", 5).unwrap();

        let written = render_images(
            &source,
            &pages,
            dir.path(),
            ImageEncoding::Png,
            &SolidRasterizer::default(),
        )
        .unwrap();

        assert_eq!(
            written,
            vec![dir.path().join("sample_p4.png"), dir.path().join("sample_p5.png")]
        );
    }

    #[test]
    fn test_directory_only_created_when_writing() {
        let dir = tempfile::tempdir().unwrap();
        let source = sample_source(1);
        let rasterizer = SolidRasterizer::failing_on(1);
        let mut renderer = renderer(dir.path(), &source, ImageEncoding::Png, &rasterizer);

        assert!(renderer.render(1).is_err());
        assert!(!dir.path().join("images").exists());
    }
}
