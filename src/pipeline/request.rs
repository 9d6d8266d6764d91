use crate::format::OutputFormat;
use crate::page_range::PageSet;
use std::path::{Path, PathBuf};

/// Everything one extraction run needs, fixed when the run is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRequest {
    source: PathBuf,
    output_dir: PathBuf,
    pages: PageSet,
    format: OutputFormat,
}

impl OutputRequest {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(
        source: P,
        output_dir: Q,
        pages: PageSet,
        format: OutputFormat,
    ) -> Self {
        OutputRequest {
            source: source.into(),
            output_dir: output_dir.into(),
            pages,
            format,
        }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn pages(&self) -> &PageSet {
        &self.pages
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Base name of the source file without its extension
    pub fn stem(&self) -> String {
        file_stem(&self.source)
    }

    /// Where the PDF holding `pages` goes
    pub fn pdf_output_path(&self, pages: &PageSet) -> PathBuf {
        self.output_dir.join(pdf_file_name(&self.stem(), pages))
    }

    /// Every file a complete run writes, in page order
    pub fn planned_outputs(&self) -> Vec<PathBuf> {
        match self.format {
            OutputFormat::Pdf => vec![self.pdf_output_path(&self.pages)],
            format => {
                let stem = self.stem();
                self.pages
                    .iter()
                    .map(|page| self.output_dir.join(image_file_name(&stem, page, format)))
                    .collect()
            }
        }
    }
}

pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "document".to_string())
}

/// `<stem>_p<first>-<last>.pdf`, or `<stem>_p<page>.pdf` for a single page
pub fn pdf_file_name(stem: &str, pages: &PageSet) -> String {
    if pages.len() == 1 {
        format!("{}_p{}.pdf", stem, pages.first())
    } else {
        format!("{}_p{}-{}.pdf", stem, pages.first(), pages.last())
    }
}

/// `<stem>_p<page>.<ext>`
pub fn image_file_name(stem: &str, page: u32, format: OutputFormat) -> String {
    format!("{}_p{}.{}", stem, page, format.extension())
}
