//! Runs one extraction: open the source, re-check the page selection against
//! it, hand every page to the renderer for the requested format and report
//! progress along the way.

mod progress;
mod request;

pub use progress::{ChannelObserver, Outcome, PipelineEvent, ProgressEvent, ProgressObserver};
pub use request::{file_stem, image_file_name, pdf_file_name, OutputRequest};

use crate::error::ExtractError;
use crate::pdf::{PdfiumRasterizer, Rasterizer, SourceDocument};
use crate::render::renderer_for;
use std::sync::Arc;
use tokio::task::JoinHandle;

#[derive(Clone)]
pub struct ExtractionPipeline {
    rasterizer: Arc<dyn Rasterizer>,
}

impl Default for ExtractionPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractionPipeline {
    /// Pipeline that rasterizes with PDFium
    pub fn new() -> Self {
        Self::with_rasterizer(Arc::new(PdfiumRasterizer::new()))
    }

    pub fn with_rasterizer(rasterizer: Arc<dyn Rasterizer>) -> Self {
        ExtractionPipeline { rasterizer }
    }

    /// Run `request` to completion on the current thread.
    ///
    /// Pages are processed in ascending order and stop at the first failure.
    /// Files already written for earlier pages stay on disk. `observer` sees
    /// one progress event per page, then exactly one of `on_complete` or
    /// `on_error`.
    pub fn run(
        &self,
        request: &OutputRequest,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Outcome, ExtractError> {
        log::info!(
            "Extracting pages {} of {} as {}",
            request.pages(),
            request.source().display(),
            request.format()
        );
        match self.execute(request, observer) {
            Ok(outcome) => {
                log::info!("Wrote {} file(s)", outcome.outputs.len());
                observer.on_complete(&outcome);
                Ok(outcome)
            }
            Err(e) => {
                log::error!("Extraction failed: {}", e);
                observer.on_error(&e);
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        request: &OutputRequest,
        observer: &mut dyn ProgressObserver,
    ) -> Result<Outcome, ExtractError> {
        let source = SourceDocument::open(request.source())?;
        let page_count = source.page_count();

        let pages = request.pages().clamp(page_count)?;
        if pages != *request.pages() {
            log::warn!(
                "Page selection {} narrowed to {} for a {}-page document",
                request.pages(),
                pages,
                page_count
            );
        }

        let mut renderer = renderer_for(request, &pages, &source, self.rasterizer.as_ref())?;
        let total = pages.len() as u32;
        for (index, page) in pages.iter().enumerate() {
            log::debug!("Processing page {} ({}/{})", page, index + 1, total);
            renderer.render_page(page)?;
            observer.on_progress(ProgressEvent {
                completed: index as u32 + 1,
                total,
            });
        }

        let outputs = renderer.finish()?;
        Ok(Outcome { outputs, pages })
    }

    /// Run `request` on a blocking worker and hand back its task.
    ///
    /// The caller stays free to await, poll or drop the handle; dropping it
    /// does not stop the run.
    pub fn spawn<O>(
        &self,
        request: OutputRequest,
        mut observer: O,
    ) -> JoinHandle<Result<Outcome, ExtractError>>
    where
        O: ProgressObserver + Send + 'static,
    {
        let pipeline = self.clone();
        tokio::task::spawn_blocking(move || pipeline.run(&request, &mut observer))
    }
}
