use super::{execute, page_count, print_outcome, remember};
use anyhow::{Context, Result};
use pdfslice::page_range::{parse, validate};
use pdfslice::settings::SettingsStore;
use pdfslice::{OutputFormat, OutputRequest};
use std::path::{Path, PathBuf};

pub struct ExtractOptions {
    pub output_dir: Option<PathBuf>,
    pub format: OutputFormat,
    pub remember: bool,
}

pub async fn run(
    store: &dyn SettingsStore,
    input: &Path,
    pages: &str,
    options: &ExtractOptions,
) -> Result<()> {
    validate(pages).with_context(|| format!("Invalid page range {:?}", pages))?;

    let mut settings = store.load();
    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| settings.output_dir.clone());

    let total_pages = page_count(input).await?;
    let page_set = parse(pages, total_pages)
        .with_context(|| format!("Invalid page range {:?}", pages))?;

    let request = OutputRequest::new(input, &output_dir, page_set, options.format);
    let outcome = execute(request).await?;
    print_outcome(&outcome);

    if options.remember {
        settings.record_run(input, &output_dir, &outcome.pages);
        remember(store, &settings);
    }

    Ok(())
}
