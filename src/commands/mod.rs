pub mod extract;
pub mod interactive;
pub mod settings;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use pdfslice::pdf::SourceDocument;
use pdfslice::pipeline::{ChannelObserver, Outcome, PipelineEvent};
use pdfslice::settings::{PersistedSettings, SettingsStore};
use pdfslice::{ExtractionPipeline, OutputRequest};
use std::path::Path;
use tokio::sync::mpsc;

/// Run the pipeline on a worker while this task drives the progress bar
pub async fn execute(request: OutputRequest) -> Result<Outcome> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let pb = ProgressBar::new(request.pages().len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {percent:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(format!("{} page(s) as {}", request.pages().len(), request.format()));

    let handle = ExtractionPipeline::new().spawn(request, ChannelObserver::new(tx));

    while let Some(event) = rx.recv().await {
        match event {
            PipelineEvent::Progress(progress) => {
                pb.set_length(u64::from(progress.total));
                pb.set_position(u64::from(progress.completed));
            }
            PipelineEvent::Complete(_) => pb.finish_with_message("done"),
            PipelineEvent::Error(_) => pb.abandon_with_message("failed"),
        }
    }

    let outcome = handle
        .await
        .context("Extraction worker stopped unexpectedly")??;
    Ok(outcome)
}

pub fn print_outcome(outcome: &Outcome) {
    println!("Extracted {} page(s):", outcome.pages.len());
    for path in &outcome.outputs {
        println!("  {}", path.display());
    }
}

/// Page count of `path`, read on a blocking worker
pub async fn page_count(path: &Path) -> Result<u32> {
    let path = path.to_path_buf();
    let source = tokio::task::spawn_blocking(move || SourceDocument::open(path))
        .await
        .context("Document reader stopped unexpectedly")??;
    Ok(source.page_count())
}

/// Best effort: a failed save never undoes a successful extraction.
///
/// Returns whether the settings were saved.
pub fn remember(store: &dyn SettingsStore, settings: &PersistedSettings) -> bool {
    match store.save(settings) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("{}", e);
            eprintln!("Warning: could not save settings: {}", e);
            false
        }
    }
}
