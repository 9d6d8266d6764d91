use anyhow::Result;
use pdfslice::settings::{FileSettingsStore, PersistedSettings};

pub fn run(store: &FileSettingsStore) -> Result<()> {
    println!("File: {}", store.path().display());

    let settings = match store.try_load() {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            println!("(nothing saved yet, showing defaults)");
            PersistedSettings::default()
        }
        Err(e) => {
            println!("(unreadable, showing defaults: {})", e);
            PersistedSettings::default()
        }
    };

    println!("Input PDF: {}", settings.input_pdf.display());
    println!("Output directory: {}", settings.output_dir.display());
    println!(
        "Last pages: {}-{}",
        settings.last_start_page, settings.last_end_page
    );

    Ok(())
}
