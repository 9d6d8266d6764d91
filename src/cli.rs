use clap::{Parser, Subcommand};
use pdfslice::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pdfslice")]
#[command(about = "Extract pages from a PDF into a new PDF or into 300 DPI images")]
#[command(version)]
pub struct Cli {
    /// Settings file holding the last used values (default: ~/.pdfslice.json)
    #[arg(long, global = true, env = "PDFSLICE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract pages to a new PDF or to one image per page
    #[command(alias = "cat")]
    Extract {
        /// PDF file to extract from
        path: PathBuf,

        /// Page ranges (e.g., "1-5, 7, 9-11")
        pages: String,

        /// Output directory (default: the last one used)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output format: PDF, JPEG or PNG
        #[arg(short, long, default_value = "pdf")]
        format: OutputFormat,

        /// Don't remember these values for next time
        #[arg(long)]
        no_save: bool,
    },

    /// Prompt for every value, offering the last used ones as defaults
    Interactive,

    /// Show the remembered values and where they are stored
    Settings,
}
