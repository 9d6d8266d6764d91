use super::{execute, page_count, print_outcome, remember};
use anyhow::{bail, Context, Result};
use pdfslice::page_range::{parse, validate};
use pdfslice::settings::SettingsStore;
use pdfslice::{OutputFormat, OutputRequest, PageSet, RangeError};
use std::fmt::Display;
use std::io::{BufRead, Write};
use std::path::PathBuf;

/// Line-based prompts where an empty answer takes the offered default.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Prompter { input, output }
    }

    pub fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            write!(self.output, "{}: ", label)?;
        } else {
            write!(self.output, "{} [{}]: ", label, default)?;
        }
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            bail!("Input closed while waiting for: {}", label);
        }
        let answer = line.trim();
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer.to_string()
        })
    }

    /// Ask again until `check` accepts the answer
    pub fn ask_until<T, E, F>(&mut self, label: &str, default: &str, check: F) -> Result<T>
    where
        E: Display,
        F: Fn(&str) -> std::result::Result<T, E>,
    {
        loop {
            let answer = self.ask(label, default)?;
            match check(&answer) {
                Ok(value) => return Ok(value),
                Err(e) => writeln!(self.output, "{}", e)?,
            }
        }
    }

    pub fn say(&mut self, message: impl Display) -> Result<()> {
        writeln!(self.output, "{}", message)?;
        Ok(())
    }
}

fn non_empty(answer: &str) -> std::result::Result<PathBuf, &'static str> {
    if answer.is_empty() {
        Err("A path is required.")
    } else {
        Ok(PathBuf::from(answer))
    }
}

fn page_selection(answer: &str, total_pages: u32) -> std::result::Result<PageSet, String> {
    validate(answer)
        .and_then(|_| parse(answer, total_pages))
        .map_err(|e: RangeError| format!("{} (expected something like 1-5, 7, 9-11)", e))
}

pub async fn run(store: &dyn SettingsStore) -> Result<()> {
    let stdin = std::io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
    let mut settings = store.load();

    prompter.say("===== pdfslice: extract pages from a PDF =====")?;

    let last_input = settings.input_pdf.display().to_string();
    let input = prompter.ask_until("Input PDF", &last_input, non_empty)?;
    let total_pages = page_count(&input)
        .await
        .with_context(|| format!("Cannot use {}", input.display()))?;
    prompter.say(format_args!("{} has {} page(s)", input.display(), total_pages))?;

    let last_pages = settings.last_range_expression();
    let pages = prompter.ask_until("Pages", &last_pages, |answer| {
        page_selection(answer, total_pages)
    })?;

    let last_output = settings.output_dir.display().to_string();
    let output_dir = prompter.ask_until("Output directory", &last_output, non_empty)?;

    let format = prompter.ask_until("Format (PDF/JPEG/PNG)", OutputFormat::Pdf.name(), |answer| {
        answer.parse::<OutputFormat>()
    })?;
    drop(prompter);

    let request = OutputRequest::new(&input, &output_dir, pages, format);
    let outcome = execute(request).await?;
    print_outcome(&outcome);

    settings.record_run(&input, &output_dir, &outcome.pages);
    remember(store, &settings);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_blank_answer_takes_default() {
        let mut p = prompter("\n  other.pdf  \n");
        assert_eq!(p.ask("Input PDF", "last.pdf").unwrap(), "last.pdf");
        assert_eq!(p.ask("Input PDF", "last.pdf").unwrap(), "other.pdf");

        let shown = String::from_utf8(p.output.clone()).unwrap();
        assert!(shown.starts_with("Input PDF [last.pdf]: "));
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut p = prompter("");
        assert!(p.ask("Pages", "1-10").is_err());
    }

    #[test]
    fn test_ask_until_reprompts_on_bad_format() {
        let mut p = prompter("tiff\npng\n");
        let format = p
            .ask_until("Format", "PDF", |a| a.parse::<OutputFormat>())
            .unwrap();
        assert_eq!(format, OutputFormat::Png);

        let shown = String::from_utf8(p.output.clone()).unwrap();
        assert!(shown.contains("Unknown output format \"tiff\""));
    }

    #[test]
    fn test_page_selection_is_strict_then_clamped() {
        assert!(page_selection("0-3", 7).is_err());
        assert!(page_selection("5-2", 7).is_err());
        assert!(page_selection("1-", 7).is_err());
        assert_eq!(page_selection("5-100", 7).unwrap().pages(), &[5, 6, 7]);
    }

    #[test]
    fn test_path_required() {
        let mut p = prompter("\n\n/docs/a.pdf\n");
        let path = p.ask_until("Input PDF", "", non_empty).unwrap();
        assert_eq!(path, PathBuf::from("/docs/a.pdf"));
    }
}
