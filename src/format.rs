use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// What an extraction run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One PDF holding the selected pages
    #[default]
    Pdf,
    /// One JPEG per page
    Jpeg,
    /// One PNG per page
    Png,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Pdf, OutputFormat::Jpeg, OutputFormat::Png];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "PDF",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
        }
    }

    /// File extension for files of this format
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Pdf => "pdf",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown output format {0:?} (expected PDF, JPEG or PNG)")]
pub struct UnknownFormat(pub String);

impl FromStr for OutputFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        OutputFormat::ALL
            .into_iter()
            .find(|f| s.eq_ignore_ascii_case(f.name()))
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert_eq!("Jpeg".parse::<OutputFormat>().unwrap(), OutputFormat::Jpeg);
        assert_eq!(" PNG ".parse::<OutputFormat>().unwrap(), OutputFormat::Png);
    }

    #[test]
    fn test_unknown_format() {
        let err = "tiff".parse::<OutputFormat>().unwrap_err();
        assert_eq!(err, UnknownFormat("tiff".to_string()));
        assert!("jpg".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_extensions() {
        assert_eq!(OutputFormat::Pdf.extension(), "pdf");
        assert_eq!(OutputFormat::Jpeg.extension(), "jpeg");
        assert_eq!(OutputFormat::Png.extension(), "png");
    }
}
