use crate::error::RangeError;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// One comma-separated token of a page-range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: Option<u32>,
}

impl PageRange {
    /// Parse a page range token like "7" or "1-5"
    pub fn parse(s: &str) -> Result<Self, RangeError> {
        let s = s.trim();
        let malformed = || RangeError::Malformed(s.to_string());

        match s.split_once('-') {
            Some((start_str, end_str)) => {
                let start = parse_page_number(start_str).ok_or_else(malformed)?;
                let end = parse_page_number(end_str).ok_or_else(malformed)?;
                // Order is decided on the written numbers, before saturation
                if numeric_cmp(start_str, end_str) == Ordering::Greater {
                    return Err(RangeError::InvalidBounds { start, end });
                }
                Ok(PageRange {
                    start,
                    end: Some(end),
                })
            }
            None => {
                let page = parse_page_number(s).ok_or_else(malformed)?;
                Ok(PageRange {
                    start: page,
                    end: None,
                })
            }
        }
    }

    /// Last page named by this token (the start page for a single page)
    pub fn last(&self) -> u32 {
        self.end.unwrap_or(self.start)
    }

    /// Clamp both ends into `[1, total_pages]`
    fn clamped(&self, total_pages: u32) -> (u32, u32) {
        (
            self.start.clamp(1, total_pages),
            self.last().clamp(1, total_pages),
        )
    }
}

// Digits only: signs, blanks and anything else are rejected. Values too large
// for u32 saturate, since the clamp pulls them down to the last page anyway.
fn parse_page_number(s: &str) -> Option<u32> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(s.parse::<u32>().unwrap_or(u32::MAX))
}

// Compares two digit strings by value, whatever their length.
fn numeric_cmp(a: &str, b: &str) -> Ordering {
    let a = a.trim().trim_start_matches('0');
    let b = b.trim().trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Parse a comma-separated list of page ranges like "1-5, 7, 9-11"
pub fn parse_page_ranges(s: &str) -> Result<Vec<PageRange>, RangeError> {
    if s.trim().is_empty() {
        return Err(RangeError::EmptyPageSet);
    }
    s.split(',').map(PageRange::parse).collect()
}

/// Strict check used before any document is opened.
///
/// On top of the grammar this rejects page zero, which [`parse`] would
/// otherwise clamp up to the first page.
pub fn validate(s: &str) -> Result<Vec<PageRange>, RangeError> {
    let ranges = parse_page_ranges(s)?;
    if let Some(zero) = ranges.iter().find(|r| r.start == 0) {
        return Err(RangeError::InvalidBounds {
            start: zero.start,
            end: zero.last(),
        });
    }
    Ok(ranges)
}

/// Turn an expression into the canonical page set for a document of
/// `total_pages` pages.
pub fn parse(s: &str, total_pages: u32) -> Result<PageSet, RangeError> {
    let ranges = parse_page_ranges(s)?;
    PageSet::from_ranges(&ranges, total_pages)
}

/// Strictly increasing, duplicate-free, 1-based page numbers, never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSet(Vec<u32>);

impl PageSet {
    pub fn from_ranges(ranges: &[PageRange], total_pages: u32) -> Result<Self, RangeError> {
        if total_pages == 0 {
            return Err(RangeError::EmptyPageSet);
        }
        let mut pages = BTreeSet::new();
        for range in ranges {
            let (start, end) = range.clamped(total_pages);
            pages.extend(start..=end);
        }
        Self::from_sorted(pages)
    }

    /// Canonicalize arbitrary page numbers against `total_pages`
    pub fn from_pages<I>(pages: I, total_pages: u32) -> Result<Self, RangeError>
    where
        I: IntoIterator<Item = u32>,
    {
        if total_pages == 0 {
            return Err(RangeError::EmptyPageSet);
        }
        let pages: BTreeSet<u32> = pages
            .into_iter()
            .map(|p| p.clamp(1, total_pages))
            .collect();
        Self::from_sorted(pages)
    }

    fn from_sorted(pages: BTreeSet<u32>) -> Result<Self, RangeError> {
        if pages.is_empty() {
            return Err(RangeError::EmptyPageSet);
        }
        Ok(PageSet(pages.into_iter().collect()))
    }

    /// Re-clamp against a (possibly different) page count
    pub fn clamp(&self, total_pages: u32) -> Result<Self, RangeError> {
        Self::from_pages(self.0.iter().copied(), total_pages)
    }

    pub fn pages(&self) -> &[u32] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> u32 {
        self.0[0]
    }

    pub fn last(&self) -> u32 {
        self.0[self.0.len() - 1]
    }
}

impl fmt::Display for PageSet {
    /// Compact form, e.g. "1-3,7,9-11"
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut runs: Vec<(u32, u32)> = Vec::new();
        for page in self.iter() {
            match runs.last_mut() {
                Some((_, end)) if *end + 1 == page => *end = page,
                _ => runs.push((page, page)),
            }
        }
        for (i, (start, end)) in runs.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if start == end {
                write!(f, "{}", start)?;
            } else {
                write!(f, "{}-{}", start, end)?;
            }
        }
        Ok(())
    }
}
