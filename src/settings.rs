//! The "last used values" record.
//!
//! Loading never fails: a missing record means defaults, and an unreadable or
//! corrupt one is logged and treated the same way. Saving reports errors, but
//! callers only warn about them.

use crate::error::SettingsError;
use crate::page_range::PageSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const SETTINGS_FILE_NAME: &str = ".pdfslice.json";

const DEFAULT_START_PAGE: u32 = 1;
const DEFAULT_END_PAGE: u32 = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedSettings {
    pub input_pdf: PathBuf,
    pub output_dir: PathBuf,
    pub last_start_page: u32,
    pub last_end_page: u32,
}

impl Default for PersistedSettings {
    fn default() -> Self {
        PersistedSettings {
            input_pdf: PathBuf::new(),
            output_dir: default_output_dir(),
            last_start_page: DEFAULT_START_PAGE,
            last_end_page: DEFAULT_END_PAGE,
        }
    }
}

impl PersistedSettings {
    /// Remember the inputs of a successful run
    pub fn record_run(&mut self, input_pdf: &Path, output_dir: &Path, pages: &PageSet) {
        self.input_pdf = input_pdf.to_path_buf();
        self.output_dir = output_dir.to_path_buf();
        self.last_start_page = pages.first();
        self.last_end_page = pages.last();
    }

    /// The remembered bounds as a page-range expression
    pub fn last_range_expression(&self) -> String {
        let start = self.last_start_page.max(1);
        let end = self.last_end_page.max(start);
        if start == end {
            start.to_string()
        } else {
            format!("{}-{}", start, end)
        }
    }
}

pub fn home_dir() -> Option<PathBuf> {
    ["HOME", "USERPROFILE"]
        .into_iter()
        .filter_map(std::env::var_os)
        .find(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// `~/Documents`, or the working directory when there is no home
pub fn default_output_dir() -> PathBuf {
    home_dir()
        .map(|home| home.join("Documents"))
        .unwrap_or_else(|| PathBuf::from("."))
}

pub trait SettingsStore {
    fn load(&self) -> PersistedSettings;
    fn save(&self, settings: &PersistedSettings) -> Result<(), SettingsError>;
}

fn decode(origin: &Path, text: &str) -> Result<PersistedSettings, SettingsError> {
    serde_json::from_str(text).map_err(|source| SettingsError::Corrupt {
        path: origin.to_path_buf(),
        source,
    })
}

fn encode(origin: &Path, settings: &PersistedSettings) -> Result<String, SettingsError> {
    serde_json::to_string_pretty(settings).map_err(|e| SettingsError::Io {
        path: origin.to_path_buf(),
        source: e.into(),
    })
}

fn or_defaults(result: Result<Option<PersistedSettings>, SettingsError>) -> PersistedSettings {
    match result {
        Ok(Some(settings)) => settings,
        Ok(None) => PersistedSettings::default(),
        Err(e) => {
            log::warn!("{}; using defaults", e);
            PersistedSettings::default()
        }
    }
}

/// A JSON file, by default `~/.pdfslice.json`.
pub struct FileSettingsStore {
    path: PathBuf,
}

impl FileSettingsStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        FileSettingsStore { path: path.into() }
    }

    pub fn default_location() -> Self {
        let dir = home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join(SETTINGS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the record, `None` if it does not exist
    pub fn try_load(&self) -> Result<Option<PersistedSettings>, SettingsError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SettingsError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        decode(&self.path, &text).map(Some)
    }
}

impl SettingsStore for FileSettingsStore {
    fn load(&self) -> PersistedSettings {
        or_defaults(self.try_load())
    }

    fn save(&self, settings: &PersistedSettings) -> Result<(), SettingsError> {
        let text = encode(&self.path, settings)?;
        let io_err = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(&self.path, text).map_err(io_err)?;
        log::info!("Saved settings to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the serialized record in memory.
#[derive(Default)]
pub struct MemorySettingsStore {
    record: Mutex<Option<String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing serialized record
    pub fn with_record<S: Into<String>>(record: S) -> Self {
        MemorySettingsStore {
            record: Mutex::new(Some(record.into())),
        }
    }

    pub fn record(&self) -> Option<String> {
        self.record.lock().ok().and_then(|r| r.clone())
    }

    fn origin() -> &'static Path {
        Path::new("<memory>")
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> PersistedSettings {
        let loaded = self
            .record()
            .map(|text| decode(Self::origin(), &text))
            .transpose();
        or_defaults(loaded)
    }

    fn save(&self, settings: &PersistedSettings) -> Result<(), SettingsError> {
        let text = encode(Self::origin(), settings)?;
        let mut record = self.record.lock().map_err(|_| SettingsError::Io {
            path: Self::origin().to_path_buf(),
            source: std::io::Error::other("settings lock poisoned"),
        })?;
        *record = Some(text);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page_range::parse;

    #[test]
    fn test_missing_record_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("absent.json"));

        let settings = store.load();
        assert_eq!(settings.input_pdf, PathBuf::new());
        assert!(!settings.output_dir.as_os_str().is_empty());
        assert_eq!(settings.last_start_page, 1);
        assert_eq!(settings.last_end_page, 10);
        assert!(store.try_load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileSettingsStore::new(&path);

        assert_eq!(store.load(), PersistedSettings::default());
        assert!(matches!(store.try_load(), Err(SettingsError::Corrupt { .. })));
    }

    #[test]
    fn test_partial_record_fills_in_defaults() {
        let store = MemorySettingsStore::with_record(r#"{"input_pdf": "/docs/a.pdf"}"#);
        let settings = store.load();
        assert_eq!(settings.input_pdf, PathBuf::from("/docs/a.pdf"));
        assert_eq!(settings.last_end_page, 10);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettingsStore::new(dir.path().join("cfg").join("settings.json"));
        let mut settings = PersistedSettings::default();
        settings.record_run(
            Path::new("/docs/report.pdf"),
            Path::new("/tmp/out"),
            &parse("3-7,9", 20).unwrap(),
        );

        store.save(&settings).unwrap();
        assert_eq!(store.load(), settings);
        assert_eq!(settings.last_start_page, 3);
        assert_eq!(settings.last_end_page, 9);

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        for key in ["input_pdf", "output_dir", "last_start_page", "last_end_page"] {
            assert!(raw.get(key).is_some(), "{key} missing from record");
        }
    }

    #[test]
    fn test_save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file").unwrap();
        let store = FileSettingsStore::new(blocker.join("settings.json"));

        let err = store.save(&PersistedSettings::default()).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemorySettingsStore::new();
        assert_eq!(store.load(), PersistedSettings::default());

        let mut first = PersistedSettings::default();
        first.last_end_page = 3;
        let mut second = PersistedSettings::default();
        second.last_end_page = 4;
        store.save(&first).unwrap();
        store.save(&second).unwrap();

        assert_eq!(store.load().last_end_page, 4);
    }

    #[test]
    fn test_last_range_expression() {
        let mut settings = PersistedSettings::default();
        assert_eq!(settings.last_range_expression(), "1-10");
        settings.last_start_page = 4;
        settings.last_end_page = 4;
        assert_eq!(settings.last_range_expression(), "4");
        settings.last_end_page = 2;
        assert_eq!(settings.last_range_expression(), "4");
    }
}
