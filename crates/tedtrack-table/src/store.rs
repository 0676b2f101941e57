//! Artifact persistence.
//!
//! One spreadsheet per store. Saving is a full replace through a
//! temporary file, so a reader never observes a half-written artifact.

use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::Workbook;
use tedtrack_core::error::{Result, TedTrackError};

use crate::loader;
use crate::processor;
use crate::record::{COLUMN_LABELS, Table};

/// File-backed table store.
#[derive(Debug, Clone)]
pub struct TableStore {
    path: PathBuf,
}

impl TableStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default artifact path (~/.tedtrack/planilha.xlsx).
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tedtrack")
            .join("planilha.xlsx")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a saved artifact is present.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Persist the table, replacing any previous artifact.
    pub fn save(&self, table: &Table) -> bool {
        match self.write_artifact(table) {
            Ok(()) => {
                tracing::debug!(
                    "💾 Saved {} record(s) to {}",
                    table.len(),
                    self.path.display()
                );
                true
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to save artifact: {e}");
                false
            }
        }
    }

    fn write_artifact(&self, table: &Table) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, label) in COLUMN_LABELS.iter().enumerate() {
            sheet
                .write_string(0, col as u16, *label)
                .map_err(|e| TedTrackError::Persistence(format!("Write header: {e}")))?;
        }
        for (row, record) in table.records.iter().enumerate() {
            for (col, cell) in record.to_cells().iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                sheet
                    .write_string(row as u32 + 1, col as u16, cell.as_str())
                    .map_err(|e| TedTrackError::Persistence(format!("Write cell: {e}")))?;
            }
        }

        let tmp = self.path.with_extension("xlsx.tmp");
        workbook
            .save(&tmp)
            .map_err(|e| TedTrackError::Persistence(format!("Save workbook: {e}")))?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Load and re-process the saved artifact. None when the artifact
    /// is absent or unreadable.
    pub fn load(&self) -> Option<Table> {
        if !self.exists() {
            return None;
        }
        let raw = match loader::load_path(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("⚠️ Failed to load artifact: {e}");
                return None;
            }
        };
        match processor::process(&raw) {
            Ok(table) => Some(table),
            Err(e) => {
                tracing::warn!("⚠️ Failed to process artifact: {e}");
                None
            }
        }
    }

    /// Remove the artifact. True only when it existed and was removed.
    pub fn delete(&self) -> bool {
        if !self.exists() {
            return false;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!("🗑️ Artifact removed: {}", self.path.display());
                true
            }
            Err(e) => {
                tracing::warn!("⚠️ Failed to remove artifact: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RawTable;
    use crate::processor::process;

    fn full_row(term: &str, start: Option<&str>, end: &str) -> Vec<Option<String>> {
        vec![
            Some(term.into()),
            Some("123456".into()),
            Some("UG Proponente".into()),
            None,
            Some("Reforma do bloco B".into()),
            Some("Vigente".into()),
            None,
            start.map(String::from),
            Some(end.into()),
        ]
    }

    fn sample_table() -> Table {
        let raw = RawTable {
            rows: vec![
                full_row("7", Some("01/01/2030"), "30/06/2030"),
                full_row("12", None, "15/08/2030"),
            ],
        };
        process(&raw).unwrap()
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = std::env::temp_dir().join("tedtrack-test-store-roundtrip");
        std::fs::create_dir_all(&dir).unwrap();
        let store = TableStore::new(dir.join("planilha.xlsx"));

        let table = sample_table();
        assert!(store.save(&table));
        assert!(store.exists());

        let loaded = store.load().expect("artifact should load");
        assert_eq!(loaded, table);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_replaces_previous_artifact() {
        let dir = std::env::temp_dir().join("tedtrack-test-store-replace");
        std::fs::create_dir_all(&dir).unwrap();
        let store = TableStore::new(dir.join("planilha.xlsx"));

        assert!(store.save(&sample_table()));

        let raw = RawTable {
            rows: vec![full_row("99", None, "01/12/2031")],
        };
        let smaller = process(&raw).unwrap();
        assert!(store.save(&smaller));

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.records[0].term_id, "99");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = std::env::temp_dir().join("tedtrack-test-store-mkdir");
        std::fs::remove_dir_all(&dir).ok();
        let store = TableStore::new(dir.join("nested").join("planilha.xlsx"));

        assert!(store.save(&sample_table()));
        assert!(store.exists());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_default_path_points_at_home_artifact() {
        let path = TableStore::default_path();
        assert!(path.ends_with(".tedtrack/planilha.xlsx"));
    }

    #[test]
    fn test_load_absent_returns_none() {
        let store = TableStore::new(std::env::temp_dir().join("tedtrack-absent.xlsx"));
        assert!(!store.exists());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_delete_semantics() {
        let dir = std::env::temp_dir().join("tedtrack-test-store-delete");
        std::fs::create_dir_all(&dir).unwrap();
        let store = TableStore::new(dir.join("planilha.xlsx"));

        assert!(!store.delete());

        assert!(store.save(&sample_table()));
        assert!(store.delete());
        assert!(!store.exists());
        assert!(!store.delete());
        std::fs::remove_dir_all(&dir).ok();
    }
}
