//! Spreadsheet intake.
//!
//! Reads the first worksheet of an .xlsx file positionally: the first
//! nine columns are data, every row is data (no header detection), and
//! an empty cell or a lone "-" is a null.

use std::io::Cursor;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use tedtrack_core::error::{Result, TedTrackError};

use crate::record::{DATE_FORMAT, INPUT_COLUMNS};

/// Raw cell rows, nine columns each, before deadline processing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub rows: Vec<Vec<Option<String>>>,
}

/// Read a spreadsheet from disk.
pub fn load_path(path: &Path) -> Result<RawTable> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| TedTrackError::Load(format!("Failed to open {}: {e}", path.display())))?;
    first_sheet(&mut workbook)
}

/// Read a spreadsheet from an in-memory upload.
pub fn load_bytes(bytes: &[u8]) -> Result<RawTable> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| TedTrackError::Load(format!("Failed to open upload: {e}")))?;
    first_sheet(&mut workbook)
}

fn first_sheet<R>(workbook: &mut Xlsx<R>) -> Result<RawTable>
where
    R: std::io::Read + std::io::Seek,
{
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| TedTrackError::Load("Workbook has no worksheets".into()))?
        .map_err(|e| TedTrackError::Load(format!("Failed to read first sheet: {e}")))?;

    if range.is_empty() {
        return Err(TedTrackError::Load("Sheet has no rows".into()));
    }
    if range.width() < INPUT_COLUMNS {
        return Err(TedTrackError::Load(format!(
            "Expected at least {INPUT_COLUMNS} columns, found {}",
            range.width()
        )));
    }

    let rows: Vec<Vec<Option<String>>> = range
        .rows()
        .map(|row| row[..INPUT_COLUMNS].iter().map(cell_text).collect())
        .collect();

    tracing::debug!("📄 Loaded {} raw row(s)", rows.len());
    Ok(RawTable { rows })
}

/// Text form of one cell. Empty cells, error cells, and the "-" token
/// are nulls; date cells become dd/mm/yyyy text.
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => {
            let text = s.trim();
            if text.is_empty() || text == "-" {
                None
            } else {
                Some(text.to_string())
            }
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                Some(format!("{}", *f as i64))
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format(DATE_FORMAT).to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
        Data::Error(_) => None,
    }
}
