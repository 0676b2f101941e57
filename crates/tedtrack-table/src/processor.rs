//! Deadline derivation.
//!
//! Turns raw spreadsheet rows into ordered deadline records: day-first
//! date parsing, derived warning and accounting dates, rows without an
//! end date dropped, then a stable sort by the four date columns.

use chrono::{Duration, NaiveDate};
use tedtrack_core::error::{Result, TedTrackError};

use crate::loader::RawTable;
use crate::record::{DATE_FORMAT, INPUT_COLUMNS, Record, Table};

/// Days before the effective end at which the warning fires.
pub const WARNING_OFFSET_DAYS: i64 = 35;
/// Days after the effective end at which accounting falls due.
pub const ACCOUNTING_OFFSET_DAYS: i64 = 120;

/// Derive deadline records from raw rows.
///
/// Rows whose end date is missing or unparseable are dropped. Survivors
/// are sorted by (start, end, warning, due) with missing starts last;
/// ties keep their upload order.
pub fn process(raw: &RawTable) -> Result<Table> {
    let mut records = Vec::with_capacity(raw.rows.len());
    for (index, row) in raw.rows.iter().enumerate() {
        if row.len() != INPUT_COLUMNS {
            return Err(TedTrackError::Processing(format!(
                "Row {index} has {} columns, expected {INPUT_COLUMNS}",
                row.len()
            )));
        }

        let effective_start = row[7].as_deref().and_then(parse_date);
        let Some(effective_end) = row[8].as_deref().and_then(parse_date) else {
            continue;
        };

        records.push(Record {
            term_id: normalize_term(row[0].as_deref()),
            siafi: row[1].clone(),
            proponent_unit: row[2].clone(),
            grantor_unit: row[3].clone(),
            title: row[4].clone(),
            document_status: row[5].clone(),
            coordination: row[6].clone(),
            effective_start,
            effective_end,
            warning_date: effective_end - Duration::days(WARNING_OFFSET_DAYS),
            accounting_due: effective_end + Duration::days(ACCOUNTING_OFFSET_DAYS),
        });
    }

    records.sort_by_key(sort_key);

    let dropped = raw.rows.len() - records.len();
    if dropped > 0 {
        tracing::debug!("🧮 Dropped {dropped} row(s) without an end date");
    }
    Ok(Table { records })
}

/// Day-first date parsing; anything else counts as missing.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

fn sort_key(record: &Record) -> (bool, Option<NaiveDate>, NaiveDate, NaiveDate, NaiveDate) {
    (
        record.effective_start.is_none(),
        record.effective_start,
        record.effective_end,
        record.warning_date,
        record.accounting_due,
    )
}

/// Term numbers keep their numeric value; missing or non-numeric terms
/// collapse to "0". Integral values lose any trailing ".0".
fn normalize_term(raw: Option<&str>) -> String {
    let number = raw
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite());
    match number {
        Some(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", n as i64),
        Some(n) => n.to_string(),
        None => "0".into(),
    }
}
