//! Deadline record model and its display projection.

use chrono::NaiveDate;

/// Date display format used across spreadsheets, emails, and logs.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Number of columns consumed from an uploaded sheet.
pub const INPUT_COLUMNS: usize = 9;

/// Column labels of the display projection, in order.
pub const COLUMN_LABELS: [&str; 11] = [
    "Termo",
    "SIAFI",
    "Unidade Gestora Proponente",
    "Unidade Gestora Concedente",
    "Título / Objeto da despesa",
    "Situação Documento",
    "Coordenação",
    "Vigência inicial",
    "Vigência fim",
    "Data para alerta",
    "Data de prestação de contas",
];

/// One transfer agreement with its derived deadlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Normalized agreement number, "0" when absent or non-numeric.
    pub term_id: String,
    pub siafi: Option<String>,
    pub proponent_unit: Option<String>,
    pub grantor_unit: Option<String>,
    pub title: Option<String>,
    pub document_status: Option<String>,
    pub coordination: Option<String>,
    pub effective_start: Option<NaiveDate>,
    pub effective_end: NaiveDate,
    /// 35 days before the effective end.
    pub warning_date: NaiveDate,
    /// 120 days after the effective end.
    pub accounting_due: NaiveDate,
}

impl Record {
    /// Cells of the 11-column display projection, dates in dd/mm/yyyy.
    /// Missing values render as empty cells.
    pub fn to_cells(&self) -> [String; 11] {
        [
            self.term_id.clone(),
            opt_text(&self.siafi),
            opt_text(&self.proponent_unit),
            opt_text(&self.grantor_unit),
            opt_text(&self.title),
            opt_text(&self.document_status),
            opt_text(&self.coordination),
            self.effective_start.map(format_date).unwrap_or_default(),
            format_date(self.effective_end),
            format_date(self.warning_date),
            format_date(self.accounting_due),
        ]
    }
}

fn opt_text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Format a date in the display format.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// The three date columns a daily check inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineColumn {
    AccountingDue,
    WarningDate,
    EffectiveEnd,
}

impl DeadlineColumn {
    /// Checking order of a daily tick: accounting first, then warning,
    /// then end of effectiveness.
    pub const PRIORITY: [DeadlineColumn; 3] = [
        DeadlineColumn::AccountingDue,
        DeadlineColumn::WarningDate,
        DeadlineColumn::EffectiveEnd,
    ];

    /// Column label as shown in the spreadsheet and email subjects.
    pub fn label(&self) -> &'static str {
        match self {
            DeadlineColumn::AccountingDue => "Data de prestação de contas",
            DeadlineColumn::WarningDate => "Data para alerta",
            DeadlineColumn::EffectiveEnd => "Vigência fim",
        }
    }

    /// Value of this column on a record.
    pub fn value_of(&self, record: &Record) -> NaiveDate {
        match self {
            DeadlineColumn::AccountingDue => record.accounting_due,
            DeadlineColumn::WarningDate => record.warning_date,
            DeadlineColumn::EffectiveEnd => record.effective_end,
        }
    }
}

impl std::fmt::Display for DeadlineColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Processed table, records kept in their persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub records: Vec<Record>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose given column, in display form, equals `date`.
    pub fn matching(&self, column: DeadlineColumn, date: &str) -> Vec<&Record> {
        self.records
            .iter()
            .filter(|r| format_date(column.value_of(r)) == date)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_record() -> Record {
        Record {
            term_id: "7".into(),
            siafi: Some("123456".into()),
            proponent_unit: None,
            grantor_unit: Some("UG-77".into()),
            title: Some("Obra".into()),
            document_status: None,
            coordination: Some("COPLAN".into()),
            effective_start: Some(date(2030, 1, 1)),
            effective_end: date(2030, 6, 30),
            warning_date: date(2030, 5, 26),
            accounting_due: date(2030, 10, 28),
        }
    }

    #[test]
    fn test_to_cells_projection() {
        let cells = sample_record().to_cells();
        assert_eq!(cells[0], "7");
        assert_eq!(cells[1], "123456");
        assert_eq!(cells[2], "");
        assert_eq!(cells[7], "01/01/2030");
        assert_eq!(cells[8], "30/06/2030");
        assert_eq!(cells[9], "26/05/2030");
        assert_eq!(cells[10], "28/10/2030");
    }

    #[test]
    fn test_missing_start_renders_empty() {
        let mut record = sample_record();
        record.effective_start = None;
        assert_eq!(record.to_cells()[7], "");
    }

    #[test]
    fn test_column_labels_match_projection() {
        assert_eq!(COLUMN_LABELS.len(), 11);
        assert_eq!(COLUMN_LABELS[0], "Termo");
        assert_eq!(DeadlineColumn::EffectiveEnd.label(), COLUMN_LABELS[8]);
        assert_eq!(DeadlineColumn::WarningDate.label(), COLUMN_LABELS[9]);
        assert_eq!(DeadlineColumn::AccountingDue.label(), COLUMN_LABELS[10]);
    }

    #[test]
    fn test_priority_order() {
        assert_eq!(
            DeadlineColumn::PRIORITY,
            [
                DeadlineColumn::AccountingDue,
                DeadlineColumn::WarningDate,
                DeadlineColumn::EffectiveEnd,
            ]
        );
    }

    #[test]
    fn test_matching_compares_display_form() {
        let table = Table {
            records: vec![sample_record()],
        };
        let hits = table.matching(DeadlineColumn::EffectiveEnd, "30/06/2030");
        assert_eq!(hits.len(), 1);
        assert!(table.matching(DeadlineColumn::EffectiveEnd, "01/07/2030").is_empty());
        assert_eq!(
            table.matching(DeadlineColumn::WarningDate, "26/05/2030").len(),
            1
        );
    }
}
