//! Append-only CSV log of sent applications.
//!
//! Columns are `date,week,company,position`. A row is only appended when no
//! row with the same date, company and position exists yet. Columns are
//! looked up by header name; any other columns the user keeps in the table
//! are left alone and get an empty field in new rows. Existing rows are never
//! rewritten. The file must be created by the user (a header line is
//! enough); this module never creates it. Nothing here ever aborts a run:
//! every failure becomes a [`HistoryOutcome`].

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;
use serde::Deserialize;
use std::fs::{read, OpenOptions};
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::data::ApplicationData;

/// Columns every history table must carry.
pub const HISTORY_COLUMNS: [&str; 4] = ["date", "week", "company", "position"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HistoryRecord {
    pub date: String,
    pub week: u32,
    pub company: String,
    pub position: String,
}

impl HistoryRecord {
    pub fn new(date: NaiveDate, company: &str, position: &str) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            week: date.iso_week().week(),
            company: company.to_string(),
            position: position.to_string(),
        }
    }

    /// Two records describe the same application when date, company and
    /// position match; the week is derived from the date.
    pub fn same_application(&self, other: &HistoryRecord) -> bool {
        self.date == other.date && self.company == other.company && self.position == other.position
    }

    fn field(&self, column: &str) -> String {
        match column {
            "date" => self.date.clone(),
            "week" => self.week.to_string(),
            "company" => self.company.clone(),
            "position" => self.position.clone(),
            _ => String::new(),
        }
    }

    /// Lays the record out in the table's own column order.
    fn to_row(&self, headers: &StringRecord) -> StringRecord {
        headers.iter().map(|column| self.field(column)).collect()
    }
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history table error: {0}")]
    Csv(#[from] csv::Error),

    #[error("history file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("history table has no `{0}` column")]
    MissingColumn(&'static str),
}

#[derive(Debug)]
pub enum HistoryOutcome {
    Added(HistoryRecord),
    AlreadyPresent(HistoryRecord),
    /// No history file exists.
    Skipped,
    /// Not attempted because archiving failed.
    NotRun,
    Failed(HistoryError),
}

fn check_columns(headers: &StringRecord) -> Result<(), HistoryError> {
    for column in HISTORY_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(HistoryError::MissingColumn(column));
        }
    }
    Ok(())
}

/// Reads the known columns of every row; extra columns are ignored.
pub fn read_history(path: &Path) -> Result<Vec<HistoryRecord>, HistoryError> {
    let mut reader = csv::Reader::from_path(path)?;
    check_columns(reader.headers()?)?;
    let mut records = Vec::new();
    for row in reader.deserialize::<HistoryRecord>() {
        records.push(row?);
    }
    Ok(records)
}

/// Appends `record` unless the same application is already logged.
/// Returns whether the table changed.
pub fn append_unique(path: &Path, record: &HistoryRecord) -> Result<bool, HistoryError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();
    check_columns(&headers)?;
    for row in reader.deserialize::<HistoryRecord>() {
        if row?.same_application(record) {
            return Ok(false);
        }
    }

    let needs_newline = read(path)?.last().is_some_and(|byte| *byte != b'\n');
    let mut file = OpenOptions::new().append(true).open(path)?;
    if needs_newline {
        debug!(path = %path.display(), "[HISTORY] Terminating last line before append");
        file.write_all(b"\n")?;
    }
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(&record.to_row(&headers))?;
    writer.flush()?;
    Ok(true)
}

pub fn log_to_history(data: &ApplicationData, history_file: &Path, date: NaiveDate) -> HistoryOutcome {
    if !history_file.exists() {
        warn!(path = %history_file.display(), "[HISTORY][WARN] History file not found. Skipping.");
        return HistoryOutcome::Skipped;
    }

    let record = HistoryRecord::new(date, data.history_company(), data.history_position());
    match append_unique(history_file, &record) {
        Ok(true) => {
            info!(path = %history_file.display(), company = %record.company, "[HISTORY] Entry added");
            HistoryOutcome::Added(record)
        }
        Ok(false) => {
            info!(company = %record.company, position = %record.position, "[HISTORY] Entry already exists");
            HistoryOutcome::AlreadyPresent(record)
        }
        Err(e) => {
            error!(error = %e, path = %history_file.display(), "[HISTORY][ERROR] Error while logging");
            HistoryOutcome::Failed(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{read_to_string, write};
    use tempfile::tempdir;

    const HEADER: &str = "date,week,company,position\n";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn data(company: &str, position: &str) -> ApplicationData {
        ApplicationData {
            company: Some(company.into()),
            job_title: Some(position.into()),
            ..Default::default()
        }
    }

    #[test]
    fn record_uses_iso_date_and_week() {
        let record = HistoryRecord::new(date(), "Acme", "Dev");
        assert_eq!(record.date, "2024-03-01");
        assert_eq!(record.week, 9);

        // 2021-01-03 belongs to ISO week 53 of 2020.
        let record = HistoryRecord::new(NaiveDate::from_ymd_opt(2021, 1, 3).unwrap(), "A", "B");
        assert_eq!(record.week, 53);
    }

    #[test]
    fn appends_to_header_only_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        write(&path, HEADER).unwrap();

        let outcome = log_to_history(&data("Acme Corp", "Engineer"), &path, date());
        assert!(matches!(outcome, HistoryOutcome::Added(_)));
        assert_eq!(
            read_to_string(&path).unwrap(),
            "date,week,company,position\n2024-03-01,9,Acme Corp,Engineer\n"
        );
    }

    #[test]
    fn same_application_twice_keeps_one_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        write(&path, HEADER).unwrap();

        log_to_history(&data("Acme", "Dev"), &path, date());
        let outcome = log_to_history(&data("Acme", "Dev"), &path, date());
        assert!(matches!(outcome, HistoryOutcome::AlreadyPresent(_)));
        assert_eq!(read_history(&path).unwrap().len(), 1);
    }

    #[test]
    fn any_differing_field_adds_a_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        write(&path, HEADER).unwrap();

        let base = HistoryRecord::new(date(), "Acme", "Dev");
        assert!(append_unique(&path, &base).unwrap());
        assert!(append_unique(&path, &HistoryRecord::new(date().succ_opt().unwrap(), "Acme", "Dev")).unwrap());
        assert!(append_unique(&path, &HistoryRecord::new(date(), "Globex", "Dev")).unwrap());
        assert!(append_unique(&path, &HistoryRecord::new(date(), "Acme", "Ops")).unwrap());
        assert!(!append_unique(&path, &base).unwrap());
        assert_eq!(read_history(&path).unwrap().len(), 4);
    }

    #[test]
    fn existing_rows_are_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        write(&path, "date,week,company,position\n2024-01-15,3,\"Initech, Inc.\",QA\n").unwrap();

        log_to_history(&data("Acme", "Dev"), &path, date());
        let rows = read_history(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].company, "Initech, Inc.");
        assert_eq!(rows[1], HistoryRecord::new(date(), "Acme", "Dev"));
    }

    #[test]
    fn extra_columns_survive_and_new_rows_fill_them_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        write(
            &path,
            "company,date,status,week,position\nInitech,2024-01-01,rejected,1,QA\n",
        )
        .unwrap();

        let outcome = log_to_history(&data("Acme", "Dev"), &path, date());
        assert!(matches!(outcome, HistoryOutcome::Added(_)));
        assert_eq!(
            read_to_string(&path).unwrap(),
            "company,date,status,week,position\nInitech,2024-01-01,rejected,1,QA\nAcme,2024-03-01,,9,Dev\n"
        );

        let outcome = log_to_history(&data("Initech", "QA"), &path, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(matches!(outcome, HistoryOutcome::AlreadyPresent(_)));
    }

    #[test]
    fn unterminated_last_line_is_not_merged_with_new_row() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        write(&path, "date,week,company,position\n2024-01-15,3,Initech,QA").unwrap();

        log_to_history(&data("Acme", "Dev"), &path, date());
        assert_eq!(
            read_to_string(&path).unwrap(),
            "date,week,company,position\n2024-01-15,3,Initech,QA\n2024-03-01,9,Acme,Dev\n"
        );
    }

    #[test]
    fn table_without_required_column_fails_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        let original = "date,company,position\n2024-01-15,Acme,Dev\n";
        write(&path, original).unwrap();

        let outcome = log_to_history(&data("Globex", "Dev"), &path, date());
        assert!(matches!(outcome, HistoryOutcome::Failed(HistoryError::MissingColumn("week"))));
        assert_eq!(read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn missing_fields_are_logged_as_unknown() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        write(&path, HEADER).unwrap();

        match log_to_history(&ApplicationData::default(), &path, date()) {
            HistoryOutcome::Added(record) => {
                assert_eq!(record.company, "Unknown");
                assert_eq!(record.position, "Unknown");
            }
            other => panic!("expected Added, got {other:?}"),
        }
    }

    #[test]
    fn missing_table_is_skipped_and_not_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        let outcome = log_to_history(&data("Acme", "Dev"), &path, date());
        assert!(matches!(outcome, HistoryOutcome::Skipped));
        assert!(!path.exists());
    }

    #[test]
    fn malformed_table_fails_without_touching_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("application_history.csv");
        let original = "date,week,company,position\n2024-01-15,not-a-week,Acme,Dev\n";
        write(&path, original).unwrap();

        let outcome = log_to_history(&data("Globex", "Dev"), &path, date());
        assert!(matches!(outcome, HistoryOutcome::Failed(_)));
        assert_eq!(read_to_string(&path).unwrap(), original);
    }
}
