use chrono::NaiveDate;
use std::io::Write;
use thiserror::Error;

use super::column::ColumnDef;
use super::record::GridRecord;
use crate::types::EntityLabel;

#[derive(Debug, Error)]
pub enum GridExportError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// `<plural>_<YYYY-MM-DD>.csv`, lower-cased with spaces as underscores
pub fn export_file_name(label: &EntityLabel, date: NaiveDate) -> String {
    format!("{}_{}.csv", label.plural.to_lowercase().replace(' ', "_"), date.format("%Y-%m-%d"))
}

/// Write a header row of column titles, then one formatted row per record
pub fn write_csv<R, W>(writer: W, columns: &[ColumnDef<R::Field>], rows: &[&R]) -> Result<usize, GridExportError>
where
    R: GridRecord,
    W: Write,
{
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(columns.iter().map(|c| c.header.as_str()))?;
    for row in rows {
        csv.write_record(columns.iter().map(|c| c.format(&row.get(c.field))))?;
    }
    csv.flush()?;
    Ok(rows.len())
}
