//! CSV export of displayed tables.

use csv::WriterBuilder;

use crate::db::result::QueryResult;
use crate::error::{AppError, AppResult};
use crate::model::DateRange;

/// Serializes a result exactly as displayed: same columns, same row order,
/// cells rendered with the display formatting used on screen.
pub fn table_to_csv(qr: &QueryResult) -> AppResult<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record(&qr.columns)?;
    for row in &qr.rows {
        writer.write_record(row.iter().map(|cell| cell.display()))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::DataSource(e.to_string()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Download name for an exported table: `{entity}_{start}_{end}.csv`.
pub fn export_file_name(entity: &str, range: &DateRange) -> String {
    format!(
        "{}_{}_{}.csv",
        entity,
        range.start_date_param(),
        range.end_date_param()
    )
}
