use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::BinExport;
use crate::models::telemetry::TelemetryRecord;
use crate::ui::messages::warning;
use std::path::Path;

pub struct ExportLogic;

impl ExportLogic {
    /// Write `records` to `file`. The path must be absolute.
    /// Returns the number of rows written; nothing is written for an empty set.
    pub fn export(
        records: &[&TelemetryRecord],
        format: ExportFormat,
        file: &str,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        if records.is_empty() {
            warning("No bins match the selection; nothing exported.");
            return Ok(0);
        }

        ensure_writable(path, force)?;

        let rows: Vec<BinExport> = records.iter().map(|r| BinExport::from(*r)).collect();

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        Ok(rows.len())
    }
}
