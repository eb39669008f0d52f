// src/export/logic.rs

use crate::db::pool::DbPool;
use crate::db::sessions::completed_ascending;
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::SessionExport;
use crate::ui::messages::warning;
use std::path::Path;
use tracing::info;

/// High-level export of the completed-session history.
pub struct ExportLogic;

impl ExportLogic {
    /// Write every completed session, oldest first, to `file`.
    ///
    /// - `file` must be an absolute path
    /// - an existing file is only replaced with `force` or after confirmation
    ///
    /// Returns the number of exported rows.
    pub fn export(pool: &DbPool, format: ExportFormat, file: &str, force: bool) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let rows: Vec<SessionExport> = completed_ascending(&pool.conn)?
            .iter()
            .map(SessionExport::from)
            .collect();

        if rows.is_empty() {
            warning("No completed sessions to export.");
            return Ok(0);
        }

        match format {
            ExportFormat::Csv => export_csv(&rows, path)?,
            ExportFormat::Json => export_json(&rows, path)?,
        }

        info!(format = format.as_str(), rows = rows.len(), file, "history exported");
        Ok(rows.len())
    }
}
