// Pipeline ingestion: workbook access and per-sheet loading

pub mod workbook;

use metrics::counter;
use tracing::{info, instrument, warn};

use crate::error::{ConvertError, Result};
use crate::types::{CellValue, RawSheet};

pub use workbook::CalamineWorkbook;

/// Anything that can hand out sheets as 2D tables of cells
pub trait WorkbookSource {
    /// Sheet names present in the workbook, in workbook order
    fn sheet_names(&self) -> Vec<String>;

    /// Read a sheet; the first row of its used range is the header row
    fn read_sheet(&mut self, name: &str) -> Result<RawSheet>;
}

/// Workbook held entirely in memory, for callers that already have the tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkbook {
    sheets: Vec<(String, Vec<Vec<CellValue>>)>,
}

impl InMemoryWorkbook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet whose first row is the header row
    pub fn with_sheet(mut self, name: impl Into<String>, table: Vec<Vec<CellValue>>) -> Self {
        self.sheets.push((name.into(), table));
        self
    }
}

impl WorkbookSource for InMemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|(name, _)| name.clone()).collect()
    }

    fn read_sheet(&mut self, name: &str) -> Result<RawSheet> {
        self.sheets
            .iter()
            .find(|(sheet, _)| sheet == name)
            .map(|(sheet, table)| RawSheet::from_table(sheet.clone(), table.clone()))
            .ok_or_else(|| ConvertError::Sheet {
                sheet: name.to_string(),
                message: "sheet not found".to_string(),
            })
    }
}

/// Sheets read from the workbook plus the configured names that were absent
#[derive(Debug, Clone, Default)]
pub struct LoadedSheets {
    pub sheets: Vec<RawSheet>,
    pub skipped: Vec<String>,
}

/// Read the configured sheets in order. Names missing from the workbook are
/// skipped with a warning; a present sheet that fails to read is fatal.
#[instrument(skip(source, sheet_names))]
pub fn load_sheets(source: &mut dyn WorkbookSource, sheet_names: &[String]) -> Result<LoadedSheets> {
    let available = source.sheet_names();
    let mut loaded = LoadedSheets::default();

    for name in sheet_names {
        if !available.iter().any(|a| a == name) {
            warn!("Sheet '{}' not found, skipping", name);
            loaded.skipped.push(name.clone());
            continue;
        }

        let sheet = source.read_sheet(name)?;
        info!("Loaded sheet '{}' ({} rows)", name, sheet.rows.len());
        counter!("order_export_rows_loaded_total", "sheet" => name.clone())
            .increment(sheet.rows.len() as u64);
        loaded.sheets.push(sheet);
    }

    Ok(loaded)
}
