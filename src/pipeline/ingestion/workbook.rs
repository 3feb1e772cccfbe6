use calamine::{open_workbook_auto, Data, Reader, Sheets};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

use super::WorkbookSource;
use crate::error::{ConvertError, Result};
use crate::pipeline::utils::excel_serial_to_datetime;
use crate::types::{CellValue, RawSheet};

/// Workbook on disk, read through calamine. The format (xlsx, xlsm, xlsb,
/// xls, ods) is picked from the file extension.
pub struct CalamineWorkbook {
    workbook: Sheets<BufReader<File>>,
}

impl CalamineWorkbook {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading workbook: {}", path.display());
        let workbook = open_workbook_auto(path).map_err(|e| ConvertError::Workbook {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { workbook })
    }
}

impl WorkbookSource for CalamineWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<RawSheet> {
        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| ConvertError::Sheet {
                sheet: name.to_string(),
                message: e.to_string(),
            })?;
        debug!("Sheet '{}' used range {:?}", name, range.get_size());

        let table = range
            .rows()
            .map(|row| row.iter().map(cell_value).collect())
            .collect();
        Ok(RawSheet::from_table(name, table))
    }
}

/// Map a calamine cell onto our cell type. Error cells count as missing.
pub(crate) fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Bool(v) => CellValue::Bool(*v),
        Data::Int(v) => CellValue::Number(*v as f64),
        Data::Float(v) => CellValue::Number(*v),
        Data::String(v) => CellValue::Text(v.clone()),
        Data::DateTime(v) => match excel_serial_to_datetime(v.as_f64()) {
            Some(dt) => CellValue::DateTime(dt),
            None => CellValue::Number(v.as_f64()),
        },
        Data::DateTimeIso(v) | Data::DurationIso(v) => CellValue::Text(v.clone()),
    }
}
