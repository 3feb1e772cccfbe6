use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::pipeline::utils::StringUtils;
use crate::types::{CanonicalField, CanonicalRow, CellValue, RawSheet};

/// Which column of a sheet feeds each canonical field. Resolved once per
/// sheet from its header row; `None` means the sheet has no such column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMapping {
    columns: [Option<usize>; 10],
}

impl ColumnMapping {
    /// For each field, the first variant (in declaration order) present among
    /// the headers wins. A header appearing twice maps to its leftmost column.
    pub fn resolve(headers: &[CellValue], variants: &[(CanonicalField, Vec<String>)]) -> Self {
        let mut by_key: HashMap<String, usize> = HashMap::new();
        for (index, header) in headers.iter().enumerate() {
            if let Some(text) = header.to_text() {
                by_key.entry(StringUtils::header_key(&text)).or_insert(index);
            }
        }

        let mut columns = [None; 10];
        for (field, names) in variants {
            columns[field.index()] = names
                .iter()
                .find_map(|name| by_key.get(&StringUtils::header_key(name)).copied());
        }
        Self { columns }
    }

    pub fn column(&self, field: CanonicalField) -> Option<usize> {
        self.columns[field.index()]
    }

    pub fn missing_fields(&self) -> Vec<CanonicalField> {
        CanonicalField::ALL
            .iter()
            .copied()
            .filter(|f| self.column(*f).is_none())
            .collect()
    }

    /// Project one raw row; short rows read as empty past their end
    pub fn project(&self, row: &[CellValue], source_sheet: &str) -> CanonicalRow {
        let mut out = CanonicalRow::new(source_sheet);
        for field in CanonicalField::ALL {
            if let Some(cell) = self.column(field).and_then(|i| row.get(i)) {
                out.set(field, cell.clone());
            }
        }
        out
    }
}

/// Map every data row of a sheet onto the canonical schema, keeping row order
#[instrument(skip(sheet, variants), fields(sheet_name = %sheet.name))]
pub fn normalize_sheet(sheet: &RawSheet, variants: &[(CanonicalField, Vec<String>)]) -> Vec<CanonicalRow> {
    let mapping = ColumnMapping::resolve(&sheet.headers, variants);
    let missing = mapping.missing_fields();
    if !missing.is_empty() {
        debug!("Sheet '{}' has no column for {:?}", sheet.name, missing);
    }

    sheet
        .rows
        .iter()
        .map(|row| mapping.project(row, &sheet.name))
        .collect()
}
