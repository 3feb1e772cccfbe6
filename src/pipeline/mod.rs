// Data processing pipeline: ingestion, processing, and storage

pub mod ingestion;
pub mod processing;
pub mod storage;
pub mod utils;

use metrics::histogram;
use serde::Serialize;
use std::time::Instant;
use tracing::{info, instrument};

use crate::config::ConvertConfig;
use crate::error::Result;
use crate::types::{CanonicalField, CleanedRecord, Metadata};
use ingestion::{load_sheets, CalamineWorkbook, WorkbookSource};
use processing::{build_metadata, merge, normalize_sheet, CleanStats, Cleaner};
use storage::{ExportReport, JsonExporter};

/// Row counts for one loaded sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub rows: usize,
    /// Rows carrying an order number
    pub valid_orders: usize,
}

/// Cleaned records and their summary, before anything is written
#[derive(Debug, Clone)]
pub struct Conversion {
    pub records: Vec<CleanedRecord>,
    pub metadata: Metadata,
    pub sheets: Vec<SheetSummary>,
    pub sheets_skipped: Vec<String>,
    pub rows_merged: usize,
    pub clean_stats: CleanStats,
}

/// Result of a complete pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineResult {
    pub sheets: Vec<SheetSummary>,
    pub sheets_skipped: Vec<String>,
    pub rows_merged: usize,
    pub rows_dropped: usize,
    pub records_written: usize,
    pub total_orders: usize,
    pub total_revenue: f64,
    pub exports: Vec<ExportReport>,
}

pub struct Pipeline;

impl Pipeline {
    /// Load, reconcile, merge, clean and summarize. Pure apart from reading
    /// the workbook.
    #[instrument(skip_all)]
    pub fn convert(source: &mut dyn WorkbookSource, config: &ConvertConfig) -> Result<Conversion> {
        let loaded = load_sheets(source, &config.sheets)?;
        let variants = config.column_variants();

        let mut sheets = Vec::with_capacity(loaded.sheets.len());
        let mut per_sheet = Vec::with_capacity(loaded.sheets.len());
        for sheet in &loaded.sheets {
            let rows = normalize_sheet(sheet, &variants);
            let valid_orders = rows
                .iter()
                .filter(|r| !r.get(CanonicalField::OrderNo).is_empty())
                .count();
            info!("Sheet '{}': {} valid records", sheet.name, valid_orders);
            sheets.push(SheetSummary {
                name: sheet.name.clone(),
                rows: rows.len(),
                valid_orders,
            });
            per_sheet.push(rows);
        }

        let merged = merge(per_sheet)?;
        let rows_merged = merged.len();

        let (records, clean_stats) = Cleaner::new(&config.cleaning).clean(merged);
        let metadata = build_metadata(&records, config);

        Ok(Conversion {
            records,
            metadata,
            sheets,
            sheets_skipped: loaded.skipped,
            rows_merged,
            clean_stats,
        })
    }

    /// Convert and write both JSON artifacts into the configured output directory
    pub fn run(source: &mut dyn WorkbookSource, config: &ConvertConfig) -> Result<PipelineResult> {
        let started = Instant::now();

        let conversion = Self::convert(source, config)?;
        let exports = JsonExporter::new(&config.output_dir)
            .export(&conversion.records, &conversion.metadata)?;

        histogram!("order_export_run_duration_seconds").record(started.elapsed().as_secs_f64());
        info!("Conversion complete in {:.2}s", started.elapsed().as_secs_f64());

        Ok(PipelineResult {
            sheets: conversion.sheets,
            sheets_skipped: conversion.sheets_skipped,
            rows_merged: conversion.rows_merged,
            rows_dropped: conversion.clean_stats.rows_dropped,
            records_written: conversion.records.len(),
            total_orders: conversion.metadata.total_orders,
            total_revenue: conversion.metadata.total_revenue,
            exports,
        })
    }

    /// Open the configured workbook file and run the whole pipeline on it
    pub fn run_workbook(config: &ConvertConfig) -> Result<PipelineResult> {
        let mut workbook = CalamineWorkbook::open(&config.workbook)?;
        Self::run(&mut workbook, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use crate::pipeline::ingestion::InMemoryWorkbook;
    use crate::types::CellValue;

    #[test]
    fn no_matching_sheets_is_fatal() {
        let mut workbook = InMemoryWorkbook::new().with_sheet("Summary", vec![]);
        let err = Pipeline::convert(&mut workbook, &ConvertConfig::default()).unwrap_err();
        assert!(matches!(err, ConvertError::NoData));
    }

    #[test]
    fn sheet_summaries_count_valid_orders() {
        let mut workbook = InMemoryWorkbook::new().with_sheet(
            "1-2000",
            vec![
                vec![CellValue::text("Order No"), CellValue::text("Order Total")],
                vec![CellValue::Number(1.0), CellValue::Number(5.0)],
                vec![CellValue::Empty, CellValue::Number(7.0)],
            ],
        );
        let conversion = Pipeline::convert(&mut workbook, &ConvertConfig::default()).unwrap();

        assert_eq!(
            conversion.sheets,
            vec![SheetSummary {
                name: "1-2000".to_string(),
                rows: 2,
                valid_orders: 1
            }]
        );
        assert_eq!(conversion.rows_merged, 2);
        assert_eq!(conversion.records.len(), 1);
        assert_eq!(conversion.sheets_skipped.len(), 6);
    }
}
