pub mod dates;

use chrono::Datelike;
use metrics::counter;
use tracing::{info, instrument, warn};

use crate::config::CleaningConfig;
use crate::pipeline::utils::StringUtils;
use crate::types::{format_number, CanonicalField, CanonicalRow, CellValue, CleanedRecord};

pub use dates::{parse_date_text, parse_order_date};

const BRAND_DASHES: &[char] = &['-', '\u{2013}', '\u{2014}'];

/// What the cleaner did to the merged table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanStats {
    pub rows_dropped: usize,
    pub dates_unparsed: usize,
    pub totals_defaulted: usize,
}

/// Field-level normalization and the order-number filter. Every coercion
/// degrades to null or zero; nothing here fails.
pub struct Cleaner<'a> {
    config: &'a CleaningConfig,
}

impl<'a> Cleaner<'a> {
    pub fn new(config: &'a CleaningConfig) -> Self {
        Self { config }
    }

    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn clean(&self, rows: Vec<CanonicalRow>) -> (Vec<CleanedRecord>, CleanStats) {
        let mut stats = CleanStats::default();
        let mut records = Vec::with_capacity(rows.len());

        for mut row in rows {
            self.scrub(&mut row);

            let Some(order_no) = self.order_no(row.get(CanonicalField::OrderNo)) else {
                stats.rows_dropped += 1;
                continue;
            };

            let date_cell = row.take(CanonicalField::OrderDate);
            let order_date = parse_order_date(&date_cell);
            if order_date.is_none() && !date_cell.is_empty() {
                stats.dates_unparsed += 1;
            }

            let order_total = match self.total(row.get(CanonicalField::OrderTotal)) {
                Some(total) => total,
                None => {
                    stats.totals_defaulted += 1;
                    0.0
                }
            };

            records.push(CleanedRecord {
                id: records.len() + 1,
                order_no,
                order_date,
                order_year: order_date.map(|d| d.year()),
                order_month: order_date.map(|d| d.month()),
                order_total,
                customer_name: self.text(row.get(CanonicalField::CustomerName)),
                email: self.text(row.get(CanonicalField::Email)),
                mobile_no: self.text(row.get(CanonicalField::MobileNo)),
                ship_to: self.text(row.get(CanonicalField::ShipTo)),
                state: self.state(row.get(CanonicalField::State)),
                item_name: self.text(row.get(CanonicalField::ItemName)),
                item_brand: self.brand(row.get(CanonicalField::ItemBrand)),
                source_sheet: std::mem::take(&mut row.source_sheet),
            });
        }

        info!(
            "Records after cleaning: {} ({} rows without order number dropped)",
            records.len(),
            stats.rows_dropped
        );
        counter!("order_export_rows_dropped_total").increment(stats.rows_dropped as u64);
        counter!("order_export_dates_unparsed_total").increment(stats.dates_unparsed as u64);
        counter!("order_export_totals_defaulted_total").increment(stats.totals_defaulted as u64);

        (records, stats)
    }

    /// Collapse stringified missing markers to `Empty` before any other rule runs
    fn scrub(&self, row: &mut CanonicalRow) {
        for field in CanonicalField::ALL {
            let missing = matches!(
                row.get(field),
                CellValue::Text(text) if StringUtils::clean_text(text, &self.config.text_null_tokens).is_none()
            );
            if missing {
                row.set(field, CellValue::Empty);
            }
        }
    }

    /// Numeric order numbers are truncated toward zero, so `1001.5` and
    /// `1001` count as the same order.
    pub fn order_no(&self, cell: &CellValue) -> Option<String> {
        match cell {
            CellValue::Number(n) if n.is_finite() && n.fract() != 0.0 => {
                let truncated = format_number(n.trunc());
                warn!("Fractional order number {} truncated to {}", n, truncated);
                Some(truncated)
            }
            _ => cell
                .to_text()
                .map(|text| text.trim().to_string())
                .filter(|text| !text.is_empty()),
        }
    }

    /// Uppercase, resolve aliases, then null out anything that looks like a
    /// stringified null. Canonical alias targets are never nulled.
    pub fn state(&self, cell: &CellValue) -> Option<String> {
        let raw = cell.to_text()?.trim().to_uppercase();
        let state = self
            .config
            .state_aliases
            .get(&raw)
            .cloned()
            .unwrap_or(raw);

        if StringUtils::is_token(&state, &self.config.state_null_tokens) {
            return None;
        }
        let canonical = self.config.state_aliases.values().any(|v| *v == state);
        if !canonical
            && self
                .config
                .state_null_substrings
                .iter()
                .any(|s| state.contains(&s.to_uppercase()))
        {
            return None;
        }
        Some(state)
    }

    /// Order total with separators and currency markers removed; `None`
    /// when nothing numeric is left
    pub fn total(&self, cell: &CellValue) -> Option<f64> {
        match cell {
            CellValue::Number(n) if n.is_finite() => Some(*n),
            CellValue::Text(text) => {
                let mut cleaned = text.replace(',', "");
                for marker in &self.config.currency_markers {
                    cleaned = cleaned.replace(marker.as_str(), "");
                }
                cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
            }
            _ => None,
        }
    }

    pub fn text(&self, cell: &CellValue) -> Option<String> {
        cell.to_text()
            .and_then(|text| StringUtils::clean_text(&text, &self.config.text_null_tokens))
    }

    pub fn brand(&self, cell: &CellValue) -> Option<String> {
        self.text(cell).and_then(|brand| {
            StringUtils::clean_text(
                brand.trim_start_matches(BRAND_DASHES),
                &self.config.text_null_tokens,
            )
        })
    }
}
