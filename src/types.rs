use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single spreadsheet cell after the reader has resolved its type.
/// Every flavour of "missing" the reader can produce collapses to `Empty`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Render the cell the way it reads in the sheet. Integral numbers lose
    /// their fractional part so ids and phone numbers stay intact.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::DateTime(dt) => Some(dt.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

pub(crate) fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// The fixed target schema every sheet's headers are mapped onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CanonicalField {
    OrderNo,
    OrderDate,
    OrderTotal,
    CustomerName,
    Email,
    MobileNo,
    ShipTo,
    State,
    ItemName,
    ItemBrand,
}

impl CanonicalField {
    /// Declaration order; header resolution walks fields in this order
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::OrderNo,
        CanonicalField::OrderDate,
        CanonicalField::OrderTotal,
        CanonicalField::CustomerName,
        CanonicalField::Email,
        CanonicalField::MobileNo,
        CanonicalField::ShipTo,
        CanonicalField::State,
        CanonicalField::ItemName,
        CanonicalField::ItemBrand,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::OrderNo => "orderNo",
            CanonicalField::OrderDate => "orderDate",
            CanonicalField::OrderTotal => "orderTotal",
            CanonicalField::CustomerName => "customerName",
            CanonicalField::Email => "email",
            CanonicalField::MobileNo => "mobileNo",
            CanonicalField::ShipTo => "shipTo",
            CanonicalField::State => "state",
            CanonicalField::ItemName => "itemName",
            CanonicalField::ItemBrand => "itemBrand",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One sheet as read from the workbook: the header row and the data rows beneath it
#[derive(Debug, Clone, PartialEq)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<CellValue>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Split a 2D table into header row and data rows
    pub fn from_table(name: impl Into<String>, mut table: Vec<Vec<CellValue>>) -> Self {
        let headers = if table.is_empty() {
            Vec::new()
        } else {
            table.remove(0)
        };
        Self {
            name: name.into(),
            headers,
            rows: table,
        }
    }
}

/// A row projected onto the canonical schema, tagged with the sheet it came from
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRow {
    values: [CellValue; 10],
    pub source_sheet: String,
}

impl CanonicalRow {
    pub fn new(source_sheet: impl Into<String>) -> Self {
        Self {
            values: Default::default(),
            source_sheet: source_sheet.into(),
        }
    }

    pub fn get(&self, field: CanonicalField) -> &CellValue {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: CanonicalField, value: CellValue) {
        self.values[field.index()] = value;
    }

    pub fn with(mut self, field: CanonicalField, value: CellValue) -> Self {
        self.set(field, value);
        self
    }

    pub(crate) fn take(&mut self, field: CanonicalField) -> CellValue {
        std::mem::take(&mut self.values[field.index()])
    }
}

/// A validated order line as it appears in `orders.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedRecord {
    pub id: usize,
    pub order_no: String,
    pub order_date: Option<NaiveDate>,
    pub order_year: Option<i32>,
    pub order_month: Option<u32>,
    pub order_total: f64,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub mobile_no: Option<String>,
    pub ship_to: Option<String>,
    pub state: Option<String>,
    pub item_name: Option<String>,
    pub item_brand: Option<String>,
    #[serde(skip)]
    pub source_sheet: String,
}

impl CleanedRecord {
    pub fn order_date_iso(&self) -> Option<String> {
        self.order_date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub min: Option<String>,
    pub max: Option<String>,
}

/// Summary statistics consumed by the dashboard's filters and headline cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub total_orders: usize,
    pub total_records: usize,
    pub total_revenue: f64,
    pub date_range: DateRange,
    pub states: Vec<String>,
    pub brands: Vec<String>,
    pub unique_customers: usize,
    pub unique_items: usize,
}
