use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{info, instrument};

use crate::config::ConvertConfig;
use crate::pipeline::utils::StringUtils;
use crate::types::{CleanedRecord, DateRange, Metadata};

/// Summary statistics over the cleaned records.
///
/// Revenue counts each order once: the `orderTotal` of the first row seen for
/// an order number is taken as the order-level total, later rows of the same
/// order are ignored.
#[instrument(skip_all, fields(records = records.len()))]
pub fn build_metadata(records: &[CleanedRecord], config: &ConvertConfig) -> Metadata {
    let cleaning = &config.cleaning;

    let mut first_totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in records {
        first_totals
            .entry(record.order_no.as_str())
            .or_insert(record.order_total);
    }
    let total_revenue: f64 = first_totals.values().sum();

    let min = records.iter().filter_map(|r| r.order_date).min();
    let max = records.iter().filter_map(|r| r.order_date).max();

    let states: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.state.as_deref())
        .filter(|s| !StringUtils::is_token(s, &cleaning.state_null_tokens))
        .collect();

    let brands: BTreeSet<&str> = records
        .iter()
        .filter_map(|r| r.item_brand.as_deref())
        .filter(|b| !StringUtils::is_token(b, &cleaning.brand_excluded))
        .collect();

    let customers: HashSet<&str> = records.iter().filter_map(|r| r.customer_name.as_deref()).collect();
    let items: HashSet<&str> = records.iter().filter_map(|r| r.item_name.as_deref()).collect();

    let metadata = Metadata {
        total_orders: first_totals.len(),
        total_records: records.len(),
        total_revenue,
        date_range: DateRange {
            min: min.map(|d| d.format("%Y-%m-%d").to_string()),
            max: max.map(|d| d.format("%Y-%m-%d").to_string()),
        },
        states: states.into_iter().map(str::to_string).collect(),
        brands: brands
            .into_iter()
            .take(config.brand_limit)
            .map(str::to_string)
            .collect(),
        unique_customers: customers.len(),
        unique_items: items.len(),
    };

    info!("Total unique orders: {}", metadata.total_orders);
    info!("Total revenue: RM {:.2}", metadata.total_revenue);
    info!(
        "States: {}, brands: {}, unique customers: {}, unique items: {}",
        metadata.states.len(),
        metadata.brands.len(),
        metadata.unique_customers,
        metadata.unique_items
    );

    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: usize, order_no: &str, total: f64) -> CleanedRecord {
        CleanedRecord {
            id,
            order_no: order_no.to_string(),
            order_date: None,
            order_year: None,
            order_month: None,
            order_total: total,
            customer_name: None,
            email: None,
            mobile_no: None,
            ship_to: None,
            state: None,
            item_name: None,
            item_brand: None,
            source_sheet: "1-2000".to_string(),
        }
    }

    #[test]
    fn revenue_takes_first_total_per_order() {
        let config = ConvertConfig::default();
        let records = vec![
            record(1, "1001", 1000.0),
            record(2, "1002", 50.0),
            record(3, "1001", 9999.0),
        ];
        let metadata = build_metadata(&records, &config);
        assert_eq!(metadata.total_orders, 2);
        assert_eq!(metadata.total_records, 3);
        assert_eq!(metadata.total_revenue, 1050.0);

        // Changing a non-first duplicate leaves revenue alone
        let mut changed = records.clone();
        changed[2].order_total = 1.0;
        assert_eq!(build_metadata(&changed, &config).total_revenue, 1050.0);
    }

    #[test]
    fn date_range_spans_valid_dates_only() {
        let config = ConvertConfig::default();
        let mut a = record(1, "1", 0.0);
        a.order_date = NaiveDate::from_ymd_opt(2024, 5, 1);
        let mut b = record(2, "2", 0.0);
        b.order_date = NaiveDate::from_ymd_opt(2023, 11, 30);
        let c = record(3, "3", 0.0);

        let metadata = build_metadata(&[a, b, c], &config);
        assert_eq!(metadata.date_range.min.as_deref(), Some("2023-11-30"));
        assert_eq!(metadata.date_range.max.as_deref(), Some("2024-05-01"));

        let empty = build_metadata(&[record(1, "1", 0.0)], &config);
        assert_eq!(empty.date_range, DateRange { min: None, max: None });
    }

    #[test]
    fn distinct_sets_are_sorted_and_filtered() {
        let mut config = ConvertConfig::default();
        config.brand_limit = 2;

        let mut records = Vec::new();
        for (i, (state, brand, customer)) in [
            (Some("SELANGOR"), Some("Nestle"), Some("Ali")),
            (Some("JOHOR"), Some("-"), Some("Ali")),
            (Some("NAN"), Some("Ayam Brand"), None),
            (None, Some("Zest"), Some("Siti")),
            (Some("JOHOR"), Some("Nestle"), Some("Siti")),
        ]
        .into_iter()
        .enumerate()
        {
            let mut r = record(i + 1, &format!("{}", 100 + i), 1.0);
            r.state = state.map(String::from);
            r.item_brand = brand.map(String::from);
            r.customer_name = customer.map(String::from);
            r.item_name = Some(format!("item-{}", i % 2));
            records.push(r);
        }

        let metadata = build_metadata(&records, &config);
        assert_eq!(metadata.states, vec!["JOHOR", "SELANGOR"]);
        assert_eq!(metadata.brands, vec!["Ayam Brand", "Nestle"]);
        assert_eq!(metadata.unique_customers, 2);
        assert_eq!(metadata.unique_items, 2);
    }

    #[test]
    fn serializes_dashboard_keys() {
        let metadata = build_metadata(&[record(1, "1001", 10.0)], &ConvertConfig::default());
        let json = serde_json::to_value(&metadata).unwrap();
        for key in [
            "totalOrders",
            "totalRecords",
            "totalRevenue",
            "dateRange",
            "states",
            "brands",
            "uniqueCustomers",
            "uniqueItems",
        ] {
            assert!(json.get(key).is_some(), "missing {}", key);
        }
        assert!(json["dateRange"]["min"].is_null());
    }
}
