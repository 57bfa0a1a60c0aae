#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics over enriched service records.
//!
//! [`summarize`] aggregates a dataset into a [`ServiceSummary`] and
//! [`format_report`] renders it as the plain-text report printed by the
//! generate tool.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use service_map_analytics_models::{CategoryCount, Coverage, ServiceSummary, ZipCount};
use service_map_service_models::{EnrichedServiceRecord, ServiceCategory};

/// Maximum number of zip codes listed in a summary.
pub const TOP_ZIP_LIMIT: usize = 10;

/// Computes summary statistics for `records`.
#[must_use]
pub fn summarize(records: &[EnrichedServiceRecord]) -> ServiceSummary {
    let total = records.len() as u64;

    let mut category_counts: BTreeMap<ServiceCategory, u64> = BTreeMap::new();
    let mut zip_counts: BTreeMap<&str, u64> = BTreeMap::new();
    let mut with_phone = 0;
    let mut with_website = 0;

    for record in records {
        *category_counts.entry(record.category).or_default() += 1;
        if let Some(zip) = record.zip_code.as_deref() {
            *zip_counts.entry(zip).or_default() += 1;
        }
        if record.has_phone() {
            with_phone += 1;
        }
        if record.has_website() {
            with_website += 1;
        }
    }

    // BTreeMap iteration is in priority order, and the sort is stable, so
    // ties keep that order.
    let mut by_category: Vec<CategoryCount> = category_counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category,
            count,
            percentage: percentage(count, total),
        })
        .collect();
    by_category.sort_by(|a, b| b.count.cmp(&a.count));

    let mut top_zip_codes: Vec<ZipCount> = zip_counts
        .into_iter()
        .map(|(zip_code, count)| ZipCount {
            zip_code: zip_code.to_string(),
            count,
        })
        .collect();
    top_zip_codes.sort_by(|a, b| b.count.cmp(&a.count));
    top_zip_codes.truncate(TOP_ZIP_LIMIT);

    ServiceSummary {
        total,
        by_category,
        top_zip_codes,
        with_phone: coverage(with_phone, total),
        with_website: coverage(with_website, total),
    }
}

/// Renders a summary as a plain-text report.
///
/// # Panics
///
/// Panics if writing to the output `String` fails.
#[must_use]
pub fn format_report(summary: &ServiceSummary) -> String {
    let mut out = String::new();

    writeln!(out, "=== HOMELESS SERVICES SUMMARY ===").unwrap();
    writeln!(out, "Total Services: {}", summary.total).unwrap();

    writeln!(out, "\nService Type Breakdown:").unwrap();
    for entry in &summary.by_category {
        writeln!(
            out,
            "  {}: {} ({:.1}%)",
            entry.category, entry.count, entry.percentage
        )
        .unwrap();
    }

    writeln!(out, "\nTop {TOP_ZIP_LIMIT} Areas by Service Count:").unwrap();
    for entry in &summary.top_zip_codes {
        writeln!(out, "  {}: {} services", entry.zip_code, entry.count).unwrap();
    }

    writeln!(out, "\nContact Information:").unwrap();
    writeln!(
        out,
        "  Services with phone: {} ({:.1}%)",
        summary.with_phone.count, summary.with_phone.percentage
    )
    .unwrap();
    writeln!(
        out,
        "  Services with website: {} ({:.1}%)",
        summary.with_website.count, summary.with_website.percentage
    )
    .unwrap();

    out
}

#[allow(clippy::cast_precision_loss)]
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

fn coverage(count: u64, total: u64) -> Coverage {
    Coverage {
        count,
        percentage: percentage(count, total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(
        category: ServiceCategory,
        zip: Option<&str>,
        phone: Option<&str>,
        website: Option<&str>,
    ) -> EnrichedServiceRecord {
        EnrichedServiceRecord {
            name: "Test".to_string(),
            address: None,
            zip_code: zip.map(str::to_string),
            phone: phone.map(str::to_string),
            website: website.map(str::to_string),
            description: None,
            category,
            latitude: 32.7157,
            longitude: -117.1611,
        }
    }

    fn sample() -> Vec<EnrichedServiceRecord> {
        vec![
            record(ServiceCategory::ShelterHousing, Some("92101"), Some("619-555-0100"), None),
            record(ServiceCategory::ShelterHousing, Some("92101"), None, Some("https://a.org")),
            record(ServiceCategory::FoodServices, Some("92113"), Some(" "), None),
            record(ServiceCategory::Other, None, None, None),
        ]
    }

    #[test]
    fn counts_categories_largest_first() {
        let summary = summarize(&sample());
        assert_eq!(summary.total, 4);
        let cats: Vec<(ServiceCategory, u64)> = summary
            .by_category
            .iter()
            .map(|c| (c.category, c.count))
            .collect();
        assert_eq!(
            cats,
            [
                (ServiceCategory::ShelterHousing, 2),
                (ServiceCategory::FoodServices, 1),
                (ServiceCategory::Other, 1),
            ]
        );
        assert!((summary.by_category[0].percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn category_percentages_sum_to_100() {
        let records: Vec<EnrichedServiceRecord> = ServiceCategory::all()
            .iter()
            .cycle()
            .take(37)
            .map(|c| record(*c, None, None, None))
            .collect();
        let summary = summarize(&records);
        let sum: f64 = summary.by_category.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9, "sum was {sum}");
    }

    #[test]
    fn top_zips_exclude_missing_and_break_ties_by_zip() {
        let summary = summarize(&sample());
        assert_eq!(
            summary.top_zip_codes,
            [
                ZipCount {
                    zip_code: "92101".to_string(),
                    count: 2
                },
                ZipCount {
                    zip_code: "92113".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn top_zips_capped_at_ten() {
        let records: Vec<EnrichedServiceRecord> = (0..15)
            .map(|i| {
                let zip = format!("921{i:02}");
                record(ServiceCategory::Other, Some(&zip), None, None)
            })
            .collect();
        assert_eq!(summarize(&records).top_zip_codes.len(), TOP_ZIP_LIMIT);
    }

    #[test]
    fn blank_contacts_are_not_counted() {
        let summary = summarize(&sample());
        assert_eq!(summary.with_phone.count, 1);
        assert_eq!(summary.with_website.count, 1);
        assert!((summary.with_phone.percentage - 25.0).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_has_zero_percentages() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_category.is_empty());
        assert!(summary.with_phone.percentage.abs() < f64::EPSILON);
    }

    #[test]
    fn report_lists_every_section() {
        let report = format_report(&summarize(&sample()));
        assert!(report.contains("Total Services: 4"));
        assert!(report.contains("  Shelter/Housing: 2 (50.0%)"));
        assert!(report.contains("  92101: 2 services"));
        assert!(report.contains("  Services with phone: 1 (25.0%)"));
        assert!(report.contains("  Services with website: 1 (25.0%)"));
    }
}
