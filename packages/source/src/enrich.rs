//! Record enrichment: address parsing, categorization and placement.

use rand::Rng;
use service_map_service_models::{EnrichedServiceRecord, ServiceRecord};

use crate::address::parse_address;
use crate::category::classify;
use crate::centroid::{Jitter, ZipCentroidTable};

/// Derives an [`EnrichedServiceRecord`] from a raw record.
///
/// Everything but the jitter is a pure function of `record` and `table`.
pub fn enrich<R: Rng + ?Sized>(
    record: &ServiceRecord,
    table: &ZipCentroidTable,
    jitter: &Jitter,
    rng: &mut R,
) -> EnrichedServiceRecord {
    let parsed = parse_address(record.address.as_deref());
    let category = classify(Some(record.name.as_str()), record.description.as_deref());
    let base = table.base_coordinates(parsed.zip_code.as_deref());
    let position = jitter.apply(base, rng);

    EnrichedServiceRecord {
        name: record.name.clone(),
        address: parsed.clean_address,
        zip_code: parsed.zip_code,
        phone: record.phone.clone(),
        website: record.website.clone(),
        description: record.description.clone(),
        category,
        latitude: position.latitude,
        longitude: position.longitude,
    }
}

/// Enriches every record in order, drawing jitter from a single `rng`.
pub fn enrich_all<R: Rng + ?Sized>(
    records: &[ServiceRecord],
    table: &ZipCentroidTable,
    jitter: &Jitter,
    rng: &mut R,
) -> Vec<EnrichedServiceRecord> {
    log::info!(
        "Assigning coordinates to {} services using the {} centroid table",
        records.len(),
        table.name
    );
    records
        .iter()
        .map(|record| enrich(record, table, jitter, &mut *rng))
        .collect()
}
