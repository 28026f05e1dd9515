//! Query parameter contract and epoch selection policy.
//!
//! This is the dispatch core the HTTP handlers delegate to. Paging is always
//! a clamped window: `[min(offset, len), min(offset + limit, len))`, with
//! `limit` defaulting to the remainder of the dataset. Out-of-range values
//! truncate rather than error; `limit=0` is an empty page. The historical
//! behavior of returning the whole dataset when both parameters were zero is
//! gone on purpose (see DESIGN.md).

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::epoch::find_closest_epoch;
use crate::error::{Error, Result};
use crate::kinematics::record_speed;
use crate::model::EpochRecord;

/// Parsed `offset`/`limit` query parameters.
///
/// Both must be non-negative integers; anything else (including a negative
/// value, which would index out of range) is [`Error::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl Page {
    /// Extracts `offset` and `limit` from a raw query string.
    ///
    /// Unknown keys are ignored; the first occurrence of a key wins. An
    /// absent or `None` query yields the full-dataset page.
    pub fn from_query(raw: Option<&str>) -> Result<Self> {
        let mut offset = None;
        let mut limit = None;
        for pair in raw.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let slot = match key {
                "offset" => &mut offset,
                "limit" => &mut limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.parse::<usize>().map_err(|_| Error::InvalidParameter)?);
            }
        }
        Ok(Self { offset: offset.unwrap_or(0), limit })
    }
}

/// The contiguous sub-sequence selected by `page`, truncated at the end of
/// the dataset. Never errors on overrun; may be empty.
pub fn slice_epochs<'a>(records: &'a [EpochRecord], page: Page) -> &'a [EpochRecord] {
    let start = page.offset.min(records.len());
    let limit = page.limit.unwrap_or(records.len() - start);
    let end = start.saturating_add(limit).min(records.len());
    &records[start..end]
}

/// First record whose EPOCH matches `key` exactly.
pub fn find_by_epoch<'a>(records: &'a [EpochRecord], key: &str) -> Result<&'a EpochRecord> {
    records
        .iter()
        .find(|record| record.epoch == key)
        .ok_or(Error::NotFound)
}

/// Speed of a record looked up by exact EPOCH key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedResult {
    #[serde(rename = "EPOCH")]
    pub epoch: String,
    #[serde(rename = "Speed (km/s)")]
    pub speed_kms: f64,
}

pub fn speed_by_epoch(records: &[EpochRecord], key: &str) -> Result<SpeedResult> {
    let record = find_by_epoch(records, key)?;
    Ok(SpeedResult {
        epoch: record.epoch.clone(),
        speed_kms: record_speed(record)?,
    })
}

/// A full state vector augmented with its instantaneous speed.
#[derive(Debug, Clone, Serialize)]
pub struct AugmentedRecord {
    #[serde(flatten)]
    pub record: EpochRecord,
    #[serde(rename = "Speed (km/s)")]
    pub speed_kms: f64,
}

/// Record closest to `reference`, augmented with its speed. This backs the
/// `/now` route, where `reference` is the wall clock at dispatch time.
pub fn closest_with_speed(
    records: &[EpochRecord],
    reference: DateTime<Utc>,
) -> Result<AugmentedRecord> {
    let record = find_closest_epoch(records, reference)?;
    Ok(AugmentedRecord {
        speed_kms: record_speed(record)?,
        record: record.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epoch::parse_epoch;

    fn record(epoch: &str, vx: &str, vy: &str, vz: &str) -> EpochRecord {
        let json = format!(
            r##"{{
              "EPOCH": "{epoch}",
              "X": {{ "#text": "1.0" }}, "Y": {{ "#text": "2.0" }}, "Z": {{ "#text": "3.0" }},
              "X_DOT": {{ "#text": "{vx}" }}, "Y_DOT": {{ "#text": "{vy}" }}, "Z_DOT": {{ "#text": "{vz}" }}
            }}"##
        );
        serde_json::from_str(&json).unwrap()
    }

    fn dataset(n: usize) -> Vec<EpochRecord> {
        (0..n)
            .map(|i| record(&format!("2024-057T{i:02}:00:00.000Z"), "1", "2", "2"))
            .collect()
    }

    #[test]
    fn query_parsing_defaults_and_values() {
        assert_eq!(Page::from_query(None).unwrap(), Page { offset: 0, limit: None });
        assert_eq!(
            Page::from_query(Some("offset=3&limit=2")).unwrap(),
            Page { offset: 3, limit: Some(2) }
        );
        // Unknown keys ignored; first occurrence wins.
        assert_eq!(
            Page::from_query(Some("format=json&limit=1&limit=9")).unwrap(),
            Page { offset: 0, limit: Some(1) }
        );
    }

    #[test]
    fn query_parsing_rejects_non_integers() {
        assert!(matches!(Page::from_query(Some("limit=abc")), Err(Error::InvalidParameter)));
        assert!(matches!(Page::from_query(Some("offset=-1")), Err(Error::InvalidParameter)));
        assert!(matches!(Page::from_query(Some("offset=1.5")), Err(Error::InvalidParameter)));
        assert!(matches!(Page::from_query(Some("limit=")), Err(Error::InvalidParameter)));
    }

    #[test]
    fn slicing_clamps_to_dataset_bounds() {
        let records = dataset(5);
        let all = slice_epochs(&records, Page { offset: 0, limit: None });
        assert_eq!(all.len(), 5);

        let first_two = slice_epochs(&records, Page { offset: 0, limit: Some(2) });
        assert_eq!(first_two.len(), 2);
        assert_eq!(first_two[0].epoch, records[0].epoch);
        assert_eq!(first_two[1].epoch, records[1].epoch);

        // Overrun truncates rather than erroring.
        assert_eq!(slice_epochs(&records, Page { offset: 4, limit: Some(10) }).len(), 1);
        assert!(slice_epochs(&records, Page { offset: 5, limit: None }).is_empty());
        assert!(slice_epochs(&records, Page { offset: 99, limit: Some(3) }).is_empty());

        // Zero limit is an empty page, not the full dataset.
        assert!(slice_epochs(&records, Page { offset: 0, limit: Some(0) }).is_empty());
    }

    #[test]
    fn lookup_by_exact_key() {
        let records = dataset(3);
        let hit = find_by_epoch(&records, "2024-057T01:00:00.000Z").unwrap();
        assert_eq!(hit.epoch, "2024-057T01:00:00.000Z");
        assert!(matches!(
            find_by_epoch(&records, "2024-058T00:00:00.000Z"),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn speed_by_epoch_computes_magnitude() {
        let records = vec![record("2024-057T00:00:00.000Z", "3", "4", "0")];
        let result = speed_by_epoch(&records, "2024-057T00:00:00.000Z").unwrap();
        assert_eq!(result.speed_kms, 5.0);
        assert_eq!(result.epoch, "2024-057T00:00:00.000Z");
    }

    #[test]
    fn closest_with_speed_augments_record() {
        let records = vec![
            record("2024-057T00:00:00.000Z", "1", "2", "2"),
            record("2024-057T06:00:00.000Z", "3", "4", "0"),
        ];
        let reference = parse_epoch("2024-057T05:00:00.000Z").unwrap();
        let now = closest_with_speed(&records, reference).unwrap();
        assert_eq!(now.record.epoch, "2024-057T06:00:00.000Z");
        assert_eq!(now.speed_kms, 5.0);

        let json = serde_json::to_value(&now).unwrap();
        assert_eq!(json["EPOCH"], "2024-057T06:00:00.000Z");
        assert_eq!(json["Speed (km/s)"], 5.0);
    }
}
