//! EPOCH timestamp parsing and nearest-epoch selection.
//!
//! Timestamps use the OEM day-of-year form `YYYY-DDDTHH:MM:SS.sssZ`
//! (e.g. `2024-057T12:00:00.000Z`). Both the recorded epochs and the
//! reference instant are UTC, so distances are plain duration differences.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};

use crate::error::{Error, Result};
use crate::model::EpochRecord;

/// chrono format string for the OEM day-of-year timestamp.
pub const EPOCH_FORMAT: &str = "%Y-%jT%H:%M:%S%.fZ";

/// Parses an EPOCH field into a UTC instant.
pub fn parse_epoch(epoch: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(epoch, EPOCH_FORMAT)
        .map(|t| t.and_utc())
        .map_err(|e| Error::InvalidInput(format!("unparseable EPOCH {epoch:?}: {e}")))
}

/// Returns the record whose EPOCH is closest in absolute time to `reference`.
///
/// Linear scan; strict-less comparison keeps the first record on ties, which
/// is the earliest timestamp since the input is time-ordered. An empty slice
/// or any unparseable EPOCH is an error; no record is skipped silently.
pub fn find_closest_epoch<'a>(
    records: &'a [EpochRecord],
    reference: DateTime<Utc>,
) -> Result<&'a EpochRecord> {
    let mut best: Option<(&EpochRecord, TimeDelta)> = None;
    for record in records {
        let distance = (parse_epoch(&record.epoch)? - reference).abs();
        if best.is_none_or(|(_, min)| distance < min) {
            best = Some((record, distance));
        }
    }
    best.map(|(record, _)| record)
        .ok_or_else(|| Error::InvalidInput("no state vectors in dataset".into()))
}
