//! The ephemeris document model.
//!
//! NASA publishes the ISS trajectory as an NDM/OEM document; the interesting
//! parts sit several levels deep:
//!
//! ```text
//! ndm.oem.header                            descriptive metadata mapping
//! ndm.oem.body.segment.metadata             data-segment mapping (object, frame, span)
//! ndm.oem.body.segment.data.COMMENT         ordered comment strings
//! ndm.oem.body.segment.data.stateVector     the epoch records, time-ascending
//! ```
//!
//! Every level is optional in the deserialized form. The accessors on
//! [`EphemerisDocument`] walk the nesting and fail with
//! [`Error::DataUnavailable`] at the first missing level, so a malformed
//! document is reported at projection time rather than rejected at load.
//!
//! Numeric components keep their source representation: a `#text` string and
//! a `@units` attribute. Records round-trip through JSON byte-for-byte; the
//! numeric parse only happens when a derived quantity needs it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Root of the parsed ephemeris dataset. Immutable once produced by the
/// provider; requests hold a read-only snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EphemerisDocument {
    pub ndm: Option<Ndm>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ndm {
    pub oem: Option<Oem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Oem {
    pub header: Option<Map<String, Value>>,
    pub body: Option<OemBody>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OemBody {
    pub segment: Option<OemSegment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OemSegment {
    pub metadata: Option<Map<String, Value>>,
    pub data: Option<SegmentData>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentData {
    #[serde(rename = "COMMENT")]
    pub comment: Option<Vec<String>>,
    #[serde(rename = "stateVector")]
    pub state_vectors: Option<Vec<EpochRecord>>,
}

/// A numeric field as the source ships it: text value plus unit attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueWithUnits {
    #[serde(rename = "#text")]
    pub text: String,
    #[serde(rename = "@units", skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

/// One state vector: position and velocity at a single EPOCH.
///
/// EPOCH strings are unique within a document and assumed time-ascending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    #[serde(rename = "EPOCH")]
    pub epoch: String,
    #[serde(rename = "X")]
    pub x: ValueWithUnits,
    #[serde(rename = "Y")]
    pub y: ValueWithUnits,
    #[serde(rename = "Z")]
    pub z: ValueWithUnits,
    #[serde(rename = "X_DOT")]
    pub x_dot: ValueWithUnits,
    #[serde(rename = "Y_DOT")]
    pub y_dot: ValueWithUnits,
    #[serde(rename = "Z_DOT")]
    pub z_dot: ValueWithUnits,
}

impl EphemerisDocument {
    fn oem(&self) -> Result<&Oem> {
        self.ndm
            .as_ref()
            .and_then(|ndm| ndm.oem.as_ref())
            .ok_or_else(|| missing("ndm.oem"))
    }

    fn segment(&self) -> Result<&OemSegment> {
        self.oem()?
            .body
            .as_ref()
            .and_then(|body| body.segment.as_ref())
            .ok_or_else(|| missing("ndm.oem.body.segment"))
    }

    fn data(&self) -> Result<&SegmentData> {
        self.segment()?
            .data
            .as_ref()
            .ok_or_else(|| missing("ndm.oem.body.segment.data"))
    }

    pub fn header(&self) -> Result<&Map<String, Value>> {
        self.oem()?
            .header
            .as_ref()
            .ok_or_else(|| missing("ndm.oem.header"))
    }

    pub fn metadata(&self) -> Result<&Map<String, Value>> {
        self.segment()?
            .metadata
            .as_ref()
            .ok_or_else(|| missing("ndm.oem.body.segment.metadata"))
    }

    pub fn comment(&self) -> Result<&[String]> {
        self.data()?
            .comment
            .as_deref()
            .ok_or_else(|| missing("ndm.oem.body.segment.data.COMMENT"))
    }

    pub fn state_vectors(&self) -> Result<&[EpochRecord]> {
        self.data()?
            .state_vectors
            .as_deref()
            .ok_or_else(|| missing("ndm.oem.body.segment.data.stateVector"))
    }
}

impl EpochRecord {
    /// Parses the three velocity components, in km/s.
    pub fn velocity_kms(&self) -> Result<(f64, f64, f64)> {
        Ok((
            component("X_DOT", &self.x_dot)?,
            component("Y_DOT", &self.y_dot)?,
            component("Z_DOT", &self.z_dot)?,
        ))
    }

    /// Parses the three position components, in km.
    pub fn position_km(&self) -> Result<(f64, f64, f64)> {
        Ok((
            component("X", &self.x)?,
            component("Y", &self.y)?,
            component("Z", &self.z)?,
        ))
    }
}

fn component(name: &str, value: &ValueWithUnits) -> Result<f64> {
    value
        .text
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("{name} is not numeric: {:?}", value.text)))
}

fn missing(path: &str) -> Error {
    Error::DataUnavailable(format!("document is missing {path}"))
}
