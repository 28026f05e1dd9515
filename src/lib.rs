//! # iss-tracker
//!
//! A small read-only HTTP API over the ISS orbital ephemeris: NASA's OEM
//! state vectors (position + velocity over time) plus the document's header,
//! metadata, and comment blocks.
//!
//! ## Routes
//!
//! | Route | Returns |
//! |---|---|
//! | `GET /comment` | the dataset's comment lines |
//! | `GET /header` | the OEM header mapping |
//! | `GET /metadata` | the data-segment metadata mapping |
//! | `GET /epochs?offset&limit` | a page of state vectors |
//! | `GET /epochs/{epoch}` | one state vector, by exact EPOCH |
//! | `GET /epochs/{epoch}/speed` | `{ "EPOCH", "Speed (km/s)" }` |
//! | `GET /now` | the state vector nearest to now, with its speed |
//!
//! Two legacy plain-text responses are preserved for existing clients: a
//! non-integer `offset`/`limit` answers `200 OK` with
//! `Invalid limit or offset parameter; must be an integer.`, and an unknown
//! EPOCH key answers `200 OK` with `Epoch not found.`.
//!
//! ## Shape
//!
//! The dataset comes from a [`provider::DatasetProvider`] — an injected
//! capability returning an immutable document snapshot — so the selection
//! and derivation logic in [`epoch`], [`kinematics`], and [`query`] stays
//! pure and testable without a server or a file.

pub mod config;
pub mod epoch;
pub mod error;
pub mod kinematics;
pub mod model;
pub mod provider;
pub mod query;
pub mod response;
pub mod routes;
mod server;

pub use config::Config;
pub use error::{Error, Result};
pub use model::{EphemerisDocument, EpochRecord};
pub use provider::{DatasetProvider, FileProvider, StaticProvider};
pub use routes::AppState;
pub use server::Server;
