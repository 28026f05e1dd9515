//! HTTP handlers for the read-only ephemeris API.
//!
//! Each handler takes a document snapshot from the provider, projects or
//! derives what the route asks for, and renders the result. Error rendering
//! preserves the legacy plain-text contract: invalid paging parameters and
//! unknown epoch keys come back as `200 OK` text bodies with the exact
//! historical wording, while dataset-shape and arithmetic failures surface
//! as plain-text 500s. No structured error envelope anywhere.

use chrono::Utc;
use http::StatusCode;

use crate::error::{Error, Result};
use crate::model::EphemerisDocument;
use crate::provider::DatasetProvider;
use crate::query::{self, Page};
use crate::response::{self, Response};
use std::sync::Arc;

/// Shared per-process state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn DatasetProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn DatasetProvider>) -> Self {
        Self { provider }
    }
}

/// GET /comment
pub fn comment(state: &AppState) -> Response {
    with_document(state, |doc| Ok(response::json(&doc.comment()?)))
}

/// GET /header
pub fn header(state: &AppState) -> Response {
    with_document(state, |doc| Ok(response::json(&doc.header()?)))
}

/// GET /metadata
pub fn metadata(state: &AppState) -> Response {
    with_document(state, |doc| Ok(response::json(&doc.metadata()?)))
}

/// GET /epochs?offset&limit
pub fn epochs(state: &AppState, raw_query: Option<&str>) -> Response {
    with_document(state, |doc| {
        let page = Page::from_query(raw_query)?;
        Ok(response::json(&query::slice_epochs(doc.state_vectors()?, page)))
    })
}

/// GET /epochs/{epoch}
pub fn epoch_by_key(state: &AppState, key: &str) -> Response {
    with_document(state, |doc| {
        Ok(response::json(query::find_by_epoch(doc.state_vectors()?, key)?))
    })
}

/// GET /epochs/{epoch}/speed
pub fn epoch_speed(state: &AppState, key: &str) -> Response {
    with_document(state, |doc| {
        Ok(response::json(&query::speed_by_epoch(doc.state_vectors()?, key)?))
    })
}

/// GET /now
pub fn now(state: &AppState) -> Response {
    with_document(state, |doc| {
        Ok(response::json(&query::closest_with_speed(
            doc.state_vectors()?,
            Utc::now(),
        )?))
    })
}

fn with_document<F>(state: &AppState, f: F) -> Response
where
    F: FnOnce(&EphemerisDocument) -> Result<Response>,
{
    state
        .provider
        .document()
        .and_then(|doc| f(&doc))
        .unwrap_or_else(render_error)
}

fn render_error(err: Error) -> Response {
    let status = match err {
        // Legacy contract: parameter and lookup misses are 200-status text.
        Error::InvalidParameter | Error::NotFound => StatusCode::OK,
        Error::InvalidInput(_) | Error::DataUnavailable(_) | Error::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    response::text(status, err.to_string())
}
