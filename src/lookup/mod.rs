//! Vehicle registry lookup.
//!
//! This module contains the outcome types for a single plate lookup and the client
//! that queries the data.gov.il CKAN datastore.
//!
//! Key re-exports:
//! - [`VehicleLookupClient`] - Issues one exact-match query per plate

mod client;
mod messages;

pub use client::VehicleLookupClient;

use serde_json::{Map, Value};

/// A vehicle row exactly as the registry returned it.
///
/// The registry schema is not validated; fields pass through to the caller untouched.
pub type VehicleRecord = Map<String, Value>;

/// Outcome of a single plate lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Found(VehicleRecord),
    NotFound,
    UpstreamError(LookupError),
}

/// Why the registry could not answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The registry answered with `success: false`.
    #[error("Vehicle registry returned an error")]
    Api,

    /// The call itself failed: timeout, connection error or unreadable response.
    #[error("{0}")]
    Transport(String),
}

impl LookupError {
    /// Raw failure text worth exposing to the caller, if any.
    pub fn detail(&self) -> Option<&str> {
        match self {
            LookupError::Api => None,
            LookupError::Transport(message) => Some(message),
        }
    }
}
