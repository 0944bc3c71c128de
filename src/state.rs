//! Shared application state for request handlers.

use crate::lookup::VehicleLookupClient;

/// Shared application state, cloneable across handlers.
///
/// Immutable after startup; requests never contend on it.
#[derive(Clone)]
pub struct AppState {
    pub vehicles: VehicleLookupClient,
}

impl AppState {
    pub fn new(vehicles: VehicleLookupClient) -> Self {
        Self { vehicles }
    }
}
