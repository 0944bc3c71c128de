//! plate-relay: an HTTP relay for Israeli vehicle registration lookups.
//!
//! Accepts a license plate over REST, strips it to digits, queries the data.gov.il
//! vehicle registry with an exact-match filter, and returns a small JSON envelope.

pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod middleware;
pub mod plate;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use lookup::{LookupError, LookupResult, VehicleLookupClient, VehicleRecord};
pub use plate::{normalize, PlateQuery};
pub use routes::create_router;
pub use state::AppState;
