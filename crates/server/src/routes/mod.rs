pub mod advice;
pub mod health;
pub mod historical;
pub mod predict;
pub mod series;

pub use advice::*;
pub use health::*;
pub use historical::*;
pub use predict::*;
pub use series::*;

use crate::{Coordinate, Error};

/// Request bodies carry coordinates as `Option` so a missing field produces
/// this message instead of a deserialization error.
pub(crate) fn require_coordinates(
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> Result<Coordinate, Error> {
    match (latitude, longitude) {
        (Some(latitude), Some(longitude)) => Coordinate::new(latitude, longitude),
        _ => Err(Error::validation("latitude and longitude are required")),
    }
}
