// Great-circle distance between two coordinates, spherical law of cosines.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

// Kilometers per degree of central angle
pub const KM_PER_DEGREE: f64 = 111.111;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// Distance in kilometers between `from` and `to`.
//
// The cosine of the central angle is clamped to `[-1, 1]` so that float
// overshoot on coincident or antipodal points never reaches `acos` out of
// its domain. Non-finite coordinates are rejected.
pub fn distance_km(from: GeoPoint, to: GeoPoint) -> Result<f64, CatalogError> {
    for value in [from.lat, from.lng, to.lat, to.lng] {
        if !value.is_finite() {
            return Err(CatalogError::NumericDomain(format!(
                "non-finite coordinate {value}"
            )));
        }
    }

    // acos near 1.0 leaves a residual angle after rounding
    if from == to {
        return Ok(0.0);
    }

    let (lat1, lat2) = (from.lat.to_radians(), to.lat.to_radians());
    let delta_lng = (to.lng - from.lng).to_radians();

    let cos_angle = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * delta_lng.cos();
    let angle = cos_angle.clamp(-1.0, 1.0).acos();

    Ok(KM_PER_DEGREE * angle.to_degrees())
}
