//! Business-rule validation for incoming search parameters.
//!
//! These checks are pure and independent: each returns a distinct typed error
//! so the HTTP layer can report a specific reason without pattern-matching on
//! message text. None of them touch the store.

use tracing::warn;

use crate::error::{Error, Result};

/// Maximum allowed search radius in kilometers.
///
/// Single authoritative cap; the validator and the public API docs must
/// never disagree on this value.
pub const MAX_RADIUS_KM: f64 = 500.0;

/// Check that a parcel identifier is non-empty after trimming.
pub fn validate_imovel_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        warn!("rejected lookup with empty parcel id");
        return Err(Error::EmptyParcelId);
    }
    Ok(())
}

/// Check that coordinates fall within global bounds (both inclusive).
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        warn!(latitude, longitude, "rejected out-of-range coordinates");
        return Err(Error::CoordinatesOutOfRange {
            latitude,
            longitude,
        });
    }
    Ok(())
}

/// Check that a search radius is positive and within the configured maximum.
///
/// Non-positive radii are rejected outright rather than treated as a
/// zero-result search.
pub fn validate_radius(radius_km: f64) -> Result<()> {
    if radius_km <= 0.0 {
        warn!(radius_km, "rejected non-positive search radius");
        return Err(Error::RadiusNotPositive { radius_km });
    }
    if radius_km > MAX_RADIUS_KM {
        warn!(radius_km, max_km = MAX_RADIUS_KM, "rejected excessive search radius");
        return Err(Error::RadiusExceedsMaximum {
            radius_km,
            max_km: MAX_RADIUS_KM,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_id() {
        assert!(validate_imovel_id("SP-1234567-ABCD").is_ok());
    }

    #[test]
    fn rejects_empty_and_whitespace_ids() {
        assert!(matches!(validate_imovel_id(""), Err(Error::EmptyParcelId)));
        assert!(matches!(
            validate_imovel_id("   \t "),
            Err(Error::EmptyParcelId)
        ));
    }

    #[test]
    fn accepts_coordinates_on_the_boundary() {
        assert!(validate_coordinates(-90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(-21.0, -51.0).is_ok());
    }

    #[test]
    fn rejects_latitude_out_of_range() {
        let err = validate_coordinates(90.0001, 0.0).unwrap_err();
        assert!(matches!(err, Error::CoordinatesOutOfRange { .. }));
        assert!(validate_coordinates(-91.0, 0.0).is_err());
    }

    #[test]
    fn rejects_longitude_out_of_range() {
        assert!(validate_coordinates(0.0, 180.5).is_err());
        assert!(validate_coordinates(0.0, -181.0).is_err());
    }

    #[test]
    fn accepts_radius_within_cap() {
        assert!(validate_radius(0.5).is_ok());
        assert!(validate_radius(MAX_RADIUS_KM).is_ok());
    }

    #[test]
    fn rejects_non_positive_radius() {
        assert!(matches!(
            validate_radius(0.0),
            Err(Error::RadiusNotPositive { .. })
        ));
        assert!(matches!(
            validate_radius(-10.0),
            Err(Error::RadiusNotPositive { .. })
        ));
    }

    #[test]
    fn rejects_radius_over_cap() {
        let err = validate_radius(MAX_RADIUS_KM + 0.001).unwrap_err();
        assert!(matches!(err, Error::RadiusExceedsMaximum { .. }));
    }
}
