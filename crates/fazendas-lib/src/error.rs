use thiserror::Error;

/// Convenient result alias for the fazendas library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a parcel identifier is empty or all-whitespace.
    #[error("parcel id must not be empty")]
    EmptyParcelId,

    /// Raised when a coordinate pair falls outside global bounds.
    #[error("coordinates out of range (lat {latitude}, lon {longitude}); latitude must be in [-90, 90] and longitude in [-180, 180]")]
    CoordinatesOutOfRange { latitude: f64, longitude: f64 },

    /// Raised when a search radius is zero or negative.
    #[error("search radius must be positive, got {radius_km} km")]
    RadiusNotPositive { radius_km: f64 },

    /// Raised when a search radius exceeds the configured maximum.
    #[error("search radius {radius_km} km exceeds the maximum of {max_km} km")]
    RadiusExceedsMaximum { radius_km: f64, max_km: f64 },

    /// Raised when no parcel matches the requested identifier.
    #[error("no parcel found with id {id}")]
    ParcelNotFound { id: String },

    /// Wrapper for SQLite errors.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Whether this error was caused by invalid caller input.
    ///
    /// Validation errors are reported to the caller with their full reason;
    /// everything else is opaque at the HTTP boundary.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Error::EmptyParcelId
                | Error::CoordinatesOutOfRange { .. }
                | Error::RadiusNotPositive { .. }
                | Error::RadiusExceedsMaximum { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_classified() {
        assert!(Error::EmptyParcelId.is_validation());
        assert!(Error::CoordinatesOutOfRange {
            latitude: 91.0,
            longitude: 0.0
        }
        .is_validation());
        assert!(Error::RadiusNotPositive { radius_km: -1.0 }.is_validation());
        assert!(Error::RadiusExceedsMaximum {
            radius_km: 600.0,
            max_km: 500.0
        }
        .is_validation());
    }

    #[test]
    fn lookup_and_backend_errors_are_not_validation() {
        assert!(!Error::ParcelNotFound {
            id: "SP-123".to_string()
        }
        .is_validation());
        assert!(!Error::Sqlite(rusqlite::Error::InvalidQuery).is_validation());
    }

    #[test]
    fn radius_error_messages_carry_values() {
        let err = Error::RadiusExceedsMaximum {
            radius_km: 750.0,
            max_km: 500.0,
        };
        let message = err.to_string();
        assert!(message.contains("750"));
        assert!(message.contains("500"));
    }
}
