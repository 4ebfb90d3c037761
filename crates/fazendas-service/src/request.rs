//! Request types and validation for HTTP endpoints.
//!
//! The radius-search body extends the point-search body: the shared fields
//! are a flattened base struct plus a `radius_km` field, so both endpoints
//! validate coordinates and pagination through the same code path.

use serde::{Deserialize, Serialize};

use fazendas_lib::{validate_coordinates, validate_radius, Page, SearchFilters};

use crate::problem::ProblemDetails;

/// Validation trait for request types.
///
/// Implementations should validate all fields and return a `ProblemDetails`
/// error for invalid input.
pub trait Validate {
    /// Validate the request, returning an error if invalid.
    ///
    /// The `request_id` is used to populate the `instance` field of any
    /// returned `ProblemDetails`.
    ///
    /// Returns a boxed `ProblemDetails` to avoid large `Result::Err` variants.
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>>;
}

/// Body for containment search (`POST /fazendas/busca-ponto`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointSearchRequest {
    /// Latitude in degrees, [-90, 90].
    pub latitude: f64,

    /// Longitude in degrees, [-180, 180].
    pub longitude: f64,

    /// Case-insensitive city substring filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    /// Inclusive lower bound on parcel area in hectares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_min: Option<f64>,

    /// Inclusive upper bound on parcel area in hectares.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_max: Option<f64>,

    /// 1-indexed result page.
    #[serde(default = "default_page")]
    pub page: u32,

    /// Rows per page, at most 100.
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_size() -> u32 {
    5
}

impl PointSearchRequest {
    /// Non-spatial filters for the query builder.
    pub fn filters(&self) -> SearchFilters {
        SearchFilters {
            city: self.city.clone(),
            area_min: self.area_min,
            area_max: self.area_max,
        }
    }

    /// Pagination window for the query builder.
    pub fn page_window(&self) -> Page {
        Page::new(self.page, self.size)
    }
}

impl Validate for PointSearchRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        if let Err(e) = validate_coordinates(self.latitude, self.longitude) {
            return Err(Box::new(ProblemDetails::bad_request(
                e.to_string(),
                request_id,
            )));
        }

        if self.page < 1 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'page' field must be at least 1",
                request_id,
            )));
        }

        if self.size < 1 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'size' field must be at least 1",
                request_id,
            )));
        }

        if self.size > 100 {
            return Err(Box::new(ProblemDetails::bad_request(
                "The 'size' field cannot exceed 100",
                request_id,
            )));
        }

        Ok(())
    }
}

/// Body for proximity search (`POST /fazendas/busca-raio`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusSearchRequest {
    #[serde(flatten)]
    pub base: PointSearchRequest,

    /// Search radius in kilometers, (0, 500].
    pub radius_km: f64,
}

impl Validate for RadiusSearchRequest {
    fn validate(&self, request_id: &str) -> Result<(), Box<ProblemDetails>> {
        // Radius first, then coordinates and pagination.
        if let Err(e) = validate_radius(self.radius_km) {
            return Err(Box::new(ProblemDetails::bad_request(
                e.to_string(),
                request_id,
            )));
        }

        self.base.validate(request_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point_request() -> PointSearchRequest {
        PointSearchRequest {
            latitude: -21.0,
            longitude: -51.0,
            city: None,
            area_min: None,
            area_max: None,
            page: 1,
            size: 5,
        }
    }

    #[test]
    fn test_point_request_valid() {
        assert!(point_request().validate("test").is_ok());
    }

    #[test]
    fn test_point_request_rejects_bad_latitude() {
        let mut req = point_request();
        req.latitude = 91.0;
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("latitude"));
    }

    #[test]
    fn test_point_request_rejects_bad_longitude() {
        let mut req = point_request();
        req.longitude = -181.0;
        assert!(req.validate("test").is_err());
    }

    #[test]
    fn test_point_request_rejects_page_zero() {
        let mut req = point_request();
        req.page = 0;
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("'page'"));
    }

    #[test]
    fn test_point_request_rejects_size_zero_and_over_cap() {
        let mut req = point_request();
        req.size = 0;
        assert!(req.validate("test").is_err());

        req.size = 101;
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("exceed 100"));
    }

    #[test]
    fn test_radius_request_rejects_non_positive_radius() {
        let req = RadiusSearchRequest {
            base: point_request(),
            radius_km: 0.0,
        };
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("positive"));
    }

    #[test]
    fn test_radius_request_rejects_excessive_radius() {
        let req = RadiusSearchRequest {
            base: point_request(),
            radius_km: 600.0,
        };
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("500"));
    }

    #[test]
    fn test_radius_request_checks_radius_before_coordinates() {
        let mut base = point_request();
        base.latitude = 95.0;
        let req = RadiusSearchRequest {
            base,
            radius_km: -1.0,
        };
        let err = req.validate("test").unwrap_err();
        assert!(err.detail.as_deref().unwrap().contains("radius"));
    }

    #[test]
    fn test_point_request_deserialization_defaults() {
        let json = r#"{"latitude":-21.0,"longitude":-51.0}"#;
        let req: PointSearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.page, 1);
        assert_eq!(req.size, 5);
        assert!(req.city.is_none());
    }

    #[test]
    fn test_radius_request_deserializes_flattened_base() {
        let json = r#"{"latitude":-21.0,"longitude":-51.0,"radius_km":10.0,"city":"Dracena","page":2,"size":20}"#;
        let req: RadiusSearchRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.radius_km, 10.0);
        assert_eq!(req.base.city.as_deref(), Some("Dracena"));
        assert_eq!(req.base.page_window(), Page::new(2, 20));
    }

    #[test]
    fn test_filters_carry_all_optional_fields() {
        let mut req = point_request();
        req.city = Some("Dracena".to_string());
        req.area_min = Some(5.0);
        req.area_max = Some(50.0);

        let filters = req.filters();
        assert_eq!(filters.city.as_deref(), Some("Dracena"));
        assert_eq!(filters.area_min, Some(5.0));
        assert_eq!(filters.area_max, Some(50.0));
    }
}
