//! Translation of validated search requests into store queries.
//!
//! The builder produces SQL text plus positional parameters; it never touches
//! a connection itself. Geometry-to-text conversion (`AsGeoJSON`) and the
//! spatial predicates (`ST_Contains`, `PtDistWithin`) are evaluated entirely
//! by the SpatiaLite engine.

use rusqlite::types::Value;

/// Fixed projection of parcel columns returned by every query.
///
/// The geometry column is converted to GeoJSON text by the store so the
/// formatter only ever sees serialized JSON.
const PROJECTION: &str = "imovel_code, city, state_code, area_size, fiscal_module, \
     status, type, created_at, AsGeoJSON(geom) AS geometry";

/// How a search selects parcels.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchMode {
    /// Exact identifier match; at most one row expected.
    ById(String),
    /// Parcels whose polygon contains the point.
    Containment { latitude: f64, longitude: f64 },
    /// Parcels within `radius_km` kilometers of the point, measured on the
    /// spheroid.
    Proximity {
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    },
}

impl SearchMode {
    /// Short label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::ById(_) => "by_id",
            SearchMode::Containment { .. } => "containment",
            SearchMode::Proximity { .. } => "proximity",
        }
    }
}

/// Optional non-spatial filters shared by both search endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    /// Case-insensitive substring match against the stored city name.
    /// Ignored when blank after trimming.
    pub city: Option<String>,
    /// Inclusive lower bound on `area_size`.
    pub area_min: Option<f64>,
    /// Inclusive upper bound on `area_size`.
    pub area_max: Option<f64>,
}

/// 1-indexed pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: u32,
    pub size: u32,
}

impl Page {
    pub fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Number of rows to skip before the window starts.
    ///
    /// Computed in `i64` so an arbitrarily large page number cannot overflow;
    /// the result binds directly as an SQL integer.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.size)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self { page: 1, size: 5 }
    }
}

/// A fully shaped query ready for execution by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ParcelQuery {
    pub sql: String,
    pub params: Vec<Value>,
    /// Mode label carried along for logging on execution failure.
    pub mode: &'static str,
}

impl ParcelQuery {
    /// Build a query from a search mode, optional filters, and pagination.
    ///
    /// Identifier lookups ignore filters and pagination: they select at most
    /// a single row by primary key.
    pub fn build(mode: &SearchMode, filters: &SearchFilters, page: Page) -> Self {
        let mut sql = format!("SELECT {PROJECTION} FROM farms");
        let mut params: Vec<Value> = Vec::new();
        let mut predicates: Vec<&'static str> = Vec::new();

        match mode {
            SearchMode::ById(id) => {
                predicates.push("imovel_code = ?");
                params.push(Value::Text(id.clone()));
            }
            SearchMode::Containment {
                latitude,
                longitude,
            } => {
                // MakePoint takes (x, y, srid), so longitude comes first.
                predicates.push("ST_Contains(geom, MakePoint(?, ?, 4326))");
                params.push(Value::Real(*longitude));
                params.push(Value::Real(*latitude));
            }
            SearchMode::Proximity {
                latitude,
                longitude,
                radius_km,
            } => {
                // Final argument 1 selects spheroid distance, matching the
                // use_spheroid flag of ST_DWithin.
                predicates.push("PtDistWithin(geom, MakePoint(?, ?, 4326), ?, 1)");
                params.push(Value::Real(*longitude));
                params.push(Value::Real(*latitude));
                params.push(Value::Real(radius_km * 1000.0));
            }
        }

        let paged = !matches!(mode, SearchMode::ById(_));
        if paged {
            if let Some(city) = filters.city.as_deref() {
                let city = city.trim();
                if !city.is_empty() {
                    predicates.push("LOWER(city) LIKE '%' || LOWER(?) || '%'");
                    params.push(Value::Text(city.to_string()));
                }
            }
            if let Some(area_min) = filters.area_min {
                predicates.push("area_size >= ?");
                params.push(Value::Real(area_min));
            }
            if let Some(area_max) = filters.area_max {
                predicates.push("area_size <= ?");
                params.push(Value::Real(area_max));
            }
        }

        sql.push_str(" WHERE ");
        sql.push_str(&predicates.join(" AND "));

        if paged {
            sql.push_str(" LIMIT ? OFFSET ?");
            params.push(Value::Integer(i64::from(page.size)));
            params.push(Value::Integer(page.offset()));
        } else {
            sql.push_str(" LIMIT 1");
        }

        Self {
            sql,
            params,
            mode: mode.label(),
        }
    }
}
