//! Domain entities: parcels as returned to callers and as read from the store.

use serde::{Deserialize, Serialize};

/// GeoJSON geometry fragment as stored alongside each parcel.
///
/// Only the `type` discriminator and the nested coordinate arrays are modeled;
/// anything missing either field fails deserialization, which is how malformed
/// geometry is detected by the formatter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// Geometry type discriminator, e.g. "Polygon" or "MultiPolygon".
    #[serde(rename = "type")]
    pub geometry_type: String,

    /// Nested coordinate arrays; depth depends on the geometry type.
    pub coordinates: serde_json::Value,
}

/// A rural parcel as returned to API callers.
///
/// `imovel_code` is always present and non-empty; every other scalar is
/// optional because source shapefiles frequently omit them. Geometry is absent
/// when the stored value was null, and a record with malformed geometry is
/// never constructed at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParcelRecord {
    /// Official parcel registry code (CAR).
    pub imovel_code: String,
    pub city: Option<String>,
    pub state_code: Option<String>,
    /// Parcel area in hectares.
    pub area_size: Option<f64>,
    pub fiscal_module: Option<f64>,
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub parcel_type: Option<String>,
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Geometry>,
}

/// A raw row as produced by the store, before geometry parsing.
///
/// The `geometry` field holds the JSON text emitted by `AsGeoJSON`, or `None`
/// when the stored geometry column was null.
#[derive(Debug, Clone, PartialEq)]
pub struct RawParcelRow {
    pub imovel_code: String,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub area_size: Option<f64>,
    pub fiscal_module: Option<f64>,
    pub status: Option<String>,
    pub parcel_type: Option<String>,
    pub created_at: Option<String>,
    pub geometry: Option<String>,
}
