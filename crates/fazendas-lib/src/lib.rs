//! Core library for the MeuAT rural-parcel query API.
//!
//! The pipeline is: validate caller input, shape a store query, execute it
//! against SpatiaLite, then defensively format the raw rows into parcel
//! records. The spatial engine is treated as an oracle; no geometry math
//! happens here.
//!
//! - [`validate`]: pure business-rule checks with typed failures
//! - [`query`]: search modes, filters, pagination, and SQL shaping
//! - [`store`]: the [`store::ParcelStore`] seam and the SpatiaLite adapter
//! - [`format`]: per-row geometry parsing with drop-and-continue semantics
//! - [`model`]: parcel records and GeoJSON geometry fragments

#![deny(warnings)]

pub mod error;
pub mod format;
pub mod model;
pub mod query;
pub mod store;
pub mod validate;

pub use error::{Error, Result};
pub use format::{format_rows, FormattedBatch};
pub use model::{Geometry, ParcelRecord, RawParcelRow};
pub use query::{Page, ParcelQuery, SearchFilters, SearchMode};
pub use store::{ParcelStore, SpatialiteStore};
pub use validate::{validate_coordinates, validate_imovel_id, validate_radius, MAX_RADIUS_KM};
