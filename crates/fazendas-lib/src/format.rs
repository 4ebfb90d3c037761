//! Defensive conversion of raw store rows into parcel records.
//!
//! Geometry corruption is a per-row problem: a row whose geometry text fails
//! to parse is dropped and counted, and the rest of the batch is returned as
//! usual. A row with no geometry at all is kept with the geometry field
//! absent; only malformed geometry disqualifies a record.

use tracing::warn;

use crate::model::{Geometry, ParcelRecord, RawParcelRow};

/// Outcome of formatting one batch of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedBatch {
    /// Successfully formatted records, in input order.
    pub records: Vec<ParcelRecord>,
    /// Number of rows dropped due to malformed geometry.
    pub dropped: usize,
}

/// Convert raw rows into parcel records, skipping rows with malformed
/// geometry. Output order matches input order.
pub fn format_rows(rows: Vec<RawParcelRow>) -> FormattedBatch {
    let mut records = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;

    for row in rows {
        match parse_geometry(row.geometry.as_deref()) {
            Ok(geometry) => records.push(ParcelRecord {
                imovel_code: row.imovel_code,
                city: row.city,
                state_code: row.state_code,
                area_size: row.area_size,
                fiscal_module: row.fiscal_module,
                status: row.status,
                parcel_type: row.parcel_type,
                created_at: row.created_at,
                geometry,
            }),
            Err(error) => {
                warn!(
                    imovel_code = %row.imovel_code,
                    %error,
                    "dropping parcel with malformed geometry"
                );
                dropped += 1;
            }
        }
    }

    FormattedBatch { records, dropped }
}

/// Parse optional geometry text. Null or empty text means "no geometry";
/// present-but-unparseable text is an error.
fn parse_geometry(text: Option<&str>) -> Result<Option<Geometry>, serde_json::Error> {
    match text {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => serde_json::from_str(raw).map(Some),
    }
}
