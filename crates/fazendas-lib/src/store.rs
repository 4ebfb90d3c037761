//! Store adapter over a SpatiaLite database.
//!
//! The store is a thin execution boundary: it receives fully shaped
//! [`ParcelQuery`] values and returns raw rows. All spatial computation
//! happens inside the engine.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params_from_iter, Connection, LoadExtensionGuard, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::RawParcelRow;
use crate::query::ParcelQuery;

/// Boundary to the spatial store. Implemented by the SpatiaLite adapter in
/// production and by an in-memory mock in handler tests.
pub trait ParcelStore: Send + Sync {
    /// Execute a shaped query and return the raw rows.
    fn fetch(&self, query: &ParcelQuery) -> Result<Vec<RawParcelRow>>;

    /// Cheap connectivity check for the health endpoint.
    fn ping(&self) -> Result<()>;
}

/// Parcel store backed by SQLite with the SpatiaLite extension loaded.
pub struct SpatialiteStore {
    conn: Mutex<Connection>,
}

impl SpatialiteStore {
    /// Open the database at `path` and load the SpatiaLite extension.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("parcel database not found at {}", path.display()),
            )));
        }

        info!(path = %path.display(), "opening parcel database");
        let conn = Connection::open(path)?;

        // SpatiaLite ships as a loadable extension; loading is only permitted
        // while the guard is alive.
        unsafe {
            let _guard = LoadExtensionGuard::new(&conn)?;
            conn.load_extension("mod_spatialite", None::<&str>)?;
        }
        debug!("spatialite extension loaded");

        Ok(Self::from_connection(conn))
    }

    /// Wrap an already configured connection. Used by tests and by callers
    /// that manage extension loading themselves.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }
}

impl ParcelStore for SpatialiteStore {
    fn fetch(&self, query: &ParcelQuery) -> Result<Vec<RawParcelRow>> {
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut stmt = conn.prepare(&query.sql)?;
        let rows = stmt.query_map(params_from_iter(query.params.iter()), row_to_raw_parcel)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn ping(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }
}

fn row_to_raw_parcel(row: &Row<'_>) -> rusqlite::Result<RawParcelRow> {
    Ok(RawParcelRow {
        imovel_code: row.get(0)?,
        city: row.get(1)?,
        state_code: row.get(2)?,
        area_size: row.get(3)?,
        fiscal_module: row.get(4)?,
        status: row.get(5)?,
        parcel_type: row.get(6)?,
        created_at: row.get(7)?,
        geometry: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::types::Value;

    /// Plain SQLite stand-in: same table shape, geometry pre-rendered as text
    /// so no spatial functions are needed.
    fn seeded_store() -> SpatialiteStore {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE farms (
                imovel_code TEXT PRIMARY KEY,
                city TEXT,
                state_code TEXT,
                area_size REAL,
                fiscal_module REAL,
                status TEXT,
                type TEXT,
                created_at TEXT,
                geometry TEXT
            );
            INSERT INTO farms VALUES
                ('SP-1', 'Dracena', 'SP', 42.5, 2.1, 'AT', 'IRU', '2015-05-01',
                 '{\"type\":\"Point\",\"coordinates\":[-51.0,-21.0]}'),
                ('SP-2', 'Tupi Paulista', 'SP', 10.0, 0.5, 'AT', 'IRU', '2016-01-12', NULL);",
        )
        .unwrap();
        SpatialiteStore::from_connection(conn)
    }

    fn plain_query(sql: &str, params: Vec<Value>) -> ParcelQuery {
        ParcelQuery {
            sql: sql.to_string(),
            params,
            mode: "by_id",
        }
    }

    const TEST_PROJECTION: &str = "imovel_code, city, state_code, area_size, fiscal_module, \
         status, type, created_at, geometry";

    #[test]
    fn fetch_maps_all_columns() {
        let store = seeded_store();
        let query = plain_query(
            &format!("SELECT {TEST_PROJECTION} FROM farms WHERE imovel_code = ?"),
            vec![Value::Text("SP-1".to_string())],
        );

        let rows = store.fetch(&query).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.imovel_code, "SP-1");
        assert_eq!(row.city.as_deref(), Some("Dracena"));
        assert_eq!(row.area_size, Some(42.5));
        assert!(row.geometry.as_deref().unwrap().contains("Point"));
    }

    #[test]
    fn fetch_returns_null_geometry_as_none() {
        let store = seeded_store();
        let query = plain_query(
            &format!("SELECT {TEST_PROJECTION} FROM farms WHERE imovel_code = ?"),
            vec![Value::Text("SP-2".to_string())],
        );

        let rows = store.fetch(&query).unwrap();
        assert_eq!(rows[0].geometry, None);
    }

    #[test]
    fn fetch_with_no_matches_returns_empty() {
        let store = seeded_store();
        let query = plain_query(
            &format!("SELECT {TEST_PROJECTION} FROM farms WHERE imovel_code = ?"),
            vec![Value::Text("MISSING".to_string())],
        );

        assert!(store.fetch(&query).unwrap().is_empty());
    }

    #[test]
    fn fetch_propagates_malformed_sql_as_error() {
        let store = seeded_store();
        let query = plain_query("SELECT nope FROM nowhere", vec![]);

        assert!(store.fetch(&query).is_err());
    }

    #[test]
    fn ping_succeeds_on_open_connection() {
        let store = seeded_store();
        assert!(store.ping().is_ok());
    }

    #[test]
    fn open_rejects_missing_database_file() {
        let result = SpatialiteStore::open("/nonexistent/parcel.db");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
