//! Test utilities for handler and integration testing.
//!
//! Provides an in-memory [`MockStore`] that stands in for the SpatiaLite
//! adapter: it returns canned rows (or a forced failure) and records every
//! query it receives so tests can assert whether the store was reached.

use std::sync::Mutex;

use fazendas_lib::{Error, ParcelQuery, ParcelStore, RawParcelRow, Result};

/// In-memory stand-in for the SpatiaLite store.
pub struct MockStore {
    rows: Vec<RawParcelRow>,
    fail: bool,
    queries: Mutex<Vec<ParcelQuery>>,
}

impl MockStore {
    /// Store returning the given rows for every fetch.
    pub fn with_rows(rows: Vec<RawParcelRow>) -> Self {
        Self {
            rows,
            fail: false,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Store returning no rows.
    pub fn empty() -> Self {
        Self::with_rows(Vec::new())
    }

    /// Store that fails every fetch and ping, simulating a lost connection.
    pub fn failing() -> Self {
        Self {
            rows: Vec::new(),
            fail: true,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Number of queries executed so far.
    pub fn query_count(&self) -> usize {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Copy of the last executed query, if any.
    pub fn last_query(&self) -> Option<ParcelQuery> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }
}

impl ParcelStore for MockStore {
    fn fetch(&self, query: &ParcelQuery) -> Result<Vec<RawParcelRow>> {
        self.queries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(query.clone());

        if self.fail {
            return Err(Error::Io(std::io::Error::other(
                "simulated store failure",
            )));
        }
        Ok(self.rows.clone())
    }

    fn ping(&self) -> Result<()> {
        if self.fail {
            return Err(Error::Io(std::io::Error::other(
                "simulated store failure",
            )));
        }
        Ok(())
    }
}

/// A raw row with valid Point geometry.
pub fn sample_row(imovel_code: &str) -> RawParcelRow {
    RawParcelRow {
        imovel_code: imovel_code.to_string(),
        city: Some("Dracena".to_string()),
        state_code: Some("SP".to_string()),
        area_size: Some(42.5),
        fiscal_module: Some(2.1),
        status: Some("AT".to_string()),
        parcel_type: Some("IRU".to_string()),
        created_at: Some("2015-05-01".to_string()),
        geometry: Some(r#"{"type":"Point","coordinates":[-51.0,-21.0]}"#.to_string()),
    }
}

/// A raw row with unparseable geometry text.
pub fn corrupted_row(imovel_code: &str) -> RawParcelRow {
    RawParcelRow {
        geometry: Some("{invalid_json".to_string()),
        ..sample_row(imovel_code)
    }
}

/// A raw row whose geometry column was null.
pub fn geometryless_row(imovel_code: &str) -> RawParcelRow {
    RawParcelRow {
        geometry: None,
        ..sample_row(imovel_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fazendas_lib::{Page, SearchFilters, SearchMode};

    #[test]
    fn mock_store_records_queries() {
        let store = MockStore::with_rows(vec![sample_row("SP-1")]);
        let query = ParcelQuery::build(
            &SearchMode::ById("SP-1".to_string()),
            &SearchFilters::default(),
            Page::default(),
        );

        let rows = store.fetch(&query).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.query_count(), 1);
        assert_eq!(store.last_query().unwrap().mode, "by_id");
    }

    #[test]
    fn failing_store_errors_on_fetch_and_ping() {
        let store = MockStore::failing();
        let query = ParcelQuery::build(
            &SearchMode::ById("SP-1".to_string()),
            &SearchFilters::default(),
            Page::default(),
        );

        assert!(store.fetch(&query).is_err());
        assert!(store.ping().is_err());
        assert_eq!(store.query_count(), 1);
    }
}
