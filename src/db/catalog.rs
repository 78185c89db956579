use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OpenFlags};

use super::demo::seed_demo;
use super::source::{RecordSource, SourceError, SourceRow};

/// Read-only handle on the music database. One catalog is opened at startup,
/// shared by every list, and closed once the event loop is gone.
pub struct Catalog {
    conn: Connection,
    origin: PathBuf,
}

impl Catalog {
    /// Open an existing database file without write access. A missing file is
    /// reported up front; SQLite would otherwise fail on the first query with
    /// a far less helpful message.
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        if !path.exists() {
            return Err(SourceError::Missing {
                path: path.to_path_buf(),
            });
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| SourceError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        info!("opened music database {}", path.display());
        Ok(Self {
            conn,
            origin: path.to_path_buf(),
        })
    }

    /// In-memory catalog filled with the bundled demo dataset.
    pub fn open_demo() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        seed_demo(&conn)?;
        info!("opened in-memory demo database");
        Ok(Self {
            conn,
            origin: PathBuf::from(":memory:"),
        })
    }

    /// Wrap a connection that the caller already prepared (tests and tools).
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            origin: PathBuf::from(":memory:"),
        }
    }

    pub fn origin(&self) -> &Path {
        &self.origin
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Close the underlying connection, surfacing any error SQLite reports.
    pub fn close(self) -> Result<()> {
        let origin = self.origin;
        self.conn
            .close()
            .map_err(|(_, err)| err)
            .with_context(|| format!("failed to close database {}", origin.display()))?;
        info!("closed music database {}", origin.display());
        Ok(())
    }
}

impl RecordSource for Catalog {
    fn execute(&self, query: &str, params: &[Value]) -> Result<Vec<SourceRow>, SourceError> {
        debug!("executing `{query}` with {params:?}");
        let query_failed = |source| SourceError::Query {
            query: query.to_string(),
            source,
        };

        let mut stmt = self.conn.prepare_cached(query).map_err(query_failed)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                let value: Value = row.get(0)?;
                Ok(SourceRow {
                    display: display_text(&value),
                    value,
                    row_id: row.get(1)?,
                })
            })
            .map_err(query_failed)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(query_failed)?;

        Ok(rows)
    }
}

/// Display columns are usually text, but a list bound to a numeric column
/// should still render instead of failing the whole requery.
fn display_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Integer(number) => number.to_string(),
        Value::Real(number) => number.to_string(),
        Value::Text(text) => text.clone(),
        Value::Blob(bytes) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_text_renders_every_storage_class() {
        assert_eq!(display_text(&Value::Null), "");
        assert_eq!(display_text(&Value::Integer(7)), "7");
        assert_eq!(display_text(&Value::Real(1.5)), "1.5");
        assert_eq!(display_text(&Value::Text("Intro".into())), "Intro");
        assert_eq!(display_text(&Value::Blob(b"raw".to_vec())), "raw");
    }

    #[test]
    fn missing_file_is_reported_before_sqlite_runs() {
        let err = Catalog::open(Path::new("/definitely/not/here/music.sqlite"))
            .err()
            .expect("open should fail");
        assert!(matches!(err, SourceError::Missing { .. }));
    }
}
