//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use music_db_browser::db::{RecordSource, SourceError, SourceRow};
use music_db_browser::{Catalog, ListEntry, MusicBrowser, ViewId};
use rusqlite::types::Value;
use rusqlite::Connection;

pub const SCHEMA: &str = "
    CREATE TABLE artists (_id INTEGER PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE albums (_id INTEGER PRIMARY KEY, name TEXT NOT NULL, artist INTEGER NOT NULL);
    CREATE TABLE songs (
        _id INTEGER PRIMARY KEY,
        track INTEGER NOT NULL,
        title TEXT NOT NULL,
        album INTEGER NOT NULL
    );
";

/// In-memory catalog with the standard schema plus `rows` (SQL inserts).
pub fn catalog_with(rows: &str) -> Result<Rc<Catalog>> {
    let conn = Connection::open_in_memory()?;
    conn.execute_batch(SCHEMA)?;
    conn.execute_batch(rows)?;
    Ok(Rc::new(Catalog::from_connection(conn)))
}

/// Two artists that each own a "Greatest Hits" album containing "Track1".
pub fn greatest_hits_catalog() -> Result<Rc<Catalog>> {
    catalog_with(
        "
        INSERT INTO artists (_id, name) VALUES (1, 'Abba'), (2, 'Queen');
        INSERT INTO albums (_id, name, artist) VALUES
            (1, 'Greatest Hits', 1),
            (2, 'Greatest Hits', 2);
        INSERT INTO songs (_id, track, title, album) VALUES
            (1, 1, 'Track1', 1),
            (2, 2, 'Mamma Mia', 1),
            (3, 1, 'Track1', 2),
            (4, 2, 'We Will Rock You', 2);
        ",
    )
}

/// A wired browser over `catalog` with its roots already populated.
pub fn started_browser(catalog: Rc<Catalog>) -> Result<MusicBrowser> {
    let mut browser = MusicBrowser::wire(catalog)?;
    browser.graph.requery_roots()?;
    Ok(browser)
}

pub fn displays(browser: &MusicBrowser, id: ViewId) -> Vec<String> {
    entries(browser, id)
        .into_iter()
        .map(|entry| entry.display)
        .collect()
}

pub fn entries(browser: &MusicBrowser, id: ViewId) -> Vec<ListEntry> {
    browser
        .graph
        .view(id)
        .map(|view| view.items().to_vec())
        .unwrap_or_default()
}

pub fn index_of(browser: &MusicBrowser, id: ViewId, display: &str) -> usize {
    displays(browser, id)
        .iter()
        .position(|value| value == display)
        .unwrap_or_else(|| panic!("{display:?} not listed"))
}

/// Delegates to a real catalog until `fail` is set, then reports the store
/// as unavailable. Counts every statement it runs.
pub struct FlakySource {
    pub inner: Rc<Catalog>,
    pub fail: Cell<bool>,
    pub calls: Cell<usize>,
}

impl FlakySource {
    pub fn new(inner: Rc<Catalog>) -> Rc<Self> {
        Rc::new(Self {
            inner,
            fail: Cell::new(false),
            calls: Cell::new(0),
        })
    }
}

impl RecordSource for FlakySource {
    fn execute(&self, query: &str, params: &[Value]) -> Result<Vec<SourceRow>, SourceError> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(SourceError::Unavailable {
                reason: "disk unplugged".to_string(),
            });
        }
        self.inner.execute(query, params)
    }
}

/// Passes every statement through to a real catalog and keeps a copy of the
/// SQL text and bound parameters.
pub struct RecordingSource {
    pub inner: Rc<Catalog>,
    pub statements: RefCell<Vec<(String, Vec<Value>)>>,
}

impl RecordingSource {
    pub fn new(inner: Rc<Catalog>) -> Rc<Self> {
        Rc::new(Self {
            inner,
            statements: RefCell::new(Vec::new()),
        })
    }

    /// Parameters of the most recent statement whose SQL contains `fragment`.
    pub fn last_params_for(&self, fragment: &str) -> Option<Vec<Value>> {
        self.statements
            .borrow()
            .iter()
            .rev()
            .find(|(query, _)| query.contains(fragment))
            .map(|(_, params)| params.clone())
    }
}

impl RecordSource for RecordingSource {
    fn execute(&self, query: &str, params: &[Value]) -> Result<Vec<SourceRow>, SourceError> {
        self.statements
            .borrow_mut()
            .push((query.to_string(), params.to_vec()));
        self.inner.execute(query, params)
    }
}
