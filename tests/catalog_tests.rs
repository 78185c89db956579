mod common;

use std::rc::Rc;

use anyhow::Result;
use music_db_browser::db::{RecordSource, SourceError};
use music_db_browser::{Catalog, MusicBrowser};
use rusqlite::types::Value;
use rusqlite::Connection;

fn write_music_db(path: &std::path::Path) -> Result<()> {
    let conn = Connection::open(path)?;
    conn.execute_batch(common::SCHEMA)?;
    conn.execute_batch(
        "
        INSERT INTO artists (_id, name) VALUES (1, 'Abba'), (2, 'Queen');
        INSERT INTO albums (_id, name, artist) VALUES (1, 'Arrival', 1);
        INSERT INTO songs (_id, track, title, album) VALUES (1, 1, 'When I Kissed the Teacher', 1);
        ",
    )?;
    Ok(())
}

#[test]
fn opens_existing_file_read_only() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("music.sqlite");
    write_music_db(&path)?;

    let catalog = Catalog::open(&path)?;
    assert_eq!(catalog.origin(), path.as_path());
    let write = catalog
        .connection()
        .execute("DELETE FROM artists", []);
    assert!(write.is_err(), "catalog must not accept writes");

    let rows = catalog.execute(
        "SELECT name, _id FROM artists WHERE _id = ?1",
        &[Value::Integer(2)],
    )?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].display, "Queen");
    assert_eq!(rows[0].row_id, 2);

    catalog.close()?;
    Ok(())
}

#[test]
fn missing_file_is_not_created() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("nope.sqlite");

    let err = Catalog::open(&path).err().expect("open should fail");
    assert!(matches!(err, SourceError::Missing { .. }));
    assert!(!path.exists());
    Ok(())
}

#[test]
fn bad_query_is_reported_with_its_text() -> Result<()> {
    let catalog = Catalog::open_demo()?;
    let err = catalog
        .execute("SELECT name, _id FROM genres", &[])
        .expect_err("no such table");
    let message = err.to_string();
    assert!(message.contains("SELECT name, _id FROM genres"));
    assert!(matches!(err, SourceError::Query { .. }));
    Ok(())
}

#[test]
fn browser_runs_against_an_on_disk_catalog() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("music.sqlite");
    write_music_db(&path)?;

    let catalog = Rc::new(Catalog::open(&path)?);
    {
        let mut browser = MusicBrowser::wire(catalog.clone())?;
        browser.graph.requery_roots()?;
        browser.graph.on_select(browser.artists, 0)?;
        browser.graph.on_select(browser.albums, 0)?;
        let songs = browser.graph.view(browser.songs)?.display_values().join(",");
        assert_eq!(songs, "When I Kissed the Teacher");
    }

    let catalog = Rc::try_unwrap(catalog)
        .ok()
        .expect("browser dropped its handle");
    catalog.close()?;
    Ok(())
}
