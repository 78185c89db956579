use anyhow::{Context, Result};
use rusqlite::Connection;

/// Same layout as the `music.sqlite` files the browser is pointed at.
const DEMO_SCHEMA: &str = "
    CREATE TABLE artists (
        _id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE albums (
        _id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        artist INTEGER NOT NULL REFERENCES artists(_id)
    );
    CREATE TABLE songs (
        _id INTEGER PRIMARY KEY,
        track INTEGER NOT NULL,
        title TEXT NOT NULL,
        album INTEGER NOT NULL REFERENCES albums(_id)
    );
";

/// Small catalogue with deliberate name clashes: two artists own a
/// "Greatest Hits" album and several albums open with "Intro".
const DEMO_ROWS: &str = "
    INSERT INTO artists (_id, name) VALUES
        (1, 'Abba'),
        (2, 'Queen'),
        (3, 'Pink Floyd');
    INSERT INTO albums (_id, name, artist) VALUES
        (1, 'Greatest Hits', 1),
        (2, 'Greatest Hits', 2),
        (3, 'A Night at the Opera', 2),
        (4, 'Arrival', 1),
        (5, 'The Wall', 3);
    INSERT INTO songs (_id, track, title, album) VALUES
        (1, 1, 'Track1', 1),
        (2, 2, 'Dancing Queen', 1),
        (3, 3, 'Waterloo', 1),
        (4, 1, 'Track1', 2),
        (5, 2, 'Bohemian Rhapsody', 2),
        (6, 3, 'Another One Bites the Dust', 2),
        (7, 1, 'Intro', 3),
        (8, 2, 'Love of My Life', 3),
        (9, 1, 'Intro', 4),
        (10, 2, 'Knowing Me, Knowing You', 4),
        (11, 1, 'In the Flesh?', 5),
        (12, 2, 'Another Brick in the Wall', 5);
";

/// Create the demo tables and rows on a fresh connection.
pub fn seed_demo(conn: &Connection) -> Result<()> {
    conn.execute_batch(DEMO_SCHEMA)
        .context("failed to create demo schema")?;
    conn.execute_batch(DEMO_ROWS)
        .context("failed to insert demo rows")?;
    Ok(())
}
