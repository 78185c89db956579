//! The three-column artist → album → song layout the browser ships with.

use std::rc::Rc;

use crate::db::RecordSource;
use crate::graph::LinkGraph;
use crate::models::ViewId;
use crate::view::{ViewBinding, ViewError};

const ALBUM_SORT: &[&str] = &["albums.name"];
const SONG_SORT: &[&str] = &["songs.track", "songs.title"];

/// A wired link graph plus the handles of its three columns, left to right.
pub struct MusicBrowser {
    pub graph: LinkGraph,
    pub artists: ViewId,
    pub albums: ViewId,
    pub songs: ViewId,
}

impl MusicBrowser {
    /// Build and link the columns. Nothing is queried yet; call
    /// [`LinkGraph::requery_roots`] once the shell is ready.
    pub fn wire(source: Rc<dyn RecordSource>) -> Result<Self, ViewError> {
        let mut graph = LinkGraph::new(source);

        let artists = graph.add_view(&ViewBinding::new("artists", "artists.name").titled("Artists"))?;
        let albums = graph.add_view(
            &ViewBinding::new("albums", "albums.name")
                .titled("Albums")
                .sorted_by(ALBUM_SORT)
                .with_placeholder("Choose an artist."),
        )?;
        let songs = graph.add_view(
            &ViewBinding::new("songs", "songs.title")
                .titled("Songs")
                .sorted_by(SONG_SORT)
                .with_placeholder("Choose an album."),
        )?;

        graph.link(artists, albums, "artist")?;
        graph.link(albums, songs, "album")?;

        Ok(Self {
            graph,
            artists,
            albums,
            songs,
        })
    }

    /// Column handles in display order.
    pub fn columns(&self) -> [ViewId; 3] {
        [self.artists, self.albums, self.songs]
    }
}
