//! Core library surface for the Music DB Browser.
//!
//! The browsing logic (bound lists, the link graph between them and the SQL
//! they run) is independent of the terminal front-end in [`ui`], so it can be
//! driven directly from tests or another shell.
pub mod config;
pub mod db;
pub mod graph;
pub mod models;
pub mod music;
pub mod query;
pub mod ui;
pub mod view;

/// Persistence entry points: the SQLite catalog and the interface the lists
/// query through.
pub use db::{Catalog, RecordSource, SourceError, SourceRow};

pub use graph::LinkGraph;
pub use models::{ListEntry, SelectOutcome, ViewId};
pub use music::MusicBrowser;
pub use view::{BoundListView, ViewBinding, ViewError};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
