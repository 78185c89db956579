//! Ratatui front-end: three bordered columns (artists, albums, songs) and a
//! footer. The shell only translates key presses into selection and focus
//! changes; everything that touches the database lives in the link graph.

mod app;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
