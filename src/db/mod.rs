//! Persistence module split across logical submodules.

mod catalog;
mod demo;
mod source;

pub use catalog::Catalog;
pub use demo::seed_demo;
pub use source::{RecordSource, SourceError, SourceRow};
