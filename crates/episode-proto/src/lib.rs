//! Shared model and I/O for the episode browser: the catalog shape, the
//! loader that fetches it, configuration and platform paths.

pub mod catalog;
pub mod config;
pub mod loader;
pub mod platform;

pub use catalog::{Catalog, CatalogError, Episode, Series};
pub use loader::{load_catalog, CatalogSource, LoadError};
