pub mod catalog_service;

pub use catalog_service::{CatalogError, CatalogMeta, CatalogService, ItemSearch};
