//! Site data providers.

pub mod site_catalog;

pub use site_catalog::SiteCatalog;
