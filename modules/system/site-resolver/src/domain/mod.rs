//! Domain layer for the site resolver.

pub mod service;

pub use service::{SiteInfo, SiteResolver};
