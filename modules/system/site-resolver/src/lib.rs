#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Site Resolver
//!
//! Maps the request host to one of the configured faculty/unit sites and
//! rewrites public paths into the internal site namespace, so that
//! `https://ft.kampus.ac.id/berita` is served by `/_sites/ft/berita`.
//!
//! Admin, login and passthrough paths are never rewritten.
//!
//! ## Configuration
//!
//! ```yaml
//! site_resolver:
//!   root_domain: kampus.ac.id
//!   unknown_host: fallback
//!   sites:
//!     - slug: ft
//!       name: Fakultas Teknik
//!       subdomain: ft
//!     - slug: fk
//!       name: Fakultas Kedokteran
//!       subdomain: fk
//!       custom_domain: kedokteran.example.org
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod middleware;

pub use config::{SiteConfig, SiteResolverConfig, UnknownHostPolicy};
pub use domain::{SiteInfo, SiteResolver};
pub use error::SiteConfigError;
pub use middleware::site_rewrite_middleware;
