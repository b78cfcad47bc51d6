#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Session Resolver SDK
//!
//! This crate provides the contract between the request gate and the
//! identity collaborator that owns admin sessions:
//!
//! - [`SessionResolverClient`] - API trait implemented by identity backends
//! - [`SessionCredentials`] - Credential material extracted from a request
//! - [`ResolvedSession`] - Result of a successful resolution
//! - [`SessionResolverError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use session_resolver_sdk::{SessionCredentials, SessionResolverClient};
//!
//! let creds = SessionCredentials::cookie("abc123");
//! match resolver.resolve_session(&creds).await? {
//!     Some(session) => { /* authenticated */ }
//!     None => { /* anonymous */ }
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;

// Re-export main types at crate root
pub use api::SessionResolverClient;
pub use error::SessionResolverError;
pub use models::{CredentialSource, ResolvedSession, SessionCredentials};
