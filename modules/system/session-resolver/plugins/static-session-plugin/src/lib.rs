#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Session Resolver Plugin
//!
//! Resolves session credentials from configuration, for development and testing.
//!
//! ## Modes
//!
//! - **`static_tokens`** (default): Maps specific credentials to specific identities.
//!   With an empty token list no credential resolves.
//!
//! - **`accept_all`**: Accepts any non-empty credential, returns the configured
//!   default identity. Opt-in only; logged as unsafe at startup.
//!
//! ## Configuration
//!
//! ```yaml
//! session_resolver:
//!   mode: static_tokens
//!   default_identity:
//!     subject_id: "11111111-6a88-4768-9dfc-6bcd5187d9ed"
//!     subject_type: "site_admin"
//!     site_id: "00000000-df51-5b42-9538-d2b56b7ee953"
//!   tokens:
//!     - token: "dev-session"
//!       identity:
//!         subject_id: "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa"
//!         subject_type: "staff"
//! ```

pub mod config;
pub mod domain;

pub use config::StaticSessionPluginConfig;
pub use domain::Service;
