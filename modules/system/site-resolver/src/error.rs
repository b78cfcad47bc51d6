use thiserror::Error;

/// Startup errors for the site table.
#[derive(Debug, Error)]
pub enum SiteConfigError {
    #[error("invalid root domain {0:?}")]
    InvalidRootDomain(String),

    #[error("invalid rewrite prefix {value:?}: {reason}")]
    InvalidRewritePrefix { value: String, reason: String },

    #[error("invalid site slug {slug:?}: {reason}")]
    InvalidSlug { slug: String, reason: &'static str },

    #[error("site slug {0:?} is used more than once")]
    DuplicateSlug(String),

    #[error("site {slug:?} has an invalid host {host:?}: {reason}")]
    InvalidHost {
        slug: String,
        host: String,
        reason: &'static str,
    },

    #[error("host {host:?} is claimed by both {first:?} and {second:?}")]
    DuplicateHost {
        host: String,
        first: String,
        second: String,
    },
}
