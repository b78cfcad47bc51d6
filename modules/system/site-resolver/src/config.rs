//! Configuration types for the site resolver.

use serde::{Deserialize, Serialize};

/// Site resolver configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields, default)]
pub struct SiteResolverConfig {
    /// Domain under which sites are served as `<subdomain>.<root_domain>`.
    pub root_domain: String,

    /// Internal path namespace public requests are rewritten into.
    pub rewrite_prefix: String,

    /// What to do with a public request whose host matches no site.
    pub unknown_host: UnknownHostPolicy,

    pub sites: Vec<SiteConfig>,
}

impl Default for SiteResolverConfig {
    fn default() -> Self {
        Self {
            root_domain: "kampus.localhost".to_owned(),
            rewrite_prefix: "/_sites".to_owned(),
            unknown_host: UnknownHostPolicy::default(),
            sites: Vec::new(),
        }
    }
}

/// One faculty or unit site.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// URL-safe identifier used in the rewritten path.
    pub slug: String,

    /// Display name.
    pub name: String,

    /// Label under the root domain, e.g. `ft` for `ft.kampus.ac.id`.
    #[serde(default)]
    pub subdomain: Option<String>,

    /// Fully qualified domain owned by the site.
    #[serde(default)]
    pub custom_domain: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownHostPolicy {
    /// Forward the request unrewritten to the generic fallback page.
    #[default]
    Fallback,
    /// Answer with `404 Not Found`.
    NotFound,
}
