//! Host to site lookup and path rewriting.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use request_gate::normalize_path;
use serde::Serialize;

use crate::config::{SiteConfig, SiteResolverConfig, UnknownHostPolicy};
use crate::error::SiteConfigError;

/// A resolved site, inserted into rewritten requests as an extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteInfo {
    pub slug: String,
    pub name: String,
    /// Every host that maps to this site, custom domain first.
    pub hosts: Vec<String>,
}

pub struct SiteResolver {
    root_domain: String,
    rewrite_prefix: String,
    unknown_host: UnknownHostPolicy,
    sites: Vec<Arc<SiteInfo>>,
    custom_domains: HashMap<String, Arc<SiteInfo>>,
    subdomains: HashMap<String, Arc<SiteInfo>>,
}

impl SiteResolver {
    /// Build the lookup tables.
    ///
    /// # Errors
    ///
    /// Returns [`SiteConfigError`] for malformed slugs or hosts, for a slug
    /// or host claimed twice, or for an unusable rewrite prefix.
    pub fn from_config(cfg: &SiteResolverConfig) -> Result<Self, SiteConfigError> {
        let root_domain = normalize_host(&cfg.root_domain);
        if !is_valid_domain(&root_domain) {
            return Err(SiteConfigError::InvalidRootDomain(cfg.root_domain.clone()));
        }

        let rewrite_prefix = normalize_path(&cfg.rewrite_prefix).map_err(|e| {
            SiteConfigError::InvalidRewritePrefix {
                value: cfg.rewrite_prefix.clone(),
                reason: e.to_string(),
            }
        })?;
        if rewrite_prefix == "/" {
            return Err(SiteConfigError::InvalidRewritePrefix {
                value: cfg.rewrite_prefix.clone(),
                reason: "the root path cannot be used as a prefix".to_owned(),
            });
        }

        let mut sites = Vec::with_capacity(cfg.sites.len());
        let mut custom_domains = HashMap::new();
        let mut subdomains = HashMap::new();
        // Every host string, for cross-checking custom domains against subdomains.
        let mut claimed: HashMap<String, String> = HashMap::new();

        for site in &cfg.sites {
            validate_slug(&site.slug)?;
            if sites.iter().any(|s: &Arc<SiteInfo>| s.slug == site.slug) {
                return Err(SiteConfigError::DuplicateSlug(site.slug.clone()));
            }

            let hosts = site_hosts(site, &root_domain)?;
            for host in &hosts {
                match claimed.entry(host.clone()) {
                    Entry::Occupied(e) => {
                        return Err(SiteConfigError::DuplicateHost {
                            host: host.clone(),
                            first: e.get().clone(),
                            second: site.slug.clone(),
                        });
                    }
                    Entry::Vacant(e) => {
                        e.insert(site.slug.clone());
                    }
                }
            }

            let info = Arc::new(SiteInfo {
                slug: site.slug.clone(),
                name: site.name.clone(),
                hosts,
            });
            if let Some(domain) = &site.custom_domain {
                custom_domains.insert(normalize_host(domain), info.clone());
            }
            if let Some(label) = &site.subdomain {
                subdomains.insert(normalize_host(label), info.clone());
            }
            sites.push(info);
        }

        tracing::info!(
            root_domain = %root_domain,
            sites = sites.len(),
            unknown_host = ?cfg.unknown_host,
            "Site resolver configured"
        );

        Ok(Self {
            root_domain,
            rewrite_prefix,
            unknown_host: cfg.unknown_host,
            sites,
            custom_domains,
            subdomains,
        })
    }

    #[must_use]
    pub fn sites(&self) -> &[Arc<SiteInfo>] {
        &self.sites
    }

    #[must_use]
    pub fn rewrite_prefix(&self) -> &str {
        &self.rewrite_prefix
    }

    #[must_use]
    pub fn unknown_host(&self) -> UnknownHostPolicy {
        self.unknown_host
    }

    /// Resolve a `Host` header value to a site.
    ///
    /// The port and a trailing dot are ignored and matching is
    /// case-insensitive. Custom domains are checked before subdomains.
    #[must_use]
    pub fn resolve_host(&self, host: &str) -> Option<&Arc<SiteInfo>> {
        let host = normalize_host(strip_port(host));
        if let Some(site) = self.custom_domains.get(&host) {
            return Some(site);
        }
        let label = host
            .strip_suffix(&self.root_domain)
            .and_then(|rest| rest.strip_suffix('.'))?;
        if label.contains('.') {
            return None;
        }
        self.subdomains.get(label)
    }

    /// Rewrite a public path into the site namespace.
    ///
    /// `/` becomes `/_sites/<slug>`, anything else `/_sites/<slug><path>`.
    #[must_use]
    pub fn rewrite_path(&self, site: &SiteInfo, path: &str) -> String {
        if path == "/" || path.is_empty() {
            format!("{}/{}", self.rewrite_prefix, site.slug)
        } else {
            format!("{}/{}{path}", self.rewrite_prefix, site.slug)
        }
    }

    /// Whether a (raw) request path already addresses the rewrite namespace.
    #[must_use]
    pub fn is_internal_path(&self, path: &str) -> bool {
        normalize_path(path).is_ok_and(|p| {
            p.strip_prefix(&self.rewrite_prefix)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }
}

fn site_hosts(site: &SiteConfig, root_domain: &str) -> Result<Vec<String>, SiteConfigError> {
    let invalid = |host: &str, reason| SiteConfigError::InvalidHost {
        slug: site.slug.clone(),
        host: host.to_owned(),
        reason,
    };

    let mut hosts = Vec::new();
    if let Some(domain) = &site.custom_domain {
        let domain = normalize_host(domain);
        if !is_valid_domain(&domain) {
            return Err(invalid(&domain, "not a valid domain name"));
        }
        hosts.push(domain);
    }
    if let Some(label) = &site.subdomain {
        let label = normalize_host(label);
        if !is_valid_label(&label) {
            return Err(invalid(&label, "subdomain must be a single DNS label"));
        }
        hosts.push(format!("{label}.{root_domain}"));
    }
    Ok(hosts)
}

fn validate_slug(slug: &str) -> Result<(), SiteConfigError> {
    let invalid = |reason| SiteConfigError::InvalidSlug {
        slug: slug.to_owned(),
        reason,
    };
    if slug.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
    {
        return Err(invalid("only lowercase letters, digits, '-' and '_' are allowed"));
    }
    Ok(())
}

fn normalize_host(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        // IPv6 literal: keep the brackets, drop the port.
        return rest.find(']').map_or(host, |end| &host[..end + 2]);
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty() && domain.len() <= 253 && domain.split('.').all(is_valid_label)
}
