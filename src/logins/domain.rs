//! Hostname parsing and registrable-domain derivation

use url::{Host, Url};

/// Parsed pieces of a login hostname used for grouping and ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostKey {
    /// Full host, lowercased
    pub host: String,
    /// Registrable domain (eTLD+1)
    pub base_domain: String,
    /// Uppercase first character of `base_domain`
    pub group: String,
}

/// Parse a stored hostname into a URL with a host.
///
/// Stored hostnames are usually origins (`https://mail.example.com`) but bare
/// hosts (`mail.example.com`, `example.com:8443`) are accepted too.
pub fn site_url(hostname: &str) -> Option<Url> {
    let trimmed = hostname.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(trimmed) {
        if url.host().is_some() {
            return Some(url);
        }
    }

    // "mail.example.com:8443" parses with "mail.example.com" as its scheme
    Url::parse(&format!("http://{}", trimmed))
        .ok()
        .filter(|url| url.host().is_some())
}

/// Registrable domain of a hostname, if it has one.
pub fn base_domain(hostname: &str) -> Option<String> {
    host_key(hostname).map(|k| k.base_domain)
}

/// Derive host, base domain and grouping key in one parse.
///
/// IP literals have no registrable domain and yield `None`.
pub fn host_key(hostname: &str) -> Option<HostKey> {
    let url = site_url(hostname)?;
    let Host::Domain(domain) = url.host()? else {
        return None;
    };
    let host = domain.trim_end_matches('.').to_lowercase();
    let base_domain = psl::domain_str(&host)?.to_string();
    let group = grouping_key(&base_domain)?;
    Some(HostKey {
        host,
        base_domain,
        group,
    })
}

/// Uppercase first character of a base domain.
pub fn grouping_key(base_domain: &str) -> Option<String> {
    base_domain
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect())
}
