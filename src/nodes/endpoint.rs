//! Node addressing.
//!
//! # Responsibilities
//! - Represent the process-wide scheme (http/https)
//! - Represent a single node: the host string handed to callers plus a
//!   pre-built base URL used for request composition
//! - Compose fully-qualified URLs for a path without any I/O

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use url::Url;

use crate::config::validation::ValidationError;

/// Scheme shared by every node of a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl FromStr for Scheme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            _ => Err(ValidationError::UnsupportedScheme(s.to_string())),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single node of the cluster.
#[derive(Debug, Clone)]
pub struct Node {
    /// Host as given by the seed list or discovery response.
    host: String,
    /// `scheme://host:port/`, built once so formatting never fails later.
    base: Url,
}

impl Node {
    /// Build a node, or `None` if `host` cannot stand alone as the host part of a URL.
    pub fn new(host: &str, scheme: Scheme, port: u16) -> Option<Self> {
        if host.is_empty() || host.trim() != host {
            return None;
        }

        let authority = if host.parse::<Ipv6Addr>().is_ok() {
            format!("[{}]", host)
        } else {
            host.to_string()
        };

        let base = Url::parse(&format!("{}://{}:{}/", scheme, authority, port)).ok()?;

        // Reject hosts that smuggled in a path, query, credentials or a port of their own.
        let well_formed = base.path() == "/"
            && base.query().is_none()
            && base.fragment().is_none()
            && base.username().is_empty()
            && base.password().is_none()
            && base.port_or_known_default() == Some(port);

        well_formed.then(|| Self {
            host: host.to_string(),
            base,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Base URL of the node with an empty (root) path.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Fully-qualified URL for `path`, which may carry a `?query` suffix.
    pub fn url_for(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        match path.split_once('?') {
            Some((path, query)) => {
                url.set_path(path);
                url.set_query(Some(query));
            }
            None => url.set_path(path),
        }
        url
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host
    }
}

impl Eq for Node {}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.host)
    }
}
