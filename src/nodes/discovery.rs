//! Discovery requests and response parsing.
//!
//! # Wire format
//! ```text
//! GET {scheme}://{node}:{port}/localnodes
//! 200 OK
//! ["10.0.0.2","10.0.0.3"]
//! ```
//!
//! The body is a bracketed, comma-separated list of double-quoted hosts. There
//! is no escaping and no nesting, so a dedicated parser handles it instead of a
//! general structured-data decoder.

use std::time::Duration;

use crate::error::{RegistryError, Result};
use crate::nodes::endpoint::{Node, Scheme};

/// Largest discovery body accepted. A host list is a few hundred bytes.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Reasons a discovery body could not be read as a node list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("body is not enclosed in '[' and ']'")]
    MissingBrackets,

    #[error("entry {0:?} is not a double-quoted string")]
    UnquotedEntry(String),

    #[error("entry {0:?} contains an embedded quote")]
    EmbeddedQuote(String),

    #[error("entry {0:?} is not a valid host")]
    InvalidHost(String),

    #[error("body exceeds {MAX_BODY_BYTES} bytes")]
    TooLarge,

    #[error("body is not valid UTF-8")]
    NotUtf8,
}

/// Parse a discovery body into the host strings it lists, in order.
///
/// `[]` (with or without inner whitespace) is a valid, empty list.
pub fn parse_node_list(body: &str) -> std::result::Result<Vec<String>, ParseError> {
    let inner = body
        .trim()
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or(ParseError::MissingBrackets)?
        .trim();

    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|entry| {
            let entry = entry.trim();
            let host = entry
                .strip_prefix('"')
                .and_then(|s| s.strip_suffix('"'))
                .ok_or_else(|| ParseError::UnquotedEntry(entry.to_string()))?;
            if host.contains('"') {
                return Err(ParseError::EmbeddedQuote(entry.to_string()));
            }
            Ok(host.to_string())
        })
        .collect()
}

/// HTTP client for the discovery endpoint of cluster nodes.
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    client: reqwest::Client,
    path: String,
    scheme: Scheme,
    port: u16,
}

impl DiscoveryClient {
    pub fn new(scheme: Scheme, port: u16, path: &str, timeout: Duration) -> Result<Self> {
        // Nodes are addressed directly, never through an environment proxy.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(RegistryError::HttpClient)?;

        Ok(Self {
            client,
            path: path.to_string(),
            scheme,
            port,
        })
    }

    /// Ask `node` for the nodes it currently sees as live.
    pub async fn fetch(&self, node: &Node) -> Result<Vec<Node>> {
        let url = node.url_for(&self.path);
        let transport = |source: reqwest::Error| RegistryError::DiscoveryTransport {
            node: node.host().to_string(),
            source,
        };

        let mut response = self.client.get(url).send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::DiscoveryStatus {
                node: node.host().to_string(),
                status,
            });
        }

        if response
            .content_length()
            .is_some_and(|len| len > MAX_BODY_BYTES as u64)
        {
            return Err(ParseError::TooLarge.into());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(transport)? {
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(ParseError::TooLarge.into());
            }
            body.extend_from_slice(&chunk);
        }

        let body = String::from_utf8(body).map_err(|_| ParseError::NotUtf8)?;
        self.to_nodes(&body)
    }

    /// Parse a body and turn each listed host into a node.
    pub fn to_nodes(&self, body: &str) -> Result<Vec<Node>> {
        parse_node_list(body)?
            .into_iter()
            .map(|host| {
                Node::new(&host, self.scheme, self.port)
                    .ok_or(RegistryError::DiscoveryParse(ParseError::InvalidHost(host)))
            })
            .collect()
    }
}
