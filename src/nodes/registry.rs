//! Node registry: round-robin selection over a self-refreshing live list.
//!
//! # Responsibilities
//! - Hand out the next live node to any number of concurrent callers
//! - Periodically ask one live node for the cluster's current node list
//! - Quarantine nodes whose discovery request failed until the bad set resets
//! - Never let the live list become empty
//!
//! # Design Decisions
//! - The live list and its cursor travel together in one `LiveSet` snapshot
//!   behind `ArcSwap`; readers never lock and never see a torn pair
//! - The discovery target is picked with the same `next` call callers use, so
//!   discovery traffic takes a turn in the public rotation
//! - The network call happens before the swap; only the final `store` touches
//!   shared state

use std::sync::Arc;
use std::time::{Duration, Instant};

use arc_swap::ArcSwap;
use tokio::sync::broadcast;
use tokio::time;
use url::Url;

use crate::config::validation::{validate_config, ValidationError};
use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::lifecycle::Shutdown;
use crate::nodes::bad_set::BadSet;
use crate::nodes::discovery::DiscoveryClient;
use crate::nodes::endpoint::{Node, Scheme};
use crate::nodes::live_set::LiveSet;
use crate::observability::metrics::{self, DiscoveryOutcome};

/// Handle to a running registry. Cheap to clone; the refresh loop stops when
/// `stop` is called or the last handle is dropped.
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    live: Arc<ArcSwap<LiveSet>>,
    scheme: Scheme,
    port: u16,
    shutdown: Arc<Shutdown>,
}

impl NodeRegistry {
    /// Validate `config`, seed the live list and spawn the refresh loop on the
    /// current tokio runtime.
    pub fn start(config: RegistryConfig) -> Result<Self> {
        validate_config(&config)?;

        let scheme: Scheme = config.scheme.parse().map_err(|e| RegistryError::from(vec![e]))?;
        let seeds: Vec<Node> = config
            .seeds
            .iter()
            .filter_map(|host| Node::new(host, scheme, config.port))
            .collect();
        let live_set =
            LiveSet::new(seeds).ok_or_else(|| RegistryError::from(vec![ValidationError::EmptySeeds]))?;

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| RegistryError::NoRuntime)?;
        let discovery = DiscoveryClient::new(
            scheme,
            config.port,
            &config.discovery_path,
            config.request_timeout(),
        )?;

        metrics::set_live_count(live_set.len());
        let live = Arc::new(ArcSwap::from_pointee(live_set));
        let shutdown = Arc::new(Shutdown::new());

        let refresher = Refresher {
            live: live.clone(),
            bad: BadSet::new(config.bad_nodes_reset(), Instant::now()),
            discovery,
            interval: config.refresh_interval(),
        };
        // Detached: the runtime does not wait on this task when it shuts down.
        runtime.spawn(refresher.run(shutdown.subscribe()));

        tracing::info!(
            scheme = %scheme,
            port = config.port,
            seeds = ?config.seeds,
            "Node registry started"
        );

        Ok(Self {
            live,
            scheme,
            port: config.port,
            shutdown,
        })
    }

    /// Start a registry seeded with the single node named by `uri`.
    pub fn from_uri(uri: &str) -> Result<Self> {
        Self::start(RegistryConfig::from_uri(uri)?)
    }

    /// Return the host at the cursor and advance the cursor.
    pub fn next_node(&self) -> String {
        self.next().host().to_string()
    }

    /// Fully-qualified URL for `path` on the next node.
    pub fn next_node_url(&self, path: &str) -> Url {
        self.next().url_for(path)
    }

    /// Root URL (`scheme://host:port/`) of the next node.
    pub fn next_node_uri(&self) -> Url {
        self.next().base_url().clone()
    }

    fn next(&self) -> Node {
        let node = self.live.load().next().clone();
        tracing::trace!(node = %node, "Using node");
        node
    }

    /// Copy of the current live list, in rotation order.
    pub fn live_nodes(&self) -> Vec<String> {
        self.live
            .load()
            .nodes()
            .iter()
            .map(|n| n.host().to_string())
            .collect()
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Ask the refresh loop to exit. Idempotent.
    pub fn stop(&self) {
        self.shutdown.trigger();
    }
}

/// Background task that keeps the live list current.
struct Refresher {
    live: Arc<ArcSwap<LiveSet>>,
    bad: BadSet,
    discovery: DiscoveryClient,
    interval: Duration,
}

impl Refresher {
    async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Live node refresher starting");

        loop {
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = self.refresh() => {}
            }
            tokio::select! {
                biased;
                _ = shutdown.recv() => break,
                _ = time::sleep(self.interval) => {}
            }
        }

        tracing::info!("Live node refresher stopping");
    }

    /// One discovery cycle.
    async fn refresh(&mut self) {
        if self.bad.expire(Instant::now()) {
            tracing::debug!("Cleared bad nodes list");
            metrics::record_bad_reset();
            metrics::set_bad_count(0);
        }

        let target = self.live.load().next().clone();

        let outcome = match self.discovery.fetch(&target).await {
            Ok(candidates) => self.apply(candidates),
            Err(e) if e.marks_node_bad() => {
                tracing::debug!(node = %target, error = %e, "Discovery request failed");
                self.bad.insert(target.host());
                metrics::set_bad_count(self.bad.len());
                tracing::warn!(node = %target, "Marked node as bad");
                match e {
                    RegistryError::DiscoveryStatus { .. } => DiscoveryOutcome::StatusError,
                    _ => DiscoveryOutcome::TransportError,
                }
            }
            Err(e) => {
                tracing::debug!(node = %target, error = %e, "Ignoring malformed discovery response");
                DiscoveryOutcome::ParseError
            }
        };

        metrics::record_discovery(outcome);
    }

    /// Reconcile a discovery result into the live list.
    fn apply(&self, candidates: Vec<Node>) -> DiscoveryOutcome {
        let candidates = self.bad.filter(candidates);

        if self.live.load().same_nodes(&candidates) {
            return DiscoveryOutcome::Unchanged;
        }

        let Some(live_set) = LiveSet::new(candidates) else {
            tracing::debug!("No usable nodes in discovery response, keeping current list");
            return DiscoveryOutcome::Empty;
        };

        metrics::set_live_count(live_set.len());
        let hosts: Vec<&str> = live_set.nodes().iter().map(Node::host).collect();
        tracing::debug!(nodes = ?hosts, "Updated live nodes");
        if !self.bad.is_empty() {
            tracing::debug!(bad = ?self.bad.hosts(), "Bad nodes");
        }

        self.live.store(Arc::new(live_set));
        DiscoveryOutcome::Updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(hosts: &[&str]) -> Vec<Node> {
        hosts
            .iter()
            .map(|h| Node::new(h, Scheme::Http, 8080).unwrap())
            .collect()
    }

    fn refresher(seeds: &[&str]) -> Refresher {
        Refresher {
            live: Arc::new(ArcSwap::from_pointee(LiveSet::new(nodes(seeds)).unwrap())),
            bad: BadSet::new(Duration::from_secs(3600), Instant::now()),
            discovery: DiscoveryClient::new(Scheme::Http, 8080, "/localnodes", Duration::from_secs(1))
                .unwrap(),
            interval: Duration::from_secs(1),
        }
    }

    fn live_hosts(r: &Refresher) -> Vec<String> {
        r.live.load().nodes().iter().map(|n| n.host().to_string()).collect()
    }

    #[test]
    fn test_apply_replaces_list_and_resets_cursor() {
        let r = refresher(&["10.0.0.1"]);
        r.live.load().next();

        assert_eq!(r.apply(nodes(&["10.0.0.2", "10.0.0.3"])), DiscoveryOutcome::Updated);
        assert_eq!(live_hosts(&r), vec!["10.0.0.2", "10.0.0.3"]);
        assert_eq!(r.live.load().next().host(), "10.0.0.2");
    }

    #[test]
    fn test_apply_filters_bad_nodes() {
        let mut r = refresher(&["10.0.0.1"]);
        r.bad.insert("10.0.0.2");

        assert_eq!(r.apply(nodes(&["10.0.0.2", "10.0.0.3"])), DiscoveryOutcome::Updated);
        assert_eq!(live_hosts(&r), vec!["10.0.0.3"]);
    }

    #[test]
    fn test_apply_keeps_list_when_nothing_usable() {
        let mut r = refresher(&["10.0.0.1", "10.0.0.2"]);
        assert_eq!(r.apply(Vec::new()), DiscoveryOutcome::Empty);

        r.bad.insert("10.0.0.9");
        assert_eq!(r.apply(nodes(&["10.0.0.9"])), DiscoveryOutcome::Empty);
        assert_eq!(live_hosts(&r), vec!["10.0.0.1", "10.0.0.2"]);
    }

    #[test]
    fn test_apply_same_list_keeps_rotation() {
        let r = refresher(&["a", "b", "c"]);
        assert_eq!(r.live.load().next().host(), "a");

        assert_eq!(r.apply(nodes(&["a", "b", "c"])), DiscoveryOutcome::Unchanged);
        assert_eq!(r.live.load().next().host(), "b");
    }

    #[test]
    fn test_start_outside_runtime() {
        let err = NodeRegistry::start(RegistryConfig::new("http", ["10.0.0.1"], 8080)).unwrap_err();
        assert!(matches!(err, RegistryError::NoRuntime));
    }

    #[test]
    fn test_start_rejects_empty_seeds() {
        let err = NodeRegistry::start(RegistryConfig::new("http", Vec::<String>::new(), 8080))
            .unwrap_err();
        assert!(matches!(err, RegistryError::InvalidConfig(ref e) if e.contains(&ValidationError::EmptySeeds)));
    }

    #[tokio::test]
    async fn test_url_helpers() {
        let config = RegistryConfig::new("https", ["10.0.0.1", "10.0.0.2"], 8043);
        let registry = NodeRegistry::start(config).unwrap();
        // Stopped before the loop is first polled, so it never takes a turn.
        registry.stop();

        let first = registry.next_node_url("/items?limit=1");
        assert_eq!(first.as_str(), "https://10.0.0.1:8043/items?limit=1");

        let second = registry.next_node_uri();
        assert_eq!(second.as_str(), "https://10.0.0.2:8043/");

        assert_eq!(registry.next_node(), "10.0.0.1");
        assert_eq!(registry.scheme(), Scheme::Https);
        assert_eq!(registry.port(), 8043);
    }

    #[tokio::test]
    async fn test_stop_interrupts_long_sleep() {
        // Nothing listens on this port, so the first cycle fails fast.
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let mut config = RegistryConfig::new("http", ["127.0.0.1"], port);
        config.refresh_interval_ms = 3_600_000;
        let registry = NodeRegistry::start(config).unwrap();
        assert_eq!(registry.shutdown.receiver_count(), 1);

        // First cycle done, loop now parked in its hour-long sleep.
        time::sleep(Duration::from_millis(300)).await;
        assert_eq!(registry.shutdown.receiver_count(), 1);

        registry.stop();
        let deadline = time::Instant::now() + Duration::from_millis(100);
        while registry.shutdown.receiver_count() > 0 && time::Instant::now() < deadline {
            time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(registry.shutdown.receiver_count(), 0);
        assert_eq!(registry.live_nodes(), vec!["127.0.0.1".to_string()]);
    }
}
