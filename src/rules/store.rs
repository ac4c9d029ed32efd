use log::debug;
use parking_lot::{Mutex, RwLock};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::futures::Notified;
use tokio::sync::Notify;

use super::{LoadStatus, Mode, RuleTable};
use crate::config::setting::Setting;
use crate::metrics;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// The most recent load asked for, a newer request replaces an unserviced one
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct LoadRequest {
    pub mode: Mode,
    pub path: PathBuf,
}

#[derive(Debug, Default)]
struct LoadState {
    status: LoadStatus,
    request: Option<LoadRequest>,
}

/// Published rule table plus the load state machine driving it.
///
/// Callers request loads and resolve hostnames, the worker (see
/// [`super::worker::run`]) is the only one parsing files and publishing
/// tables. A published table is never modified, a reload swaps the whole
/// `Arc` so readers see either the old or the new table.
#[derive(Debug)]
pub struct RuleStore {
    state: Mutex<LoadState>,
    table: RwLock<Option<Arc<RuleTable>>>,
    shutdown: AtomicBool,
    wakeup: Notify,
    poll_interval: Duration,
    metrics: bool,
}

impl Default for RuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore {
    pub fn new() -> Self {
        Self::with_options(DEFAULT_POLL_INTERVAL, false)
    }

    /// `poll_interval` is raised to [`MIN_POLL_INTERVAL`] if smaller
    pub fn with_options(poll_interval: Duration, metrics: bool) -> Self {
        Self {
            state: Mutex::new(LoadState::default()),
            table: RwLock::new(None),
            shutdown: AtomicBool::new(false),
            wakeup: Notify::new(),
            poll_interval: poll_interval.max(MIN_POLL_INTERVAL),
            metrics,
        }
    }

    pub fn from_setting(setting: &Setting) -> Self {
        Self::with_options(Duration::from_millis(setting.poll_interval), setting.metrics)
    }

    /// Record a load for the worker to pick up, no I/O happens here
    pub fn request_load(&self, mode: Mode, path: impl Into<PathBuf>) {
        let path = path.into();
        debug!("request load {} file: {:?}", mode, path);

        {
            let mut state = self.state.lock();
            state.request = Some(LoadRequest { mode, path });
            state.status = LoadStatus::PendingLoad;
        }

        self.wakeup.notify_one();
    }

    pub fn request_load_hosts(&self, path: impl Into<PathBuf>) {
        self.request_load(Mode::Hosts, path)
    }

    pub fn request_load_dnsmasq(&self, path: impl Into<PathBuf>) {
        self.request_load(Mode::Dnsmasq, path)
    }

    pub fn status(&self) -> LoadStatus {
        self.state.lock().status
    }

    pub fn is_loaded(&self) -> bool {
        self.status() == LoadStatus::Loaded
    }

    /// Mode of the published table
    pub fn mode(&self) -> Option<Mode> {
        self.snapshot().map(|t| t.mode())
    }

    pub fn rule_count(&self) -> usize {
        self.snapshot().map_or(0, |t| t.len())
    }

    pub fn resolve(&self, hostname: &str) -> Option<String> {
        let addr = self
            .snapshot()
            .and_then(|t| t.resolve(hostname).map(str::to_string));

        if self.metrics {
            metrics::record_resolve(addr.is_some());
        }

        addr
    }

    /// Drop the published table, pending requests are kept
    pub fn clean(&self) {
        debug!("clean rules");
        *self.table.write() = None;

        if self.metrics {
            metrics::record_clean();
        }
    }

    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.wakeup.notify_one();
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// The published table, stays intact while a reload swaps in a new one
    pub fn snapshot(&self) -> Option<Arc<RuleTable>> {
        self.table.read().clone()
    }

    pub(crate) fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub(crate) fn notified(&self) -> Notified<'_> {
        self.wakeup.notified()
    }

    /// Move a pending request into `Loading`
    pub(crate) fn take_request(&self) -> Option<LoadRequest> {
        let mut state = self.state.lock();
        if state.status != LoadStatus::PendingLoad {
            return None;
        }

        match state.request.take() {
            Some(request) => {
                state.status = LoadStatus::Loading;
                Some(request)
            }
            None => {
                state.status = LoadStatus::NotLoaded;
                None
            }
        }
    }

    /// Publish a successful load, or keep the previous table on failure.
    ///
    /// A request that arrived during the load stays `PendingLoad`.
    pub(crate) fn finish_load(&self, table: Option<RuleTable>) {
        let loaded = table.is_some();
        let size = table.as_ref().map_or(0, |t| t.len());

        if let Some(table) = table {
            *self.table.write() = Some(Arc::new(table));
        }

        {
            let mut state = self.state.lock();
            if state.status == LoadStatus::Loading {
                state.status = if loaded {
                    LoadStatus::Loaded
                } else {
                    LoadStatus::NotLoaded
                };
            }
        }

        if self.metrics {
            metrics::record_load(loaded, size);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::parser;

    fn hosts_table(s: &str) -> RuleTable {
        parser::parse_hosts(s.as_bytes()).unwrap()
    }

    #[test]
    fn initial_state() {
        let store = RuleStore::new();
        assert_eq!(store.status(), LoadStatus::NotLoaded);
        assert!(!store.is_loaded());
        assert!(!store.is_shutdown());
        assert_eq!(store.resolve("localhost"), None);
        assert_eq!(store.mode(), None);
        assert_eq!(store.rule_count(), 0);
    }

    #[test]
    fn request_overwrites_pending() {
        let store = RuleStore::new();
        store.request_load_hosts("/etc/hosts");
        store.request_load_dnsmasq("/etc/dnsmasq.conf");
        assert_eq!(store.status(), LoadStatus::PendingLoad);

        let request = store.take_request().unwrap();
        assert_eq!(request.mode, Mode::Dnsmasq);
        assert_eq!(request.path, PathBuf::from("/etc/dnsmasq.conf"));
        assert_eq!(store.status(), LoadStatus::Loading);

        // nothing left to take
        assert!(store.take_request().is_none());
    }

    #[test]
    fn publish_and_clean() {
        let store = RuleStore::new();
        store.request_load_hosts("hosts");
        store.take_request().unwrap();
        store.finish_load(Some(hosts_table("127.0.0.1 localhost")));

        assert!(store.is_loaded());
        assert_eq!(store.mode(), Some(Mode::Hosts));
        assert_eq!(store.resolve("localhost").as_deref(), Some("127.0.0.1"));
        assert_eq!(store.resolve("localhost").as_deref(), Some("127.0.0.1"));

        store.clean();
        assert_eq!(store.resolve("localhost"), None);
        assert_eq!(store.rule_count(), 0);
        // clean does not touch the status
        assert!(store.is_loaded());
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let store = RuleStore::new();
        store.request_load_hosts("hosts");
        store.take_request().unwrap();
        store.finish_load(Some(hosts_table("127.0.0.1 localhost")));

        store.request_load_hosts("hosts");
        store.take_request().unwrap();
        store.finish_load(None);

        assert_eq!(store.status(), LoadStatus::NotLoaded);
        assert_eq!(store.resolve("localhost").as_deref(), Some("127.0.0.1"));
    }

    #[test]
    fn clean_keeps_pending_request() {
        let store = RuleStore::new();
        store.request_load_hosts("hosts");
        store.take_request().unwrap();
        store.finish_load(Some(hosts_table("127.0.0.1 localhost")));

        store.request_load_dnsmasq("ads.conf");
        store.clean();
        assert_eq!(store.status(), LoadStatus::PendingLoad);
        assert_eq!(store.resolve("localhost"), None);

        let request = store.take_request().unwrap();
        assert_eq!(request.mode, Mode::Dnsmasq);
        assert_eq!(request.path, PathBuf::from("ads.conf"));
    }

    #[test]
    fn zero_poll_interval_is_clamped() {
        let store = RuleStore::with_options(Duration::ZERO, false);
        assert_eq!(store.poll_interval(), MIN_POLL_INTERVAL);

        let store = RuleStore::with_options(Duration::from_millis(20), false);
        assert_eq!(store.poll_interval(), Duration::from_millis(20));
    }

    #[test]
    fn request_during_load_stays_pending() {
        let store = RuleStore::new();
        store.request_load_hosts("a");
        store.take_request().unwrap();

        store.request_load_hosts("b");
        store.finish_load(Some(hosts_table("1.1.1.1 a.com")));

        assert_eq!(store.status(), LoadStatus::PendingLoad);
        assert_eq!(store.resolve("a.com").as_deref(), Some("1.1.1.1"));
        assert_eq!(store.take_request().unwrap().path, PathBuf::from("b"));
    }

    #[test]
    fn reader_keeps_old_table() {
        let store = RuleStore::new();
        store.request_load_hosts("hosts");
        store.take_request().unwrap();
        store.finish_load(Some(hosts_table("1.1.1.1 old.com")));

        let old = store.snapshot().unwrap();

        store.request_load_hosts("hosts");
        store.take_request().unwrap();
        store.finish_load(Some(hosts_table("2.2.2.2 new.com")));

        assert_eq!(old.get("old.com"), Some("1.1.1.1"));
        assert_eq!(store.resolve("old.com"), None);
        assert_eq!(store.resolve("new.com").as_deref(), Some("2.2.2.2"));
    }

    #[test]
    fn record_metrics() {
        let store = RuleStore::with_options(DEFAULT_POLL_INTERVAL, true);
        let loaded = metrics::load_count("loaded");
        let hit = metrics::resolve_count("hit");

        store.request_load_hosts("hosts");
        store.take_request().unwrap();
        store.finish_load(Some(hosts_table("127.0.0.1 localhost")));
        store.resolve("localhost");

        assert!(metrics::load_count("loaded") > loaded);
        assert!(metrics::resolve_count("hit") > hit);
    }
}
