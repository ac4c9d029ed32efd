use std::collections::HashMap;

use super::Mode;

/// Hostname to address rules parsed from a single file.
///
/// Built once by the parser, then shared read-only behind an `Arc`.
#[derive(Debug, Default, Clone)]
pub struct RuleTable {
    mode: Mode,
    rules: HashMap<String, String>,
}

impl RuleTable {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            rules: HashMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, hostname: &str, addr: &str) {
        self.rules.insert(hostname.to_string(), addr.to_string());
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// exact match only
    pub fn get(&self, hostname: &str) -> Option<&str> {
        self.rules.get(hostname).map(String::as_str)
    }

    /// Exact match first, then in dnsmasq mode the longest matching parent
    /// domain, e.g. `ad.doubleclick.net` -> `doubleclick.net` -> `net`.
    pub fn resolve(&self, hostname: &str) -> Option<&str> {
        if let Some(addr) = self.get(hostname) {
            return Some(addr);
        }

        if self.mode != Mode::Dnsmasq {
            return None;
        }

        let name = hostname.trim_end_matches('.');
        name.match_indices('.')
            .find_map(|(i, _)| self.get(&name[i + 1..]))
    }
}
