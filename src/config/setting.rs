use serde::Deserialize;

use crate::rules::Mode;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Setting {
    pub mode: Mode,
    pub path: String,
    /// worker poll interval in milliseconds
    pub poll_interval: u64,
    pub watch: bool,
    pub verbose: bool,
    pub metrics: bool,
}

impl Default for Setting {
    fn default() -> Self {
        Self {
            mode: Mode::Hosts,
            path: String::from("/etc/hosts"),
            poll_interval: 100,
            watch: false,
            verbose: false,
            metrics: false,
        }
    }
}
