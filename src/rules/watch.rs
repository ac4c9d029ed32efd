use log::{debug, info, warn};
use notify::RecursiveMode;
use notify_debouncer_mini::{DebounceEventResult, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::{Mode, RuleStore};
use crate::error::RulesError;

const DEBOUNCE_TIMEOUT: Duration = Duration::from_secs(2);

/// Keeps the rule file watched until dropped
pub struct RuleWatcher {
    _debouncer: Debouncer<notify::RecommendedWatcher>,
    path: PathBuf,
}

impl RuleWatcher {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for RuleWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleWatcher").field("path", &self.path).finish()
    }
}

/// Request a reload of `path` whenever it changes on disk
pub fn watch(store: Arc<RuleStore>, mode: Mode, path: PathBuf) -> Result<RuleWatcher, RulesError> {
    let dir = match path.parent() {
        Some(v) if !v.as_os_str().is_empty() => v.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path.file_name().map(|v| v.to_os_string());
    debug!("watch dir: {:?}", &dir);

    let rule_file = path.clone();
    let event_handler = move |event: DebounceEventResult| match event {
        Ok(evs) => {
            if evs.iter().any(|v| v.path.file_name() == file_name.as_deref()) {
                info!("reload rules: {:?}", rule_file);
                store.request_load(mode, rule_file.clone());
            }
        }
        Err(e) => warn!("watch rule file error: {:?}", e),
    };

    let mut debouncer = notify_debouncer_mini::new_debouncer(DEBOUNCE_TIMEOUT, event_handler)?;
    debouncer
        .watcher()
        .watch(dir.as_path(), RecursiveMode::NonRecursive)?;

    Ok(RuleWatcher {
        _debouncer: debouncer,
        path,
    })
}
