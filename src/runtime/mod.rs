use anyhow::Error;
use log::{error, info};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::config::Setting;
use crate::rules::{watch, worker, RuleStore, RuleWatcher};

/// Runtime context holding the rule store and its background workers
pub struct RuntimeContext {
    pub setting: Arc<Setting>,
    pub store: Arc<RuleStore>,
    worker: Mutex<Option<JoinHandle<()>>>,
    watcher: Mutex<Option<RuleWatcher>>,
}

pub type ArcRuntime = Arc<RuntimeContext>;

/// Spawn the loader worker on the current tokio runtime and request the
/// configured rule file.
pub fn start(setting: Setting) -> Result<ArcRuntime, Error> {
    let store = Arc::new(RuleStore::from_setting(&setting));
    let path = PathBuf::from(&setting.path);

    let handle = tokio::spawn(worker::run(store.clone()));
    store.request_load(setting.mode, path.clone());

    let watcher = if setting.watch {
        match watch::watch(store.clone(), setting.mode, path) {
            Ok(w) => Some(w),
            Err(e) => {
                store.shutdown();
                return Err(e.into());
            }
        }
    } else {
        None
    };

    info!("rules runtime started, {} file: {}", setting.mode, setting.path);

    Ok(Arc::new(RuntimeContext {
        setting: Arc::new(setting),
        store,
        worker: Mutex::new(Some(handle)),
        watcher: Mutex::new(watcher),
    }))
}

impl RuntimeContext {
    pub fn resolve(&self, hostname: &str) -> Option<String> {
        self.store.resolve(hostname)
    }

    /// Stop watching, stop the worker and wait for it
    pub async fn shutdown(&self) {
        self.watcher.lock().take();
        self.store.shutdown();

        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!("rules worker join failed: {:?}", e);
            }
        }
    }
}
