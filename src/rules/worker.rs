use log::{debug, error, info};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::{self, JoinError};
use tokio::time;

use super::parser;
use super::store::{LoadRequest, RuleStore};

/// Loader loop, meant to run as its own tokio task.
///
/// Checks for a pending request every poll interval, `request_load` and
/// `shutdown` wake it early. A load that has started always runs to the end.
pub async fn run(store: Arc<RuleStore>) {
    debug!("rules worker started, poll interval: {:?}", store.poll_interval());

    while !store.is_shutdown() {
        if let Some(request) = store.take_request() {
            if let Err(e) = load(&store, request).await {
                error!("rules worker stopped: {:?}", e);
                return;
            }
        }

        tokio::select! {
            _ = time::sleep(store.poll_interval()) => {}
            _ = store.notified() => {}
        }
    }

    debug!("rules worker shutdown");
}

async fn load(store: &RuleStore, request: LoadRequest) -> Result<(), JoinError> {
    let LoadRequest { mode, path } = request;
    info!("load {} rules: {:?}", mode, path);

    let start = Instant::now();
    let file = path.clone();
    let result = task::spawn_blocking(move || parser::load_file(mode, &file)).await;

    match result {
        Ok(Ok(table)) => {
            info!(
                "loaded {} {} rules from {:?} in {:?}",
                table.len(),
                mode,
                path,
                start.elapsed()
            );
            store.finish_load(Some(table));
        }
        Ok(Err(e)) => {
            error!("load rules {:?} failed, {}", path, e);
            store.finish_load(None);
        }
        Err(e) if e.is_panic() => {
            error!("load rules {:?} panicked", path);
            store.finish_load(None);
        }
        Err(e) => {
            store.finish_load(None);
            return Err(e);
        }
    }

    Ok(())
}
