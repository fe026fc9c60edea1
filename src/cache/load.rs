use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

use futures::channel::oneshot;
use tracing::Instrument;

use super::Inner;
use crate::loader::Loader;
use crate::observer::Observer;

/// Drives a single load to completion and publishes its outcome.
///
/// The entry is finished (promoted or cleared) *before* the outcome is sent,
/// so a woken waiter always observes the final state of the map.
pub(super) async fn run<K, L, O, S>(
    mut guard: ClearOnDrop<K, L, O, S>,
    sender: oneshot::Sender<Result<L::Value, L::Error>>,
) where
    K: Eq + Hash + Clone,
    L: Loader<K>,
    L::Value: Clone,
    O: Observer,
    S: BuildHasher,
{
    let inner = Arc::clone(&guard.inner);
    let key = guard.key.clone();

    let outcome = inner.loader.load(key.clone()).await;

    match &outcome {
        Ok(value) => {
            inner.map.promote(&key, value.clone());
            guard.armed = false;

            tracing::debug!("load finished, entry is ready");
            inner.observer.notify();
        }
        Err(_) => {
            // the guard clears the entry so the next caller retries
            drop(guard);

            tracing::debug!("load failed, entry cleared");
        }
    }

    // nobody is waiting anymore, which is fine
    let _ = sender.send(outcome);
}

/// Spawn [`run`] on its own task so it outlives every caller.
///
/// The guard is moved into the task up front, if the task is dropped without ever
/// being polled (the runtime shut down first) the entry is still cleared.
pub(super) fn spawn<K, L, O, S>(
    runtime: &tokio::runtime::Handle,
    inner: Arc<Inner<K, L, O, S>>,
    key: K,
    sender: oneshot::Sender<Result<L::Value, L::Error>>,
) where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    L: Loader<K> + Send + Sync + 'static,
    L::Value: Clone + Send + Sync + 'static,
    L::Error: Send + Sync + 'static,
    O: Observer,
    S: BuildHasher + Send + Sync + 'static,
{
    let guard = ClearOnDrop {
        inner,
        key,
        armed: true,
    };
    let span = tracing::debug_span!("keyed_load");

    // detached, the join handle is never awaited
    drop(runtime.spawn(run(guard, sender).instrument(span)));
}

/// Clears the in progress entry unless the load finished.
///
/// Covers a loader that errors or panics, and a load task that never ran at all.
pub(super) struct ClearOnDrop<K, L, O, S>
where
    K: Eq + Hash,
    L: Loader<K>,
    L::Value: Clone,
    S: BuildHasher,
{
    inner: Arc<Inner<K, L, O, S>>,
    key: K,
    armed: bool,
}

impl<K, L, O, S> Drop for ClearOnDrop<K, L, O, S>
where
    K: Eq + Hash,
    L: Loader<K>,
    L::Value: Clone,
    S: BuildHasher,
{
    fn drop(&mut self) {
        if self.armed {
            self.inner.map.clear(&self.key);
        }
    }
}
