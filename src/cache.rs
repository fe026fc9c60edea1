mod builder;
mod get;
mod load;

pub use builder::CacheBuilder;
pub use get::GetFuture;

use crate::loader::Loader;
use crate::map::{Entry, EntryMap};
use crate::observer::{NoopObserver, Observer};

use futures::channel::oneshot;
use futures::FutureExt;
use hashbrown::hash_map;
use hashbrown::hash_map::DefaultHashBuilder;

use std::hash::{BuildHasher, Hash};
use std::sync::Arc;

/// A concurrent map from keys to asynchronously loaded values, loading each key at most once at a time.
///
/// Every key is in one of three states: absent, in progress or ready.
/// A miss registers an in progress entry and spawns the loader for that key,
/// every caller that arrives before it finishes waits on the same load.
/// On success the entry becomes ready and is never loaded again,
/// on failure the entry is removed so the next access retries.
pub struct KeyedLoadCache<K, L, O = NoopObserver, S = DefaultHashBuilder>
where
    L: Loader<K>,
{
    inner: Arc<Inner<K, L, O, S>>,
}

pub(crate) struct Inner<K, L, O, S>
where
    L: Loader<K>,
{
    map: EntryMap<K, L::Value, L::Error, S>,
    loader: L,
    observer: O,
    runtime: Option<tokio::runtime::Handle>,
}

impl<K, L, O, S> Clone for KeyedLoadCache<K, L, O, S>
where
    L: Loader<K>,
{
    fn clone(&self) -> Self {
        KeyedLoadCache {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, L> KeyedLoadCache<K, L>
where
    L: Loader<K>,
{
    pub fn new(loader: L) -> Self {
        CacheBuilder::new().build(loader)
    }
}

impl<K, L, O> KeyedLoadCache<K, L, O>
where
    L: Loader<K>,
{
    /// Create a cache that tells `observer` about every successful load
    pub fn with_observer(loader: L, observer: O) -> Self {
        CacheBuilder::new().build_with_observer(loader, observer)
    }
}

impl<K, L, O, S> KeyedLoadCache<K, L, O, S>
where
    L: Loader<K>,
{
    pub fn loader(&self) -> &L {
        &self.inner.loader
    }

    pub fn observer(&self) -> &O {
        &self.inner.observer
    }

    /// The number of entries, both ready and in progress
    pub fn len(&self) -> usize {
        self.inner.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, L, O, S> KeyedLoadCache<K, L, O, S>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    L: Loader<K> + Send + Sync + 'static,
    L::Value: Clone + Send + Sync + 'static,
    L::Error: Clone + Send + Sync + 'static,
    O: Observer,
    S: BuildHasher + Send + Sync + 'static,
{
    /// Get the value for the given key, loading it if needed
    ///
    /// The lookup, and on a miss the registration of the new load, happen right away when this is called,
    /// not when the returned future is first polled. The load runs on its own task, so dropping the
    /// future does not cancel it and its outcome still lands in the cache.
    ///
    /// If another load for this key is already running this waits on it instead of starting a new one,
    /// every waiter sees the same value or the same error.
    ///
    /// # Panics
    /// On a miss, if no runtime was configured on the builder and this is not called from within a tokio runtime.
    /// The returned future panics if the loader it waits on panicked.
    pub fn get(&self, key: K) -> GetFuture<L::Value, L::Error> {
        let mut shard = self.inner.map.lock(&key);

        match shard.entry(key) {
            hash_map::Entry::Occupied(occupied) => match occupied.get() {
                Entry::Ready(value) => {
                    tracing::trace!("cache hit");

                    GetFuture::Ready(Some(value.clone()))
                }
                Entry::InProgress(handle) => {
                    tracing::trace!("joining in progress load");

                    GetFuture::Waiting(handle.clone())
                }
            },
            hash_map::Entry::Vacant(vacant) => {
                // resolve the runtime before registering, so a panic here leaves nothing behind
                let runtime = self.runtime();

                let (sender, receiver) = oneshot::channel();
                let handle = receiver.shared();
                let key = vacant.key().clone();

                // registered before the loader is even called, anyone after us will join this handle
                vacant.insert(Entry::InProgress(handle.clone()));
                drop(shard);

                tracing::debug!("cache miss, starting load");
                load::spawn(&runtime, Arc::clone(&self.inner), key, sender);

                GetFuture::Waiting(handle)
            }
        }
    }

    /// Return the value if its already loaded, never waits and never starts a load
    pub fn retrieve_if_available(&self, key: &K) -> Option<L::Value> {
        self.inner.map.get_ready(key)
    }

    /// Like [`Self::retrieve_if_available`] but also makes sure a load is running for the key if its not ready
    ///
    /// Nothing is waited on and any error from the load is not reported here,
    /// it only shows up in the cache, a failed key will be retried by the next [`Self::get`].
    ///
    /// # Panics
    /// If a load needs to be started and there is no runtime to spawn it on, see [`Self::get`].
    pub fn request_background(&self, key: K) -> Option<L::Value> {
        match self.get(key) {
            GetFuture::Ready(value) => value,
            GetFuture::Waiting(_) => None,
        }
    }

    /// Is a load currently running for this key
    pub fn is_loading(&self, key: &K) -> bool {
        self.inner.map.is_in_progress(key)
    }

    fn runtime(&self) -> tokio::runtime::Handle {
        match &self.inner.runtime {
            Some(runtime) => runtime.clone(),
            None => tokio::runtime::Handle::current(),
        }
    }
}
