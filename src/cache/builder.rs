use super::{Inner, KeyedLoadCache};
use crate::loader::Loader;
use crate::map::{max_parallelism, EntryMap};
use crate::observer::NoopObserver;

use hashbrown::hash_map::DefaultHashBuilder;

use std::hash::BuildHasher;
use std::sync::Arc;

/// Configures a [`KeyedLoadCache`] before it is created.
#[derive(Default)]
pub struct CacheBuilder {
    pub(crate) shards: Option<usize>,
    pub(crate) estimated_size: Option<usize>,
    pub(crate) runtime: Option<tokio::runtime::Handle>,
}

impl CacheBuilder {
    pub fn new() -> Self {
        CacheBuilder {
            shards: None,
            estimated_size: None,
            runtime: None,
        }
    }

    /// The number of independently locked shards, rounded up to a power of two.
    ///
    /// Defaults to four times the available parallelism, `1` puts every key behind one lock.
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = Some(shards);
        self
    }

    pub fn estimated_size(mut self, estimated_size: usize) -> Self {
        self.estimated_size = Some(estimated_size);
        self
    }

    /// The runtime loads are spawned on.
    ///
    /// Without one, loads are spawned on whichever runtime the missing [`KeyedLoadCache::get`] was called from.
    pub fn runtime(mut self, runtime: tokio::runtime::Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn build<K, L>(self, loader: L) -> KeyedLoadCache<K, L>
    where
        L: Loader<K>,
    {
        self.build_with_observer(loader, NoopObserver)
    }

    pub fn build_with_observer<K, L, O>(self, loader: L, observer: O) -> KeyedLoadCache<K, L, O>
    where
        L: Loader<K>,
    {
        self.build_with_hasher(loader, observer, DefaultHashBuilder::default())
    }

    pub fn build_with_hasher<K, L, O, S>(
        self,
        loader: L,
        observer: O,
        build_hasher: S,
    ) -> KeyedLoadCache<K, L, O, S>
    where
        L: Loader<K>,
        S: BuildHasher + Clone,
    {
        let shards = self.shards.unwrap_or_else(|| max_parallelism() * 4);

        KeyedLoadCache {
            inner: Arc::new(Inner {
                map: EntryMap::new(shards, self.estimated_size, build_hasher),
                loader,
                observer,
                runtime: self.runtime,
            }),
        }
    }
}
