use parking_lot::{Mutex, MutexGuard};
use std::hash::{BuildHasher, Hash, Hasher};

use futures::channel::oneshot;
use futures::future::Shared;
use hashbrown::HashMap;

/// A handle to a load that is still running, any number of waiters can clone and await it.
///
/// Resolves to `Err(Canceled)` only if the load task went away without sending, ie. the loader panicked
/// or the runtime shut down before the task finished.
pub(crate) type Handle<V, E> = Shared<oneshot::Receiver<Result<V, E>>>;

pub(crate) enum Entry<V, E> {
    InProgress(Handle<V, E>),
    Ready(V),
}

/// The entry map, split into shards that are each guarded by their own lock.
///
/// A key always hashes to the same shard, so every read and write for a given key
/// is serialized through that shard's mutex.
pub(crate) struct EntryMap<K, V, E, S> {
    build_hasher: S,
    shards: Box<[Mutex<HashMap<K, Entry<V, E>, S>>]>,
}

pub(crate) type Shard<'a, K, V, E, S> = MutexGuard<'a, HashMap<K, Entry<V, E>, S>>;

impl<K, V, E, S> EntryMap<K, V, E, S>
where
    S: BuildHasher + Clone,
{
    pub(crate) fn new(shards: usize, estimated_size: Option<usize>, build_hasher: S) -> Self {
        let shards = shards.max(1).next_power_of_two();

        let per_shard = match estimated_size {
            Some(estimated_size) if estimated_size > shards => (estimated_size / shards) * 2,
            _ => 0,
        };

        let shards = (0..shards)
            .map(|_| {
                Mutex::new(HashMap::with_capacity_and_hasher(
                    per_shard,
                    build_hasher.clone(),
                ))
            })
            .collect();

        EntryMap {
            build_hasher,
            shards,
        }
    }
}

impl<K, V, E, S> EntryMap<K, V, E, S> {
    pub(crate) fn len(&self) -> usize {
        self.shards.iter().map(|s| s.lock().len()).sum()
    }
}

impl<K, V, E, S> EntryMap<K, V, E, S>
where
    K: Eq + Hash,
    V: Clone,
    S: BuildHasher,
{
    /// Note: Holding this guard blocks *ALL* operations on keys that share the shard
    ///
    /// Never hold it past an await point
    pub(crate) fn lock(&self, key: &K) -> Shard<'_, K, V, E, S> {
        let idx = hash_key(&self.build_hasher, key) as usize & (self.shards.len() - 1);

        self.shards[idx].lock()
    }

    pub(crate) fn get_ready(&self, key: &K) -> Option<V> {
        match self.lock(key).get(key) {
            Some(Entry::Ready(value)) => Some(value.clone()),
            _ => None,
        }
    }

    pub(crate) fn is_in_progress(&self, key: &K) -> bool {
        matches!(self.lock(key).get(key), Some(Entry::InProgress(_)))
    }

    /// Promote the in progress entry for `key` to ready.
    pub(crate) fn promote(&self, key: &K, value: V) {
        let mut shard = self.lock(key);

        match shard.get_mut(key) {
            Some(entry) => {
                debug_assert!(
                    matches!(entry, Entry::InProgress(_)),
                    "only the load task may finish an entry, and it finishes it once"
                );

                *entry = Entry::Ready(value);
            }
            None => unreachable!("in progress entries are only removed by their own load task, this is a bug"),
        }
    }

    /// Drop the in progress entry for `key`, the next access will load it again.
    pub(crate) fn clear(&self, key: &K) {
        let mut shard = self.lock(key);

        if let Some(Entry::InProgress(_)) = shard.get(key) {
            shard.remove(key);
        }
    }
}

pub(crate) fn hash_key<K, S>(build_hasher: &S, key: &K) -> u64
where
    K: Hash,
    S: BuildHasher,
{
    let mut hasher = build_hasher.build_hasher();
    key.hash(&mut hasher);
    hasher.finish()
}

pub(crate) fn max_parallelism() -> usize {
    use std::sync::atomic::{AtomicUsize, Ordering};
    static AVAILABLE_PARALLELISM: AtomicUsize = AtomicUsize::new(0);
    let mut ap = AVAILABLE_PARALLELISM.load(Ordering::Relaxed);
    if ap == 0 {
        ap = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        AVAILABLE_PARALLELISM.store(ap, Ordering::Relaxed);
    }
    ap
}
