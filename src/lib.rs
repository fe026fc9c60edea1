//! A concurrent, single-flight loading cache designed for async rust.
//!
//! # Quick Start
//! Give a [`KeyedLoadCache`] a [`Loader`] (any `Fn(K) -> impl Future<Output = Result<V, E>>` works)
//! and call [`KeyedLoadCache::get`]. Concurrent callers for the same key share one load,
//! successful results are kept forever and failures are never cached.
//!
//! ```no_run
//! # async fn run() -> Result<(), String> {
//! use light_load_cache::KeyedLoadCache;
//!
//! let cache = KeyedLoadCache::new(|user_id: u64| async move {
//!     Ok::<_, String>(format!("user-{user_id}"))
//! });
//!
//! assert_eq!(cache.get(7).await?, "user-7");
//! assert_eq!(cache.retrieve_if_available(&7), Some("user-7".to_string()));
//! # Ok(())
//! # }
//! ```

pub mod cache;
#[doc(inline)]
pub use cache::KeyedLoadCache;
pub use cache::{CacheBuilder, GetFuture};

/// The partitioned entry map behind a [`KeyedLoadCache`].
pub(crate) mod map;

/// A loader maps a key to a value asynchronously, it is what a [`KeyedLoadCache`] calls on a miss.
pub mod loader;
#[doc(inline)]
pub use loader::Loader;

/// Observers are notified whenever a load completes successfully.
pub mod observer;
#[doc(inline)]
pub use observer::{ChangeFeed, NoopObserver, Observer};

#[doc(hidden)]
pub mod constants_for_benchmarking;
