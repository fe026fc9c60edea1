pub mod feed;
pub mod noop;

pub use feed::ChangeFeed;
pub use noop::NoopObserver;

/// Something that wants to know when a [`crate::KeyedLoadCache`] gained a value.
///
/// [`Observer::notify`] is called once for every load that finishes successfully, after the value
/// is readable through [`crate::KeyedLoadCache::retrieve_if_available`]. It is not called for hits or failed loads.
///
/// It is called from the load task, so it should return quickly.
pub trait Observer: Send + Sync + 'static {
    fn notify(&self);
}

impl<F> Observer for F
where
    F: Fn() + Send + Sync + 'static,
{
    #[inline]
    fn notify(&self) {
        self()
    }
}
