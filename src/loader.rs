use std::future::Future;

/// A `Loader` is a type with a method [`Loader::load`] that maps a key to a value asynchronously
///
/// The returned future is driven on its own task, so it must be `Send + 'static`
/// and it will run to completion even if every caller waiting on it goes away.
pub trait Loader<K> {
    type Value;
    type Error;

    fn load(&self, key: K) -> impl Future<Output = Result<Self::Value, Self::Error>> + Send + 'static;
}

impl<K, V, E, F, Fut> Loader<K> for F
where
    F: Fn(K) -> Fut,
    Fut: Future<Output = Result<V, E>> + Send + 'static,
{
    type Value = V;
    type Error = E;

    fn load(&self, key: K) -> impl Future<Output = Result<V, E>> + Send + 'static {
        self(key)
    }
}
