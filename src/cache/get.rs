use std::future::Future;
use std::pin::Pin;
use std::task::ready;
use std::task::Context;
use std::task::Poll;

use crate::map::Handle;

/// The future returned by [`super::KeyedLoadCache::get`].
///
/// The load itself runs on its own task, dropping this future only stops waiting for it.
///
/// # Panics
/// Polling panics if the loader this future is waiting on panicked, or its runtime shut down first.
#[must_use = "futures do nothing unless you `.await` or poll them"]
#[pin_project::pin_project(project = GetFutureProj)]
pub enum GetFuture<V, E> {
    Ready(Option<V>),
    Waiting(#[pin] Handle<V, E>),
}

impl<V, E> Future for GetFuture<V, E>
where
    V: Clone,
    E: Clone,
{
    type Output = Result<V, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            GetFutureProj::Ready(value) => {
                Poll::Ready(Ok(value.take().expect("GetFuture polled after completion")))
            }
            GetFutureProj::Waiting(handle) => match ready!(handle.poll(cx)) {
                Ok(outcome) => Poll::Ready(outcome),
                Err(_canceled) => panic!("the load this caller was waiting on panicked or its runtime shut down"),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::GetFuture;
    use futures::channel::oneshot;
    use futures::FutureExt;

    #[tokio::test]
    async fn test_ready_resolves_immediately() {
        let fut: GetFuture<u32, ()> = GetFuture::Ready(Some(3));

        assert_eq!(fut.await, Ok(3));
    }

    #[tokio::test]
    async fn test_waiters_share_one_outcome() {
        let (tx, rx) = oneshot::channel::<Result<u32, &'static str>>();
        let handle = rx.shared();

        let first = GetFuture::Waiting(handle.clone());
        let second = GetFuture::Waiting(handle);

        tx.send(Err("boom")).unwrap();

        let (first, second) = tokio::join!(first, second);

        assert_eq!(first, Err("boom"));
        assert_eq!(second, Err("boom"));
    }

    #[tokio::test]
    #[should_panic(expected = "panicked")]
    async fn test_lost_load_panics_waiter() {
        let (tx, rx) = oneshot::channel::<Result<u32, ()>>();
        drop(tx);

        let _ = GetFuture::Waiting(rx.shared()).await;
    }
}
