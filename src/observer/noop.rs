use super::Observer;

#[derive(Clone, Copy, Debug, Default)]
/// An observer that does nothing
pub struct NoopObserver;

impl Observer for NoopObserver {
    #[inline]
    fn notify(&self) {}
}
