/// Hands a finished frame to the display.
pub trait Presenter<B: ?Sized> {
    fn present(&mut self, backend: &mut B);
}

/// Presenter for headless runs.
#[derive(Debug, Default)]
pub struct NoopPresenter;

impl<B: ?Sized> Presenter<B> for NoopPresenter {
    fn present(&mut self, _backend: &mut B) {}
}
