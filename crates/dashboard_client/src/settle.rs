/// Runs `on_drop` when dropped, unless `disarm` was called first.
///
/// Held across a provider await so that state bookkeeping for the request is
/// settled even when the awaiting future is dropped mid-flight.
pub(crate) struct SettleOnDrop<F: FnOnce()> {
    on_drop: Option<F>,
}

impl<F: FnOnce()> SettleOnDrop<F> {
    pub(crate) fn new(on_drop: F) -> Self {
        Self {
            on_drop: Some(on_drop),
        }
    }

    pub(crate) fn disarm(mut self) {
        self.on_drop = None;
    }
}

impl<F: FnOnce()> Drop for SettleOnDrop<F> {
    fn drop(&mut self) {
        if let Some(on_drop) = self.on_drop.take() {
            on_drop();
        }
    }
}
