use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(400);

/// Lets through only the last of a burst of inputs.
///
/// Every input calls [`SearchDebouncer::settle`]; the call resolves to the
/// input once the quiet window passes, or to `None` if a newer input arrived
/// in the meantime.
#[derive(Debug)]
pub struct SearchDebouncer {
    delay: Duration,
    latest: AtomicU64,
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_SEARCH_DEBOUNCE)
    }
}

impl SearchDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            latest: AtomicU64::new(0),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn settle<T>(&self, input: T) -> Option<T> {
        let ticket = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        (self.latest.load(Ordering::SeqCst) == ticket).then_some(input)
    }
}
