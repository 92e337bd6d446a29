use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Attempt number of one slice operation. Zero means "never dispatched".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    #[cfg(test)]
    pub(crate) const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

/// Shared by every tracker: tokens increase across all slice handles, including
/// handles created later over an existing slice state.
static NEXT_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Hands out increasing tokens for one operation and remembers which key the
/// latest attempt of this handle is still waiting on.
pub(crate) struct RequestTracker<K> {
    in_flight: Mutex<Option<(RequestToken, K)>>,
}

impl<K: PartialEq> RequestTracker<K> {
    pub(crate) fn new() -> Self {
        Self {
            in_flight: Mutex::new(None),
        }
    }

    pub(crate) fn begin(&self, key: K) -> RequestToken {
        let token = RequestToken(NEXT_TOKEN.fetch_add(1, Ordering::SeqCst));
        let mut in_flight = self.in_flight.lock();
        // A slower thread must not overwrite a newer attempt.
        if in_flight.as_ref().map_or(true, |(latest, _)| *latest < token) {
            *in_flight = Some((token, key));
        }
        token
    }

    /// Returns true when `token` was still the latest attempt.
    pub(crate) fn finish(&self, token: RequestToken) -> bool {
        let mut in_flight = self.in_flight.lock();
        match in_flight.as_ref() {
            Some((latest, _)) if *latest == token => {
                *in_flight = None;
                true
            }
            _ => false,
        }
    }

    pub(crate) fn is_in_flight(&self, key: &K) -> bool {
        matches!(self.in_flight.lock().as_ref(), Some((_, pending)) if pending == key)
    }
}
