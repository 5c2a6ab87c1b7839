//! Request sequencing for racing search and suggestion calls.
//!
//! Keystroke-triggered suggestion fetches (and rapid-fire search
//! submissions) can resolve out of order. Each issued call carries a
//! monotonically increasing token; only the response whose token is still
//! the latest gets applied. Superseded calls are allowed to run to
//! completion - their results are discarded on arrival, never displayed.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Opaque token identifying one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeqToken(u64);

/// Monotonic token issuer with a "latest wins" acceptance rule.
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: AtomicU64,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next token. Every issue supersedes all earlier tokens.
    pub fn issue(&self) -> SeqToken {
        SeqToken(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether `token` is still the most recently issued request.
    pub fn is_current(&self, token: SeqToken) -> bool {
        self.latest.load(Ordering::SeqCst) == token.0
    }

    /// Keep `value` only if `token` is still current. A late response for
    /// a superseded request yields None and must not overwrite newer state.
    pub fn accept<T>(&self, token: SeqToken, value: T) -> Option<T> {
        self.is_current(token).then_some(value)
    }
}

/// Debounced, sequence-guarded dispatcher.
///
/// Each call to [`Debouncer::run`] issues a token, waits out the fixed
/// delay, and only then starts the work - and only if no newer call was
/// issued during the delay. The result is dropped if a newer call was
/// issued while the work was in flight.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    sequence: RequestSequence,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            sequence: RequestSequence::new(),
        }
    }

    pub fn sequence(&self) -> &RequestSequence {
        &self.sequence
    }

    /// Issue a token and wait out the debounce delay. Returns the token if
    /// it survived the delay, None if a newer call superseded it.
    pub async fn ready(&self) -> Option<SeqToken> {
        let token = self.sequence.issue();
        tokio::time::sleep(self.delay).await;
        self.sequence.is_current(token).then_some(token)
    }

    /// Debounce, run `work`, and keep the output only if this call is still
    /// the latest when the work resolves.
    pub async fn run<F, Fut, T>(&self, work: F) -> Option<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let token = self.ready().await?;
        let value = work().await;
        self.sequence.accept(token, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::time::sleep;

    #[test]
    fn test_tokens_are_monotonic() {
        let seq = RequestSequence::new();
        let first = seq.issue();
        let second = seq.issue();
        assert!(second > first);
    }

    #[test]
    fn test_late_response_is_discarded() {
        let seq = RequestSequence::new();
        let first = seq.issue();
        let second = seq.issue();

        // The older response arrives after the newer one was issued.
        assert_eq!(seq.accept(first, "stale"), None);
        assert_eq!(seq.accept(second, "fresh"), Some("fresh"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystroke_during_delay_supersedes() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(200)));

        let first = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.run(|| async { "first" }).await })
        };

        // Second keystroke 50ms later, while the first is still debouncing.
        sleep(Duration::from_millis(50)).await;
        let second = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.run(|| async { "second" }).await })
        };

        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_response_loses_to_newer_request() {
        let debouncer = Arc::new(Debouncer::new(Duration::from_millis(200)));

        // First call passes the debounce and starts slow work.
        let first = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move {
                debouncer
                    .run(|| async {
                        sleep(Duration::from_millis(500)).await;
                        "slow"
                    })
                    .await
            })
        };

        // Second call issued while the first's work is in flight; it
        // resolves before the first does.
        sleep(Duration::from_millis(300)).await;
        let second = {
            let debouncer = debouncer.clone();
            tokio::spawn(async move { debouncer.run(|| async { "fast" }).await })
        };

        // The slow response arrives last but must not win.
        assert_eq!(first.await.unwrap(), None);
        assert_eq!(second.await.unwrap(), Some("fast"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_call_is_applied() {
        let debouncer = Debouncer::new(Duration::from_millis(200));
        assert_eq!(debouncer.run(|| async { 7 }).await, Some(7));
    }
}
