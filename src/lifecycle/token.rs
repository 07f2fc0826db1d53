//! Deadline-bearing cancellation token shared by one shutdown sequence.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cooperative cancellation handed to every frame and the finalizer.
///
/// The token fires when its deadline passes or when the owning sequence cancels it
/// explicitly. Nothing is interrupted forcibly; holders are expected to select on
/// [`cancelled`](Self::cancelled) and return.
#[derive(Debug, Clone)]
pub struct ShutdownToken {
    deadline: Instant,
    inner: CancellationToken,
}

impl ShutdownToken {
    /// Token whose deadline is `now + timeout`.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline,
            inner: CancellationToken::new(),
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.is_cancelled() || Instant::now() >= self.deadline
    }

    /// Resolves once the deadline passes or the token is cancelled.
    pub async fn cancelled(&self) {
        tokio::select! {
            _ = tokio::time::sleep_until(self.deadline) => {}
            _ = self.inner.cancelled() => {}
        }
    }

    /// Fire the token ahead of its deadline. Clones observe it too.
    pub fn cancel(&self) {
        self.inner.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn fires_at_deadline() {
        let token = ShutdownToken::with_timeout(Duration::from_secs(5));
        assert!(!token.is_cancelled());
        assert_eq!(token.remaining(), Duration::from_secs(5));

        let start = Instant::now();
        token.cancelled().await;
        assert_eq!(start.elapsed(), Duration::from_secs(5));
        assert!(token.is_cancelled());
        assert_eq!(token.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_cancel_reaches_clones() {
        let token = ShutdownToken::with_timeout(Duration::from_secs(60));
        let clone = token.clone();
        token.cancel();
        clone.cancelled().await;
        assert!(clone.is_cancelled());
        assert_eq!(clone.deadline(), token.deadline());
    }
}
