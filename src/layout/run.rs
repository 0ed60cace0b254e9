//! Run tokens for stale-result suppression.
//!
//! The layered-adapter path completes via a deferred result. Each
//! invocation is tagged with a monotonically increasing run id; when a
//! newer run has been started, an older run's result is discarded on
//! arrival. This is the only cancellation semantic — there is no
//! interruption of in-flight computation, and repeated invocations with
//! unchanged inputs are not deduplicated.

/// Token identifying one layout run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RunToken(pub u64);

/// Issues run tokens and answers whether a token is still the newest.
#[derive(Debug, Default)]
pub struct RunTracker {
    next: u64,
}

impl RunTracker {
    /// Create a tracker with no runs issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run, invalidating all earlier tokens.
    pub fn begin(&mut self) -> RunToken {
        self.next += 1;
        RunToken(self.next)
    }

    /// True when `token` is the most recently issued run.
    pub fn is_current(&self, token: RunToken) -> bool {
        token.0 == self.next
    }
}
