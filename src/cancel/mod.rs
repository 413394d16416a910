//! Cancellation of run monitoring
//!
//! A [`CancelToken`] is shared between the monitor and whoever may want to
//! stop it. The monitor's wait between polls is a [`CancelToken::wait`], so a
//! cancel takes effect immediately instead of after the poll interval.
//!
//! Cancelling only stops local monitoring. The remote run keeps going.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use tracing::warn;

/// Result of a cancellable wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration passed
    Elapsed,
    /// Cancellation was requested before or during the wait
    Cancelled,
}

/// Cloneable cancellation flag with a wakeable wait.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation and wake every waiter. Idempotent.
    pub fn cancel(&self) {
        let (flag, condvar) = &*self.inner;
        *flag.lock().unwrap_or_else(PoisonError::into_inner) = true;
        condvar.notify_all();
    }

    pub fn is_cancelled(&self) -> bool {
        *self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `duration` unless cancelled first.
    pub fn wait(&self, duration: Duration) -> WaitOutcome {
        let (flag, condvar) = &*self.inner;
        let guard = flag.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = condvar
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        if *guard {
            WaitOutcome::Cancelled
        } else {
            WaitOutcome::Elapsed
        }
    }
}

/// Cancel `token` on SIGINT/SIGTERM.
///
/// Must be called at most once per process.
pub fn install_interrupt_handler(token: CancelToken) -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        if !token.is_cancelled() {
            warn!("Received interrupt signal, stopping run monitoring");
        }
        token.cancel();
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Instant;

    #[test]
    fn test_wait_elapses() {
        let token = CancelToken::new();
        assert_eq!(token.wait(Duration::from_millis(10)), WaitOutcome::Elapsed);
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_cancel_before_wait() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.wait(Duration::from_secs(60)), WaitOutcome::Cancelled);
    }

    #[test]
    fn test_cancel_wakes_waiter() {
        let token = CancelToken::new();
        let remote = token.clone();
        let start = Instant::now();

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });

        assert_eq!(token.wait(Duration::from_secs(30)), WaitOutcome::Cancelled);
        assert!(start.elapsed() < Duration::from_secs(10));
        canceller.join().unwrap();
    }
}
