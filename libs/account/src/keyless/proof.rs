//! Single-assignment proof slot
//!
//! A slot starts either resolved or unresolved. An unresolved slot runs its
//! fetch on a background thread and moves to resolved or failed exactly once.
//! The completion callback runs after the state is stored and before
//! waiters are released.

use crate::crypto::keyless::ZeroKnowledgeSig;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

/// Produces a proof, or a printable error
pub type ProofFetch = Box<dyn FnOnce() -> Result<ZeroKnowledgeSig, String> + Send>;

/// Invoked once when a pending proof settles
pub type ProofFetchCallback = Box<dyn FnOnce(ProofFetchStatus) + Send>;

/// Outcome passed to a [`ProofFetchCallback`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofFetchStatus {
    /// The proof is available
    Success,
    /// The fetch failed with this message
    Failed(String),
}

/// Where an account's proof comes from
pub enum ProofSource {
    /// Already computed
    Resolved(ZeroKnowledgeSig),
    /// Computed in the background; `on_complete` is required so that
    /// failures are always observed
    Pending {
        /// Work producing the proof
        fetch: ProofFetch,
        /// Called once with the outcome
        on_complete: ProofFetchCallback,
    },
}

impl ProofSource {
    /// Pending source from closures
    pub fn pending<F, C>(fetch: F, on_complete: C) -> Self
    where
        F: FnOnce() -> Result<ZeroKnowledgeSig, String> + Send + 'static,
        C: FnOnce(ProofFetchStatus) + Send + 'static,
    {
        Self::Pending {
            fetch: Box::new(fetch),
            on_complete: Box::new(on_complete),
        }
    }
}

impl From<ZeroKnowledgeSig> for ProofSource {
    fn from(proof: ZeroKnowledgeSig) -> Self {
        Self::Resolved(proof)
    }
}

impl fmt::Debug for ProofSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved(proof) => f.debug_tuple("Resolved").field(proof).finish(),
            Self::Pending { .. } => f.write_str("Pending"),
        }
    }
}

/// Current proof state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofState {
    /// Fetch still running
    Unresolved,
    /// Proof available
    Resolved(ZeroKnowledgeSig),
    /// Fetch failed; the proof will never become available
    Failed(String),
}

#[derive(Debug)]
struct Shared {
    state: ProofState,
    settled: bool,
}

/// Cloneable handle to a proof that may still be in flight
#[derive(Clone)]
pub struct ProofSlot {
    inner: Arc<(Mutex<Shared>, Condvar)>,
}

impl ProofSlot {
    /// Create the slot, spawning the fetch if the source is pending.
    ///
    /// A panicking fetch is recorded as [`ProofFetchStatus::Failed`] and a
    /// panicking callback is logged only when panics unwind. Under
    /// `panic = "abort"`, as in this workspace's release profile, either
    /// panic aborts the process.
    pub fn start(source: ProofSource) -> Self {
        match source {
            ProofSource::Resolved(proof) => Self::with_state(ProofState::Resolved(proof), true),
            ProofSource::Pending { fetch, on_complete } => {
                let slot = Self::with_state(ProofState::Unresolved, false);
                let worker = slot.clone();
                std::thread::spawn(move || worker.run(fetch, on_complete));
                slot
            }
        }
    }

    fn with_state(state: ProofState, settled: bool) -> Self {
        Self {
            inner: Arc::new((Mutex::new(Shared { state, settled }), Condvar::new())),
        }
    }

    // Only the worker writes, so a poisoned lock still holds a consistent state
    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn run(&self, fetch: ProofFetch, on_complete: ProofFetchCallback) {
        let outcome = catch_unwind(AssertUnwindSafe(fetch))
            .unwrap_or_else(|_| Err("proof fetch panicked".to_string()));

        let status = match outcome {
            Ok(proof) => {
                log::debug!("Keyless proof resolved");
                self.lock().state = ProofState::Resolved(proof);
                ProofFetchStatus::Success
            }
            Err(message) => {
                log::warn!("Keyless proof fetch failed: {message}");
                self.lock().state = ProofState::Failed(message.clone());
                ProofFetchStatus::Failed(message)
            }
        };

        if catch_unwind(AssertUnwindSafe(|| on_complete(status))).is_err() {
            log::warn!("Keyless proof callback panicked");
        }

        self.lock().settled = true;
        self.inner.1.notify_all();
    }

    /// Snapshot of the state
    pub fn state(&self) -> ProofState {
        self.lock().state.clone()
    }

    /// The proof, if resolved
    pub fn proof(&self) -> Option<ZeroKnowledgeSig> {
        match &self.lock().state {
            ProofState::Resolved(proof) => Some(proof.clone()),
            ProofState::Unresolved | ProofState::Failed(_) => None,
        }
    }

    /// Whether the fetch and its callback have both finished
    pub fn is_settled(&self) -> bool {
        self.lock().settled
    }

    /// Block until settled and return the terminal state
    pub fn wait(&self) -> ProofState {
        let (lock, condvar) = &*self.inner;
        let guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let guard = condvar
            .wait_while(guard, |shared| !shared.settled)
            .unwrap_or_else(PoisonError::into_inner);
        guard.state.clone()
    }
}

impl fmt::Debug for ProofSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProofSlot")
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_proof;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::mpsc;

    #[test]
    fn test_resolved_source_is_settled_immediately() {
        let slot = ProofSlot::start(ProofSource::Resolved(test_proof()));
        assert!(slot.is_settled());
        assert_eq!(slot.proof(), Some(test_proof()));
        assert_eq!(slot.wait(), ProofState::Resolved(test_proof()));
    }

    #[test]
    fn test_pending_source_does_not_block_start() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let slot = ProofSlot::start(ProofSource::pending(
            move || {
                release_rx.recv().map_err(|e| e.to_string())?;
                Ok(test_proof())
            },
            |_| {},
        ));
        assert_eq!(slot.state(), ProofState::Unresolved);
        assert_eq!(slot.proof(), None);

        release_tx.send(()).unwrap();
        assert_eq!(slot.wait(), ProofState::Resolved(test_proof()));
        assert!(slot.is_settled());
    }

    #[test]
    fn test_callback_fires_once_before_wait_returns() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(None));
        let (calls_cb, seen_cb) = (Arc::clone(&calls), Arc::clone(&seen));

        let slot = ProofSlot::start(ProofSource::pending(
            || Err("prover unavailable".to_string()),
            move |status| {
                calls_cb.fetch_add(1, Ordering::SeqCst);
                *seen_cb.lock().unwrap() = Some(status);
            },
        ));

        assert_eq!(slot.wait(), ProofState::Failed("prover unavailable".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            *seen.lock().unwrap(),
            Some(ProofFetchStatus::Failed("prover unavailable".to_string()))
        );

        // waiting again is a no-op
        assert_eq!(slot.wait(), ProofState::Failed("prover unavailable".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    #[cfg(panic = "unwind")]
    fn test_panicking_fetch_becomes_failure() {
        let slot = ProofSlot::start(ProofSource::pending(|| panic!("boom"), |_| {}));
        assert!(matches!(slot.wait(), ProofState::Failed(_)));
        assert_eq!(slot.proof(), None);
    }

    #[test]
    #[cfg(panic = "unwind")]
    fn test_panicking_callback_still_resolves_slot() {
        let slot = ProofSlot::start(ProofSource::pending(
            || Ok(test_proof()),
            |_| panic!("callback"),
        ));
        assert_eq!(slot.wait(), ProofState::Resolved(test_proof()));
    }
}
