//! Anytime execution: run a strategy under a hard wall-clock budget and
//! collect its most recent proposal.
//!
//! One controller and one worker run concurrently. The worker owns the
//! strategy and a read-only `GameState`; the [`ProposalSlot`] is the only
//! shared mutable resource. The controller sleeps exactly the budget, then
//! takes the slot lock, raises the cancel token while still holding it, and
//! reads the slot. Taking the lock first means the controller blocks until
//! the worker is not mid-publish, so the read always observes either a
//! fully-published move or the untouched "no move" sentinel.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use log::{debug, warn};

use crate::board::Move;
use crate::state::GameState;
use crate::strategy::{SearchEnd, SearchStrategy};

/// One-shot cancellation signal from the controller to the worker.
///
/// Strategies poll it at their loop boundaries; it is never reset and there
/// is no caller-initiated cancellation, only the deadline.
#[derive(Default)]
pub struct CancelToken {
    flag: AtomicBool,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

struct SlotState {
    best: Option<Move>,
    version: u64,
}

/// The lock-guarded cell holding the most recent proposal.
///
/// `None` is the "never written" sentinel, distinct from any real move.
/// The version counts publishes, so a reader can tell a fresh slot from one
/// that was written and happens to hold the same move.
pub struct ProposalSlot {
    inner: Mutex<SlotState>,
}

impl Default for ProposalSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl ProposalSlot {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SlotState {
                best: None,
                version: 0,
            }),
        }
    }

    // A publish is a single Copy store, so a poisoning panic elsewhere in
    // the worker cannot leave a torn value behind; recover the state.
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Publish `mv`, superseding any previous proposal.
    pub fn propose(&self, mv: Move) {
        let mut state = self.lock();
        state.best = Some(mv);
        state.version += 1;
    }

    /// The current proposal, or `None` if nothing was ever published.
    pub fn best(&self) -> Option<Move> {
        self.lock().best
    }

    /// Number of publishes so far.
    pub fn version(&self) -> u64 {
        self.lock().version
    }
}

/// Runs a strategy on a worker thread and cancels it at the deadline.
pub struct AnytimeExecutor {
    budget: Duration,
}

impl AnytimeExecutor {
    pub fn new(budget: Duration) -> Self {
        Self { budget }
    }

    /// Run `strategy` on `state` for the budget and return the last proposal.
    ///
    /// Returns `None` when the strategy never proposed, including when it
    /// panicked or the worker could not be started; failures are logged and
    /// never retried within the turn. After the hand-off read the worker is
    /// joined: the strategies observe the token within one search node, so
    /// the join overruns the budget by a bounded amount.
    pub fn run(&self, strategy: Box<dyn SearchStrategy>, state: GameState) -> Option<Move> {
        let slot = Arc::new(ProposalSlot::new());
        let cancel = Arc::new(CancelToken::new());

        let spawned = {
            let slot = Arc::clone(&slot);
            let cancel = Arc::clone(&cancel);
            let mut strategy = strategy;
            thread::Builder::new()
                .name("search-worker".into())
                .spawn(move || {
                    let name = strategy.name();
                    let run = panic::catch_unwind(AssertUnwindSafe(|| {
                        strategy.run(&state, &slot, &cancel)
                    }));
                    match run {
                        Ok(SearchEnd::Exhausted) => {
                            debug!("{name}: exhausted its search before the deadline")
                        }
                        Ok(SearchEnd::Cancelled) => debug!("{name}: cancelled at the deadline"),
                        Err(_) => warn!("{name}: worker panicked, turn degrades to no move"),
                    }
                })
        };
        let worker = match spawned {
            Ok(handle) => handle,
            Err(err) => {
                warn!("failed to start search worker: {err}");
                return None;
            }
        };

        thread::sleep(self.budget);

        // Lock before cancelling and hold across the read: the atomic
        // hand-off required for a consistent result.
        let best = {
            let state = slot.lock();
            cancel.cancel();
            state.best
        };
        // Panics were already caught inside the worker.
        let _ = worker.join();
        best
    }
}
