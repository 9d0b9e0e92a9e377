//! Binary coalescing wake signal for the worker thread
//!
//! A single flag, not a counting semaphore: any number of wake requests
//! between worker cycles collapse into one pass. That is safe because the
//! worker drains the entire delta queue every time it runs, so a coalesced
//! wake can never cause a delta to be skipped.

use std::sync::{Condvar, Mutex};

/// Flag-and-condvar wake signal
#[derive(Debug, Default)]
pub struct WakeSignal {
    raised: Mutex<bool>,
    condvar: Condvar,
}

impl WakeSignal {
    /// Create a lowered signal
    pub fn new() -> Self {
        Self {
            raised: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    /// Raise the signal, waking the worker if it is blocked
    pub fn raise(&self) {
        let mut raised = self.raised.lock().expect("wake signal poisoned");
        *raised = true;
        self.condvar.notify_one();
    }

    /// Block until the signal is raised, then lower it
    pub fn wait(&self) {
        let mut raised = self.raised.lock().expect("wake signal poisoned");
        while !*raised {
            raised = self.condvar.wait(raised).expect("wake signal poisoned");
        }
        *raised = false;
    }

    /// Whether the signal is currently raised
    pub fn is_raised(&self) -> bool {
        *self.raised.lock().expect("wake signal poisoned")
    }
}
