//! Single-slot handoff for full captures
//!
//! Only the most recent unconsumed capture matters: a capture already
//! represents the complete state as of its moment, so an older capture that
//! was never consumed is redundant and is simply replaced.

use std::sync::Mutex;
use workgrid_core::RawCapture;

/// Latest-capture mailbox between the owning and worker threads
#[derive(Debug, Default)]
pub struct CaptureMailbox {
    slot: Mutex<Option<RawCapture>>,
}

impl CaptureMailbox {
    /// Create an empty mailbox
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Deposit a capture, replacing any unconsumed one
    ///
    /// Returns true when an unconsumed capture was discarded.
    pub fn put(&self, capture: RawCapture) -> bool {
        self.slot
            .lock()
            .expect("capture mailbox poisoned")
            .replace(capture)
            .is_some()
    }

    /// Take the pending capture, leaving the slot empty
    pub fn take(&self) -> Option<RawCapture> {
        self.slot.lock().expect("capture mailbox poisoned").take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supersession() {
        let mailbox = CaptureMailbox::new();
        assert!(!mailbox.put(RawCapture::new(true)));
        // B replaces the unconsumed A.
        assert!(mailbox.put(RawCapture::new(false)));

        let taken = mailbox.take().unwrap();
        assert!(!taken.manual_priorities);
        assert!(mailbox.take().is_none());
    }
}
