//! Synchronous confirmation gate consulted before destructive actions.
//!
//! Injected like the store and the notifier so tests (and headless
//! embedders) can script the answer instead of blocking on a dialog.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

pub trait ConfirmationGate: Send + Sync {
    /// Returns whether the user approved the action.
    fn confirm(&self, message: &str) -> bool;
}

impl<T: ConfirmationGate> ConfirmationGate for Arc<T> {
    fn confirm(&self, message: &str) -> bool {
        (**self).confirm(message)
    }
}

/// Approves everything. For embedders that gate destructive actions
/// upstream, before the controller is invoked.
pub struct AutoConfirm;

impl ConfirmationGate for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Scripted gate with a prompt counter.
pub struct StubGate {
    answer: AtomicBool,
    prompts: AtomicUsize,
}

impl StubGate {
    pub fn new(answer: bool) -> Self {
        Self {
            answer: AtomicBool::new(answer),
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn set_answer(&self, answer: bool) {
        self.answer.store(answer, Ordering::SeqCst);
    }

    /// How many times the gate was consulted.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl ConfirmationGate for StubGate {
    fn confirm(&self, _message: &str) -> bool {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.answer.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_confirm_always_approves() {
        assert!(AutoConfirm.confirm("Delete everything?"));
    }

    #[test]
    fn stub_gate_counts_prompts_and_flips() {
        let gate = StubGate::new(false);
        assert!(!gate.confirm("Sure?"));
        gate.set_answer(true);
        assert!(gate.confirm("Sure?"));
        assert_eq!(gate.prompts(), 2);
    }
}
