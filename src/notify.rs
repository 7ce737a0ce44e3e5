//! Toast channel: fire-and-forget user-facing messages with a severity.
//!
//! The controller never learns whether anyone saw a message; it just
//! emits. `TracingNotifier` is the default sink, `MemoryNotifier` records
//! everything for assertions.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Error,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, severity: Severity, message: &str);
}

impl<T: Notifier> Notifier for Arc<T> {
    fn notify(&self, severity: Severity, message: &str) {
        (**self).notify(severity, message);
    }
}

/// Routes notifications into the tracing pipeline.
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Info => tracing::info!(target: "mediflow::toast", "{message}"),
            Severity::Success => tracing::info!(target: "mediflow::toast", "{message}"),
            Severity::Error => tracing::error!(target: "mediflow::toast", "{message}"),
        }
    }
}

/// Records every notification. Intended for tests and headless embedders
/// that drain messages themselves.
#[derive(Default)]
pub struct MemoryNotifier {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<(Severity, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn count_of(&self, severity: Severity) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _)| *s == severity)
            .count()
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}

impl Notifier for MemoryNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((severity, message.to_string()));
    }
}
