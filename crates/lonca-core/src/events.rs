//! Observability sink injected into the extractor and upserter.
//!
//! The pipeline never configures logging itself; it reports decision points
//! to an [`EventSink`]. The binary installs a `tracing` subscriber and hands
//! the pipeline a [`TracingSink`].

use std::sync::Mutex;

pub trait EventSink: Send + Sync {
    fn info(&self, message: &str);
    fn debug(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards events to `tracing`, tagged with the emitting component.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    component: &'static str,
}

impl TracingSink {
    #[must_use]
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }
}

impl EventSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(component = self.component, "{message}");
    }

    fn debug(&self, message: &str) {
        tracing::debug!(component = self.component, "{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!(component = self.component, "{message}");
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Debug,
    Error,
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(EventLevel, String)>>,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<(EventLevel, String)> {
        self.lock().clone()
    }

    /// Messages recorded at `level`.
    #[must_use]
    pub fn messages(&self, level: EventLevel) -> Vec<String> {
        self.lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Returns `true` if any event at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: EventLevel, needle: &str) -> bool {
        self.lock()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }

    fn push(&self, level: EventLevel, message: &str) {
        self.lock().push((level, message.to_string()));
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(EventLevel, String)>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl EventSink for RecordingSink {
    fn info(&self, message: &str) {
        self.push(EventLevel::Info, message);
    }

    fn debug(&self, message: &str) {
        self.push(EventLevel::Debug, message);
    }

    fn error(&self, message: &str) {
        self.push(EventLevel::Error, message);
    }
}
