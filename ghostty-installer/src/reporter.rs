//! The single place user-facing progress goes through
//!
//! Pipelines never print. They hand structured [`Event`][]s to a [`Reporter`][],
//! which the binary backs with `tracing` and tests back with a recorder.

use console::style;
use tracing::{error, info, warn};

/// How important an event is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventLevel {
    /// Progress
    Info,
    /// Something finished
    Success,
    /// Something the user should know about but that doesn't stop us
    Warning,
    /// Something failed (possibly non-fatally)
    Error,
}

/// Something that happened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// How important it is
    pub level: EventLevel,
    /// What to tell the user
    pub message: String,
}

impl Event {
    /// Make an event
    pub fn new(level: EventLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

/// Receives every [`Event`][] a pipeline emits
pub trait Reporter {
    /// Handle one event
    fn report(&self, event: Event);
}

impl dyn Reporter + '_ {
    /// Report progress
    pub fn info(&self, message: impl std::fmt::Display) {
        self.report(Event::new(EventLevel::Info, message.to_string()));
    }

    /// Report that something finished
    pub fn success(&self, message: impl std::fmt::Display) {
        self.report(Event::new(EventLevel::Success, message.to_string()));
    }

    /// Report something the user should know about
    pub fn warning(&self, message: impl std::fmt::Display) {
        self.report(Event::new(EventLevel::Warning, message.to_string()));
    }

    /// Report a failure
    pub fn error(&self, message: impl std::fmt::Display) {
        self.report(Event::new(EventLevel::Error, message.to_string()));
    }
}

/// The real reporter: forwards everything to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, event: Event) {
        let Event { level, message } = event;
        match level {
            EventLevel::Info => info!("{message}"),
            EventLevel::Success => info!("{}", style(message).green().for_stderr()),
            EventLevel::Warning => warn!("{message}"),
            EventLevel::Error => error!("{message}"),
        }
    }
}
