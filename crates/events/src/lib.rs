#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for autorecipe
//!
//! Library crates never print. Warnings and progress notes travel as
//! `AppEvent`s over an unbounded channel and the CLI decides how to render
//! them.

pub mod events;
pub use events::{AppEvent, GeneralEvent, RecipeEvent};

use std::path::PathBuf;

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for event sender using the `AppEvent` system
pub type EventSender = UnboundedSender<AppEvent>;

/// Type alias for event receiver using the `AppEvent` system
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<AppEvent>;

/// Create a new event channel with the `AppEvent` system
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting events throughout autorecipe
///
/// Works the same whether you hold a raw `EventSender` or a struct that
/// carries an optional one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: AppEvent) {
        if let Some(sender) = self.event_sender() {
            // A dropped receiver means nobody is listening any more
            let _ = sender.send(event);
        }
    }

    /// Emit a diagnostic shown only in debug output
    fn emit_debug(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::diagnostic(message)));
    }

    /// Emit a user-visible warning
    fn emit_warning(&self, message: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::warning(message)));
    }

    fn emit_operation_started(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationStarted {
            operation: operation.into(),
        }));
    }

    fn emit_operation_completed(&self, operation: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationCompleted {
            operation: operation.into(),
        }));
    }

    fn emit_operation_failed(&self, operation: impl Into<String>, error: impl Into<String>) {
        self.emit(AppEvent::General(GeneralEvent::OperationFailed {
            operation: operation.into(),
            error: error.into(),
        }));
    }

    /// Emit a section generated event
    fn emit_section_generated(&self, section: impl Into<String>) {
        self.emit(AppEvent::Recipe(RecipeEvent::SectionGenerated {
            section: section.into(),
        }));
    }

    /// Emit a recipe written event
    fn emit_recipe_written(&self, path: impl Into<PathBuf>) {
        self.emit(AppEvent::Recipe(RecipeEvent::Written { path: path.into() }));
    }
}

/// A raw sender is an emitter that always has a channel
impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}
