//! Event handling and user feedback

use crate::logging::log_event_with_tracing;
use autorecipe_events::{AppEvent, EventReceiver, GeneralEvent};

/// Renders warnings on stderr and, in debug mode, forwards every event to
/// tracing
pub struct EventHandler {
    debug_enabled: bool,
}

impl EventHandler {
    pub fn new(debug_enabled: bool) -> Self {
        Self { debug_enabled }
    }

    /// Handle every event currently queued
    pub fn drain(&mut self, receiver: &mut EventReceiver) {
        while let Ok(event) = receiver.try_recv() {
            self.handle_event(&event);
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, event: &AppEvent) {
        if let AppEvent::General(GeneralEvent::Warning { message }) = event {
            eprintln!("⚠ {message}");
        } else if self.debug_enabled {
            log_event_with_tracing(event);
        }
    }
}
