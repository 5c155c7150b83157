//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields, at the
//! level each event declares.

use autorecipe_events::{AppEvent, GeneralEvent, RecipeEvent};
use tracing::Level;

macro_rules! log_at {
    ($level:expr, $($arg:tt)+) => {
        match $level {
            Level::ERROR => tracing::error!($($arg)+),
            Level::WARN => tracing::warn!($($arg)+),
            Level::INFO => tracing::info!($($arg)+),
            Level::DEBUG => tracing::debug!($($arg)+),
            _ => tracing::trace!($($arg)+),
        }
    };
}

/// Log an `AppEvent` using the tracing infrastructure with structured fields
pub fn log_event_with_tracing(event: &AppEvent) {
    let level = event.log_level();
    let domain = event.log_target();

    match event {
        AppEvent::General(general) => match general {
            GeneralEvent::Warning { message } | GeneralEvent::Diagnostic { message } => {
                log_at!(level, domain, "{message}");
            }
            GeneralEvent::OperationStarted { operation } => {
                log_at!(level, domain, operation = %operation, "operation started");
            }
            GeneralEvent::OperationCompleted { operation } => {
                log_at!(level, domain, operation = %operation, "operation completed");
            }
            GeneralEvent::OperationFailed { operation, error } => {
                log_at!(level, domain, operation = %operation, error = %error, "operation failed");
            }
        },
        AppEvent::Recipe(recipe) => match recipe {
            RecipeEvent::MetadataLoaded { path, name } => {
                log_at!(level, domain, path = %path.display(), name = %name, "metadata loaded");
            }
            RecipeEvent::VersionResolved { strategy, version } => {
                log_at!(level, domain, strategy = %strategy, version = %version, "dynamic version resolved");
            }
            RecipeEvent::VersionPlaceholder { placeholder } => {
                log_at!(level, domain, placeholder = %placeholder, "version placeholder used");
            }
            RecipeEvent::SectionGenerated { section } => {
                log_at!(level, domain, section = %section, "section generated");
            }
            RecipeEvent::BackupCreated { original, backup } => {
                log_at!(
                    level,
                    domain,
                    original = %original.display(),
                    backup = %backup.display(),
                    "existing recipe backed up"
                );
            }
            RecipeEvent::Written { path } => {
                log_at!(level, domain, path = %path.display(), "recipe written");
            }
        },
    }
}
