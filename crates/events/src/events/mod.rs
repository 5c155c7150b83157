use serde::{Deserialize, Serialize};

pub mod general;
pub mod recipe;

pub use general::*;
pub use recipe::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General utility events (warnings, errors, operations)
    General(GeneralEvent),

    /// Recipe drafting events
    Recipe(RecipeEvent),
}

impl AppEvent {
    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::General(GeneralEvent::OperationFailed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Recipe(RecipeEvent::VersionPlaceholder { .. }) => Level::WARN,

            Self::General(GeneralEvent::Diagnostic { .. })
            | Self::Recipe(RecipeEvent::SectionGenerated { .. }) => Level::DEBUG,

            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::General(_) => "autorecipe::events::general",
            Self::Recipe(_) => "autorecipe::events::recipe",
        }
    }
}
