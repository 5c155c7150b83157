#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for autorecipe
//!
//! The recipe document model shared by the drafting engine and the CLI:
//! requirement entries, the context table, and the ordered recipe sections.

pub mod context;
pub mod recipe;
pub mod requirement;

// Re-export commonly used types
pub use context::Context;
pub use recipe::{
    AboutSection, BuildSection, GitReference, LicenseFile, PackageSection, RecipeDocument,
    RequirementsSection, Script, SourceSpec, SynthesizedTests, TestSection,
};
pub use requirement::{dedupe, ConditionalRequirement, Requirement};

/// Interpreter used for backend version queries by default
pub const DEFAULT_PYTHON: &str = "python3";
