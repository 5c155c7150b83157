#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Platform abstraction for external tool invocation.
//!
//! Everything autorecipe asks of the host system (running a build backend's
//! version command, asking git for the nearest tag) goes through
//! [`ProcessOperations`], with a blocking system implementation and a
//! scripted one for tests.

pub mod core;
pub mod process;

pub use crate::core::PlatformContext;
pub use process::{
    CommandOutput, PlatformCommand, ProcessOperations, ScriptedProcess, SystemProcess,
};
