//! Built-in defaults for paths and tools
//!
//! Each of these can be replaced from the config file, the environment, or
//! the command line.

pub const APP_DIR: &str = "autorecipe";
pub const CONFIG_FILE: &str = "config.toml";

pub const DEFAULT_INPUT: &str = "pyproject.toml";

pub const ENV_PYTHON: &str = "AUTORECIPE_PYTHON";
pub const ENV_OVERWRITE: &str = "AUTORECIPE_OVERWRITE";
pub const ENV_INPUT: &str = "AUTORECIPE_INPUT";
pub const ENV_OUTPUT: &str = "AUTORECIPE_OUTPUT";
