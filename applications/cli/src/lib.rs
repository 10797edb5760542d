//! MusicStream CLI Library
//!
//! Command-line front end over the sync core: configuration, argument
//! parsing and command execution. Exposed as a library for testing.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod media;

pub use app::App;
pub use cli::{Cli, Command};
pub use config::CliConfig;
pub use error::{CliError, Result};
