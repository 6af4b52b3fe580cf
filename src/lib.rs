//! tidyup library crate
//!
//! The scan / analyze / clean engine behind the `tidyup` binary. Every
//! long-running operation runs on its own worker thread and reports through
//! callbacks, so the same API serves the CLI and any other front end.

pub mod analyzer;
pub mod cleaner;
pub mod cli;
pub mod config;
pub mod disk_usage;
pub mod error;
pub mod filter;
pub mod logging;
pub mod output;
pub mod paths;
pub mod progress;
pub mod scanner;
pub mod size;
pub mod theme;
pub mod throttle;
pub mod trash_ops;
pub mod walker;
pub mod worker;
