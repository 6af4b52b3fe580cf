//! Command feature handlers.
//!
//! Each module owns one command feature.

pub mod analyze_command;
pub mod clean_command;
pub mod config_command;
pub mod disks_command;
pub mod scan_command;
