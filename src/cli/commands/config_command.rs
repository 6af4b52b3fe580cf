//! Config command feature.
//!
//! This module owns and handles the "tidyup config" command behavior.

use crate::config::Config;
use crate::theme::Theme;

pub(crate) fn handle_config(show: bool, reset: bool, path: bool) -> anyhow::Result<()> {
    if reset {
        let saved_to = Config::default().save()?;
        println!(
            "{}",
            Theme::success(&format!("Configuration reset: {}", saved_to.display()))
        );
    }

    if path {
        println!("{}", Config::config_path()?.display());
    }

    // Bare `tidyup config` shows the configuration as well
    if show || (!reset && !path) {
        let config = Config::load();
        println!("{}", Theme::header("Current Configuration"));
        print!("{}", config.to_toml()?);
    }

    Ok(())
}
