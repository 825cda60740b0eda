//! Config subcommand implementation.

use crate::config::{AppSettings, Paths};
use crate::error::{CliResult, ConfigError};
use crate::output;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Show the effective settings, or write a default settings file.
#[derive(Parser, Debug)]
pub struct ConfigCommand {
    /// Write the default settings file if none exists
    #[arg(long)]
    pub init: bool,
}

impl ConfigCommand {
    /// Execute the config command. `custom` is the global `--config` path.
    pub fn execute(&self, settings: &AppSettings, custom: Option<&Path>) -> CliResult<()> {
        let path: PathBuf = match custom {
            Some(path) => path.to_path_buf(),
            None => Paths::discover()?.settings_file(),
        };

        if self.init {
            if path.exists() {
                output::print_info(&format!("{} already exists", path.display()));
            } else {
                AppSettings::default().save_to(&path)?;
                output::print_success(&format!("wrote {}", path.display()));
            }
            return Ok(());
        }

        output::print_info(&format!("settings file: {}", path.display()));
        let json = serde_json::to_string_pretty(settings).map_err(ConfigError::from)?;
        println!("{}", json);
        Ok(())
    }
}
