use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{error, header, success, warning};
use std::process::Command;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        edit_config,
        editor,
    } = cmd
    {
        if *print_config {
            header("Current configuration");
            let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
            println!("{yaml}");
        }

        if *edit_config {
            let path = Config::config_file();
            let default_editor = std::env::var("EDITOR")
                .or_else(|_| std::env::var("VISUAL"))
                .unwrap_or_else(|_| {
                    if cfg!(target_os = "windows") {
                        "notepad".to_string()
                    } else {
                        "nano".to_string()
                    }
                });
            let requested = editor.clone().unwrap_or_else(|| default_editor.clone());

            let edited = |ed: &str| {
                Command::new(ed)
                    .arg(&path)
                    .status()
                    .map(|s| s.success())
                    .unwrap_or(false)
            };

            if edited(&requested) {
                success(format!("Configuration file edited using '{requested}'"));
            } else if requested != default_editor {
                warning(format!(
                    "Editor '{requested}' not available, falling back to '{default_editor}'"
                ));
                if edited(&default_editor) {
                    success(format!("Configuration file edited using '{default_editor}'"));
                } else {
                    error(format!("Failed to edit configuration file with '{default_editor}'"));
                }
            } else {
                error(format!("Failed to edit configuration file with '{requested}'"));
            }
        }
    }

    Ok(())
}
