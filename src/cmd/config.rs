use std::io::{self, Write};

use clap::{Args, Subcommand};

use crate::config::{AppConfig, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the stored configuration and the effective values.
    Show,
}

pub fn run(command: ConfigCommand) -> AppResult<()> {
    match command {
        ConfigCommand::Init => run_init(),
        ConfigCommand::Show => run_show(),
    }
}

fn run_init() -> AppResult<()> {
    let mut cfg = StoredConfig::load()?;

    println!("Configuring turnolink.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!();

    apply_prompt("Ticket storage directory", &mut cfg.storage_dir)?;
    apply_prompt("Report export directory", &mut cfg.export_dir)?;
    apply_prompt(
        "Report logo (path, http(s) URL or 'bundled')",
        &mut cfg.logo,
    )?;

    cfg.save()?;

    let path = config_file_path()?;
    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show() -> AppResult<()> {
    let cfg = StoredConfig::load()?;
    let path = config_file_path()?;
    let effective = AppConfig::load(&std::env::current_dir()?)?;

    println!("Configuration file: {}", path.display());
    println!("Storage directory: {}", display_value(&cfg.storage_dir));
    println!("Export directory: {}", display_value(&cfg.export_dir));
    println!("Logo: {}", display_value(&cfg.logo));
    println!();
    println!("Effective storage directory: {}", effective.storage_dir.display());
    println!("Effective export directory: {}", effective.export_dir.display());
    println!("Effective logo: {:?}", effective.logo);

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>) -> AppResult<()> {
    match prompt(field, target.as_deref())? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match current {
        Some(value) => write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?,
        None => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::from_input(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interprets_prompt_input() {
        assert_eq!(PromptAction::from_input("\n"), PromptAction::Keep);
        assert_eq!(PromptAction::from_input(" - \n"), PromptAction::Clear);
        assert_eq!(
            PromptAction::from_input("/srv/reports\n"),
            PromptAction::Set("/srv/reports".to_string())
        );
    }

    #[test]
    fn displays_unset_values() {
        assert_eq!(display_value(&None), "<not set>");
        assert_eq!(display_value(&Some(String::new())), "<not set>");
        assert_eq!(display_value(&Some("bundled".to_string())), "bundled");
    }
}
