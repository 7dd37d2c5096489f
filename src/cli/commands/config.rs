//! Config command - show or create the config file

use std::path::Path;

use campusfix::Config;
use campusfix::output::{OperationResult, OutputMode};

use crate::cli::app::ConfigAction;

/// Handle config subcommands
pub fn config(action: ConfigAction, path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => show(path, mode),
        ConfigAction::Init { force } => init(path, force, mode),
    }
}

fn show(path: &Path, mode: OutputMode) -> anyhow::Result<()> {
    let config = Config::load(path)?;
    match mode {
        OutputMode::Human => {
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&config)?);
            if config.storage.data_dir.is_none() {
                println!("# data_dir = {}", config.data_dir().display());
            }
        },
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

fn init(path: &Path, force: bool, mode: OutputMode) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    Config::default().save(path)?;
    OperationResult {
        success: true,
        message: format!("Wrote default config to {}", path.display()),
    }
    .render(mode);
    Ok(())
}
