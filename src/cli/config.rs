use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::services::config::KEY_DOTFILE_PATH;
use crate::services::fs::{absolutize, contract_home, expand_home};
use crate::services::ConfigStore;

/// Config command arguments
#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print a value
    Get { key: String },
    /// Change a value
    Set { key: String, value: String },
    /// List every supported key and its value
    List,
}

/// Run the config command
pub fn run(args: ConfigArgs) -> Result<()> {
    let mut store = ConfigStore::load_default().context("Failed to load config")?;

    match args.action {
        ConfigAction::Get { key } => match store.get(&key)? {
            Some(value) => println!("{}", value),
            None => println!(),
        },
        ConfigAction::Set { key, value } => {
            let value = normalize_value(&key, &value)?;
            store.set(&key, value)?;
            store.save().context("Failed to save config")?;
            println!("OK");
        }
        ConfigAction::List => {
            for key in ConfigStore::keys() {
                let value = store.get(key)?.unwrap_or_default();
                println!("{} = {}", key, value);
            }
        }
    }
    Ok(())
}

/// Paths are stored absolute, contracted to `~/` under the home directory
fn normalize_value(key: &str, value: &str) -> Result<String> {
    if key != KEY_DOTFILE_PATH {
        return Ok(value.to_string());
    }
    let absolute = absolutize(&expand_home(value))?;
    Ok(contract_home(&absolute))
}
