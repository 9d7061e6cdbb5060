use anyhow::{bail, Context, Result};
use clap::Args;

use super::Globals;
use crate::services::config::KEY_DOTFILE_PATH;
use crate::services::fs::{absolutize, contract_home, expand_home};
use crate::services::{ConfigStore, GitService};
use crate::utils::HOME_MIRROR_DIR;

/// Init command arguments
#[derive(Debug, Args)]
#[command(after_help = "Examples:\n  dotman init ~/dotfiles\n  dotman init https://github.com/user/dotfiles.git ~/dotfiles")]
pub struct InitArgs {
    /// Optional repository URL to clone, followed by the local folder
    #[arg(value_name = "[REPO_URL] FOLDER", num_args = 1..=2, required = true)]
    pub paths: Vec<String>,
}

impl InitArgs {
    pub fn repo_url(&self) -> Option<&str> {
        match self.paths.as_slice() {
            [url, _] => Some(url.as_str()),
            _ => None,
        }
    }

    pub fn folder(&self) -> &str {
        self.paths.last().map(String::as_str).unwrap_or_default()
    }
}

/// Run the init command
pub fn run(args: InitArgs, globals: Globals) -> Result<()> {
    let target = expand_home(args.folder());

    match args.repo_url() {
        Some(url) => {
            if target.exists() && target.read_dir().map(|mut d| d.next().is_some()).unwrap_or(true) {
                bail!("Target folder {} already exists and is not empty", target.display());
            }
            println!("Cloning {} into {}...", url, target.display());
            GitService::clone_repo(url, &target, globals.verbose).context("Git clone failed")?;
        }
        None => {
            if !target.is_dir() {
                bail!("Folder {} does not exist", target.display());
            }
            println!("Initializing dotman in existing folder: {}", target.display());
        }
    }

    let absolute = absolutize(&target)
        .with_context(|| format!("Failed to resolve {}", target.display()))?;
    let stored = contract_home(&absolute);

    let mut store = ConfigStore::load_default()?;
    store.set(KEY_DOTFILE_PATH, stored.clone())?;
    store.save()?;
    tracing::debug!(path = %stored, config = %store.path().display(), "saved dotfile path");

    if !absolute.join(HOME_MIRROR_DIR).is_dir() {
        println!(
            "Note: {} has no '{}' directory yet; 'dotman add <file>' will create it.",
            stored, HOME_MIRROR_DIR
        );
    }
    match args.repo_url() {
        Some(_) => println!("Initialized dotman in cloned repo."),
        None => println!("Initialized dotman in existing repo."),
    }
    Ok(())
}
