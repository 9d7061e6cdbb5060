pub mod add;
pub mod apply;
pub mod bootstrap;
pub mod config;
pub mod diff;
pub mod init;
pub mod interrupt;
pub mod logging;
pub mod output;
pub mod prompt;
pub mod publish;
pub mod show;
pub mod status;
pub mod submit;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::services::{ConfigStore, GitService, Workspace};

/// Transparent, git-backed dotfile manager
#[derive(Debug, Parser)]
#[command(name = "dotman")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Echo git commands and enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Point dotman at a dotfile repository, cloning it first if a URL is given
    Init(init::InitArgs),

    /// Review and copy files from the repository into your home directory
    Apply(apply::ApplyArgs),

    /// Review and copy changed files from your home directory into the repository, then commit
    Submit(submit::SubmitArgs),

    /// Pull with rebase and push the repository
    Publish(publish::PublishArgs),

    /// List files that differ between the repository and your home directory
    Status,

    /// Show side-by-side diffs without prompting
    Diff(diff::DiffArgs),

    /// Start tracking a file from your home directory
    Add(add::AddArgs),

    /// Show the files managed by the repository as a tree
    Show,

    /// Run the repository's bootstrap script
    Bootstrap,

    /// Read or change configuration
    Config(config::ConfigArgs),
}

/// Settings shared by every command
#[derive(Debug, Clone, Copy)]
pub struct Globals {
    pub verbose: bool,
}

impl Globals {
    /// Load config and resolve the configured repository
    pub fn workspace(&self) -> Result<(ConfigStore, Workspace)> {
        let store = ConfigStore::load_default()?;
        let workspace = Workspace::from_config(&store)?;
        Ok((store, workspace))
    }

    pub fn git(&self, workspace: &Workspace) -> GitService {
        GitService::new(workspace.root(), self.verbose)
    }
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    interrupt::install();

    let globals = Globals {
        verbose: cli.verbose,
    };

    match cli.command {
        Commands::Init(args) => init::run(args, globals),
        Commands::Apply(args) => apply::run(args, globals),
        Commands::Submit(args) => submit::run(args, globals),
        Commands::Publish(args) => publish::run(args, globals),
        Commands::Status => status::run(globals),
        Commands::Diff(args) => diff::run(args, globals),
        Commands::Add(args) => add::run(args, globals),
        Commands::Show => show::run(globals),
        Commands::Bootstrap => bootstrap::run(globals),
        Commands::Config(args) => config::run(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::ReviewMode;

    #[test]
    fn test_parse_apply_flags() {
        let cli = Cli::try_parse_from(["dotman", "apply", "--dry-run", "--no-pull", "--mode", "sequential"])
            .unwrap();
        match cli.command {
            Commands::Apply(args) => {
                assert!(args.dry_run);
                assert!(args.no_pull);
                assert_eq!(args.mode, ReviewMode::Sequential);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["dotman", "submit", "-v", "--publish"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Submit(ref a) if a.publish));
    }

    #[test]
    fn test_init_with_and_without_url() {
        let cli = Cli::try_parse_from(["dotman", "init", "~/dotfiles"]).unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.folder(), "~/dotfiles");
                assert!(args.repo_url().is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        let cli = Cli::try_parse_from(["dotman", "init", "git@host:me/dots.git", "dots"]).unwrap();
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.repo_url(), Some("git@host:me/dots.git"));
                assert_eq!(args.folder(), "dots");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_subcommands() {
        let cli = Cli::try_parse_from(["dotman", "config", "set", "dotfile.path", "~/d"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(config::ConfigArgs {
                action: config::ConfigAction::Set { .. }
            })
        ));
    }
}
