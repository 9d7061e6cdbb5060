//! Collaborators the engine delegates to: configuration, filesystem and git

pub mod config;
pub mod fs;
pub mod git;
pub mod workspace;

pub use config::{ConfigError, ConfigStore};
pub use git::{GitError, GitService, VersionControl};
pub use workspace::{Workspace, WorkspaceError};
