//! Location of the dotfile repository and the tree it mirrors

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::config::{ConfigError, ConfigStore, KEY_DOTFILE_PATH};
use super::fs::{expand_home_in, home_dir};
use crate::utils::HOME_MIRROR_DIR;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("no dotfile repository configured; run 'dotman init' first")]
    NotConfigured,

    #[error("dotfile path '{}' does not exist", .0.display())]
    RootMissing(PathBuf),

    #[error("dotfile repository has no 'home' directory at {}", .0.display())]
    MirrorMissing(PathBuf),

    #[error("could not determine the home directory")]
    NoHome,

    #[error("failed to create {}", path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A dotfile repository root, its `home/` mirror and the live home directory
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    mirror: PathBuf,
    home: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let mirror = root.join(HOME_MIRROR_DIR);
        Self {
            root,
            mirror,
            home: home.into(),
        }
    }

    /// Resolve the configured repository against the user's home directory
    pub fn from_config(store: &ConfigStore) -> Result<Self, WorkspaceError> {
        let home = home_dir().ok_or(WorkspaceError::NoHome)?;
        Self::from_config_with_home(store, home)
    }

    pub fn from_config_with_home(
        store: &ConfigStore,
        home: impl Into<PathBuf>,
    ) -> Result<Self, WorkspaceError> {
        let home = home.into();
        let raw = store
            .get(KEY_DOTFILE_PATH)?
            .ok_or(WorkspaceError::NotConfigured)?;
        let root = expand_home_in(&raw, &home);
        if !root.is_dir() {
            return Err(WorkspaceError::RootMissing(root));
        }
        tracing::debug!(root = %root.display(), "resolved dotfile repository");
        Ok(Self::new(root, home))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn mirror(&self) -> &Path {
        &self.mirror
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Fail unless the mirror directory exists
    pub fn require_mirror(&self) -> Result<(), WorkspaceError> {
        if self.mirror.is_dir() {
            Ok(())
        } else {
            Err(WorkspaceError::MirrorMissing(self.mirror.clone()))
        }
    }

    pub fn ensure_mirror(&self) -> Result<(), WorkspaceError> {
        fs::create_dir_all(&self.mirror).map_err(|source| WorkspaceError::Create {
            path: self.mirror.clone(),
            source,
        })
    }

    pub fn mirror_path(&self, rel: &str) -> PathBuf {
        self.mirror.join(rel)
    }

    pub fn home_path(&self, rel: &str) -> PathBuf {
        self.home.join(rel)
    }

    /// Path of `rel` as version control sees it, relative to the repo root
    pub fn vcs_path(rel: &str) -> String {
        format!("{HOME_MIRROR_DIR}/{rel}")
    }

    /// Path of `file` relative to the home directory, if it lives there
    pub fn rel_to_home(&self, file: &Path) -> Option<String> {
        let rel = file.strip_prefix(&self.home).ok()?;
        let rel = rel.to_string_lossy().replace('\\', "/");
        (!rel.is_empty()).then_some(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(dir: &TempDir, value: Option<&str>) -> ConfigStore {
        let mut store = ConfigStore::load(dir.path().join("dotman.json")).unwrap();
        if let Some(value) = value {
            store.set(KEY_DOTFILE_PATH, value).unwrap();
        }
        store
    }

    #[test]
    fn test_not_configured() {
        let dir = TempDir::new().unwrap();
        let store = store_with(&dir, None);
        assert!(matches!(
            Workspace::from_config_with_home(&store, dir.path()),
            Err(WorkspaceError::NotConfigured)
        ));
    }

    #[test]
    fn test_root_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let store = store_with(&dir, Some(missing.to_str().unwrap()));
        assert!(matches!(
            Workspace::from_config_with_home(&store, dir.path()),
            Err(WorkspaceError::RootMissing(p)) if p == missing
        ));
    }

    #[test]
    fn test_resolves_paths() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("dots");
        fs::create_dir_all(root.join("home")).unwrap();
        let store = store_with(&dir, Some(root.to_str().unwrap()));

        let ws = Workspace::from_config_with_home(&store, dir.path().join("me")).unwrap();
        assert_eq!(ws.mirror(), root.join("home"));
        assert!(ws.require_mirror().is_ok());
        assert_eq!(ws.mirror_path(".vimrc"), root.join("home/.vimrc"));
        assert_eq!(ws.home_path(".vimrc"), dir.path().join("me/.vimrc"));
        assert_eq!(Workspace::vcs_path(".vimrc"), "home/.vimrc");
    }

    #[test]
    fn test_tilde_expands_against_given_home() {
        let dir = TempDir::new().unwrap();
        let me = dir.path().join("me");
        fs::create_dir_all(me.join("dots/home")).unwrap();
        let store = store_with(&dir, Some("~/dots"));

        let ws = Workspace::from_config_with_home(&store, &me).unwrap();
        assert_eq!(ws.root(), me.join("dots"));
        assert_eq!(ws.mirror(), me.join("dots/home"));
    }

    #[test]
    fn test_mirror_missing_then_created() {
        let dir = TempDir::new().unwrap();
        let ws = Workspace::new(dir.path(), dir.path().join("me"));
        assert!(matches!(
            ws.require_mirror(),
            Err(WorkspaceError::MirrorMissing(_))
        ));
        ws.ensure_mirror().unwrap();
        assert!(ws.require_mirror().is_ok());
    }

    #[test]
    fn test_rel_to_home() {
        let ws = Workspace::new("/dots", "/home/me");
        assert_eq!(
            ws.rel_to_home(Path::new("/home/me/.config/fish/config.fish")),
            Some(".config/fish/config.fish".to_string())
        );
        assert_eq!(ws.rel_to_home(Path::new("/etc/hosts")), None);
        assert_eq!(ws.rel_to_home(Path::new("/home/me")), None);
    }
}
