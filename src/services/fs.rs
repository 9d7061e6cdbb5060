//! Filesystem helpers: permission-preserving copies and `~` handling

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CopyError {
    #[error("failed to stat {}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to create directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to copy {} to {}", from.display(), to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to set permissions on {}", path.display())]
    Permissions {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// The current user's home directory
pub fn home_dir() -> Option<PathBuf> {
    dirs::home_dir()
}

/// Expand a leading `~` or `~/` against `home`
pub fn expand_home_in(path: &str, home: &Path) -> PathBuf {
    if path == "~" {
        return home.to_path_buf();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(path),
    }
}

pub fn expand_home(path: &str) -> PathBuf {
    match home_dir() {
        Some(home) => expand_home_in(path, &home),
        None => PathBuf::from(path),
    }
}

/// Rewrite a path under `home` as `~/...`; other paths are returned as is
pub fn contract_home_in(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rel) if rel.as_os_str().is_empty() => "~".to_string(),
        Ok(rel) => format!("~/{}", rel.display()),
        Err(_) => path.display().to_string(),
    }
}

pub fn contract_home(path: &Path) -> String {
    match home_dir() {
        Some(home) => contract_home_in(path, &home),
        None => path.display().to_string(),
    }
}

/// Make `path` absolute against the current directory without touching the disk
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Copy `from` to `to`, creating parent directories and carrying over the
/// source's permission bits.
pub fn copy_preserving_mode(from: &Path, to: &Path) -> Result<(), CopyError> {
    let meta = fs::metadata(from).map_err(|source| CopyError::Stat {
        path: from.to_path_buf(),
        source,
    })?;

    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| CopyError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::copy(from, to).map_err(|source| CopyError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })?;

    fs::set_permissions(to, meta.permissions()).map_err(|source| CopyError::Permissions {
        path: to.to_path_buf(),
        source,
    })
}
