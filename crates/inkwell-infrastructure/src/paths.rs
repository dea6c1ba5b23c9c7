//! Path management for Inkwell configuration files.
//!
//! ```text
//! ~/.config/inkwell/
//! ├── config.toml     # Application configuration
//! └── secret.json     # API key
//! ```

use std::path::{Path, PathBuf};

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Resolves where Inkwell keeps its files.
///
/// A base directory can be supplied to relocate everything (used by tests).
#[derive(Debug, Clone, Default)]
pub struct InkwellPaths {
    base: Option<PathBuf>,
}

impl InkwellPaths {
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    /// Returns the configuration directory (`~/.config/inkwell/` by default).
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        if let Some(base) = &self.base {
            return Ok(base.clone());
        }
        let home = dirs::home_dir().ok_or(PathError::HomeDirNotFound)?;
        Ok(home.join(".config").join("inkwell"))
    }

    /// Returns the path to `config.toml`.
    pub fn config_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("config.toml"))
    }

    /// Returns the path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// Keep this file readable by the owner only (600 on Unix).
    pub fn secret_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join("secret.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_dir_overrides_home() {
        let paths = InkwellPaths::new(Some(Path::new("/tmp/inkwell-test")));
        assert_eq!(
            paths.config_file().unwrap(),
            PathBuf::from("/tmp/inkwell-test/config.toml")
        );
        assert_eq!(
            paths.secret_file().unwrap(),
            PathBuf::from("/tmp/inkwell-test/secret.json")
        );
    }

    #[test]
    fn test_default_dir_ends_with_inkwell() {
        if let Ok(dir) = InkwellPaths::default().config_dir() {
            assert!(dir.ends_with(".config/inkwell"));
        }
    }
}
