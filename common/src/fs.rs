use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolves `path` against the current working directory. Absolute paths are returned as is.
pub fn relative_to_cwd(path: impl AsRef<Path>) -> Result<PathBuf> {
    let path = path.as_ref();

    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().context("Failed to read the current working directory")?;

    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_unchanged() {
        let path = std::env::temp_dir().join("client.conf");

        assert_eq!(relative_to_cwd(&path).unwrap(), path);
    }

    #[test]
    fn test_relative_path_is_joined_to_cwd() {
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(relative_to_cwd("client.conf").unwrap(), cwd.join("client.conf"));
    }
}
