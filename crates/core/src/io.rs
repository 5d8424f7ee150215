//! Metadata file I/O utilities.

use std::{
    fs::{create_dir_all, read_to_string, write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glob::glob;

/// A metadata file handle for I/O operations.
#[derive(Debug, Clone)]
pub struct MetadataFile {
    path: PathBuf,
}

impl MetadataFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> Result<String> {
        read_to_string(&self.path)
            .with_context(|| format!("Failed to read metadata: {}", self.path.display()))
    }

    /// Read the file and hand its contents to a parser, naming the file on failure.
    pub fn parse<T, E>(&self, parse: impl FnOnce(&str) -> Result<T, E>) -> Result<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let contents = self.read()?;
        parse(&contents).with_context(|| format!("Invalid metadata in {}", self.path.display()))
    }

    pub fn write(&self, contents: impl AsRef<[u8]>) -> Result<()> {
        self.ensure_parent_dir()?;
        write(&self.path, contents)
            .with_context(|| format!("Failed to write metadata: {}", self.path.display()))
    }

    pub fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        Ok(())
    }
}

impl AsRef<Path> for MetadataFile {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// Find metadata files matching a glob pattern in a directory, sorted by path.
pub fn glob_metadata(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let pattern = dir.join(pattern);
    let pattern_str = pattern.to_str().context("Invalid pattern path")?;
    let mut paths: Vec<PathBuf> = glob(pattern_str)
        .with_context(|| format!("Failed to glob pattern: {pattern_str}"))?
        .filter_map(Result::ok)
        .collect();
    paths.sort();
    Ok(paths)
}
