//! Throwaway directories holding configuration documents.

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory removed on drop.
///
/// # Examples
///
/// ```
/// use cfgtree_test_helpers::files::ConfigDir;
///
/// # fn main() -> anyhow::Result<()> {
/// let dir = ConfigDir::new()?;
/// let path = dir.write("base.json", r#"{"A": "1"}"#)?;
/// assert!(path.starts_with(dir.path()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConfigDir {
    _dir: TempDir,
    path: Utf8PathBuf,
}

impl ConfigDir {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = TempDir::new().context("create temporary directory")?;
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|raw| anyhow::anyhow!("non UTF-8 temporary path {}", raw.display()))?;
        Ok(Self { _dir: dir, path })
    }

    /// The directory itself.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Write `contents` to `name` inside the directory and return its path.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.path.join(name);
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }

    /// Write several `(name, contents)` pairs, returning the paths in order.
    ///
    /// # Errors
    ///
    /// Fails on the first file that cannot be written.
    pub fn write_all<'a, I>(&self, files: I) -> Result<Vec<Utf8PathBuf>>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        files
            .into_iter()
            .map(|(name, contents)| self.write(name, contents))
            .collect()
    }
}
