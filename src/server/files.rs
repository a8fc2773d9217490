//! Filesystem access for the `/files/` route.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Reads and writes files directly under a configured root directory.
///
/// Names come from the request path, which the parser has already checked
/// for `..`, `//` and NUL. A store without a root answers every read with
/// `NotFound` and refuses every write.
#[derive(Debug, Clone, Default)]
pub struct FileStore {
    root: Option<PathBuf>,
}

impl FileStore {
    /// Create a store rooted at `root`. An empty path means no root.
    pub fn new(root: Option<PathBuf>) -> Self {
        let root = root.filter(|path| !path.as_os_str().is_empty());
        Self { root }
    }

    /// The configured root directory, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Resolve `name` against the root.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.root.as_ref().map(|root| root.join(name))
    }

    /// Read the whole file called `name`.
    pub async fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let path = self
            .resolve(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no file directory configured"))?;
        fs::read(path).await
    }

    /// Create or overwrite the file called `name` with `contents`.
    ///
    /// New files are readable and writable by the owner only.
    pub async fn write(&self, name: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.resolve(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::PermissionDenied, "no file directory configured")
        })?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options.open(&path).await?;
        file.write_all(contents).await?;
        file.flush().await?;
        Ok(path)
    }
}
