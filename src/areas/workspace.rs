//! Working directory access
//!
//! All paths handed to the workspace are relative to the repository root.
//! The repository directory is never listed and never written through here.

use crate::areas::repository::REPOSITORY_DIR;
use crate::artifacts::objects::entry_mode::FileMode;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tracing::trace;
use walkdir::{DirEntry, WalkDir};

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Express `path` relative to the workspace root
    ///
    /// Relative paths are taken as-is; absolute paths must live under the root.
    pub fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let absolute = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        absolute
            .strip_prefix(self.path())
            .map(Path::to_path_buf)
            .map_err(|_| {
                Error::invalid_argument(format!(
                    "{} is outside the repository at {}",
                    path.display(),
                    self.path().display()
                ))
            })
    }

    /// All regular files below the root as sorted `/`-separated paths
    pub fn list_files(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(self.path())
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !Self::is_ignored(entry));

        for entry in walker {
            let entry = entry.map_err(|err| match err.into_io_error() {
                Some(err) => Error::Io(err),
                None => Error::invalid_argument("filesystem loop in working directory"),
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(name) = self.to_slash_path(entry.path()) {
                files.push(name);
            }
        }

        files.sort();
        Ok(files)
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Bytes> {
        let path = self.path.join(file_path);

        if path.is_dir() {
            return Err(Error::invalid_argument(format!(
                "{} is a directory",
                file_path.display()
            )));
        }

        let content = std::fs::read(&path).map_err(|err| Error::from_io_at(err, file_path))?;

        Ok(content.into())
    }

    /// Executable bit of a working-directory file
    pub fn file_mode(&self, file_path: &Path) -> Result<FileMode> {
        let metadata = std::fs::metadata(self.path.join(file_path))
            .map_err(|err| Error::from_io_at(err, file_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if metadata.permissions().mode() & 0o111 != 0 {
                return Ok(FileMode::Executable);
            }
        }
        #[cfg(not(unix))]
        let _ = metadata;

        Ok(FileMode::Regular)
    }

    /// Create or overwrite a file, creating missing parent directories
    ///
    /// `file_path` must stay below the root and outside the repository directory.
    pub fn write_file(&self, file_path: &str, data: &[u8], mode: FileMode) -> Result<()> {
        Self::check_writable(Path::new(file_path))?;
        let path = self.path.join(file_path);

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, data)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = match mode {
                FileMode::Regular => 0o644,
                FileMode::Executable => 0o755,
            };
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(permissions))?;
        }
        #[cfg(not(unix))]
        let _ = mode;

        trace!(path = %file_path, size = data.len(), "wrote working file");
        Ok(())
    }

    fn is_ignored(entry: &DirEntry) -> bool {
        entry.depth() == 1 && entry.file_name() == REPOSITORY_DIR
    }

    fn check_writable(file_path: &Path) -> Result<()> {
        let escapes = !file_path
            .components()
            .all(|component| matches!(component, Component::Normal(_)));
        let in_repository_dir = file_path
            .components()
            .next()
            .is_some_and(|first| first.as_os_str() == REPOSITORY_DIR);

        if file_path.as_os_str().is_empty() || escapes || in_repository_dir {
            return Err(Error::invalid_argument(format!(
                "refusing to write {} outside the working directory",
                file_path.display()
            )));
        }

        Ok(())
    }

    fn to_slash_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(self.path()).ok()?;
        let segments = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?;

        Some(segments.join("/"))
    }
}
