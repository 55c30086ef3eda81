//! Load and atomic save for [`Document`].

use crate::{Document, DocumentError, Encoding, LineEnding, split_lines};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Files larger than this are refused unless the caller configures otherwise (50 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;

/// Removes the temporary file on drop unless the rename went through.
struct TempFileGuard {
    path: PathBuf,
    armed: bool,
}

impl TempFileGuard {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if self.armed && self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(target: "io", path = %self.path.display(), ?e, "temp_cleanup_failed");
            }
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, DocumentError> {
    std::path::absolute(path).map_err(|e| DocumentError::from_io(path, e))
}

fn temp_sibling(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    target.with_file_name(name)
}

impl Document {
    /// Replace this document with the content of `path`.
    ///
    /// A path that does not exist yields an empty document bound to it. On
    /// error the current content and metadata are left as they were.
    pub fn load(&mut self, path: &Path, max_file_size: u64) -> Result<(), DocumentError> {
        let path = absolute(path)?;
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(target: "io", path = %path.display(), "new_file");
                *self = Document::new();
                self.filename = Some(path);
                return Ok(());
            }
            Err(e) => return Err(DocumentError::from_io(&path, e)),
        };
        if !meta.is_file() {
            return Err(DocumentError::NotAFile(path));
        }
        if meta.len() > max_file_size {
            return Err(DocumentError::FileTooLarge {
                path,
                size: meta.len(),
                max: max_file_size,
            });
        }
        let bytes = fs::read(&path).map_err(|e| DocumentError::from_io(&path, e))?;
        let encoding = Encoding::detect(&bytes);
        let text = encoding.decode(&bytes);
        let line_ending = LineEnding::detect(&text);

        self.lines = split_lines(&text);
        self.encoding = encoding;
        self.line_ending = line_ending;
        self.filename = Some(path);
        self.modified = false;
        self.recompute_stats();
        info!(
            target: "io",
            path = ?self.filename,
            %encoding,
            %line_ending,
            lines = self.lines.len(),
            "file_loaded"
        );
        Ok(())
    }

    /// Write the document to `path` (or the bound filename) through a
    /// temporary sibling that is renamed over the target. Binds the document
    /// to the written path and clears `modified` on success.
    pub fn save(&mut self, path: Option<&Path>) -> Result<PathBuf, DocumentError> {
        let target = match path {
            Some(p) => absolute(p)?,
            None => self.filename.clone().ok_or(DocumentError::NoFilename)?,
        };
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| DocumentError::from_io(parent, e))?;
        }

        let bytes = self.encoding.encode(&self.text()).map_err(|e| DocumentError::Io {
            path: target.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let tmp = temp_sibling(&target);
        let mut guard = TempFileGuard::new(tmp.clone());
        let write_tmp = || -> std::io::Result<()> {
            let mut f = fs::File::create(&tmp)?;
            f.write_all(&bytes)?;
            f.sync_all()
        };
        write_tmp().map_err(|e| DocumentError::from_io(&tmp, e))?;
        fs::rename(&tmp, &target).map_err(|e| DocumentError::from_io(&target, e))?;
        guard.disarm();

        self.modified = false;
        self.filename = Some(target.clone());
        debug!(target: "io", path = %target.display(), bytes = bytes.len(), "file_saved");
        Ok(target)
    }
}
