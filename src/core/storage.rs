use crate::domain::ports::PatchStore;
use crate::utils::error::{IoStep, Result, UpdateError};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Suffix of the sibling file a new document is staged in before the rename.
pub const TEMP_SUFFIX: &str = ".new";

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(TEMP_SUFFIX);
    PathBuf::from(tmp)
}

#[cfg(unix)]
pub fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
pub fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl PatchStore for LocalStorage {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| UpdateError::io(IoStep::Read, path, e))
    }

    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        let tmp_path = temp_path_for(path);
        tracing::debug!("Staging update in {}", tmp_path.display());

        let mut f =
            File::create(&tmp_path).map_err(|e| UpdateError::io(IoStep::CreateTemp, &tmp_path, e))?;

        let staged = f
            .write_all(data)
            .and_then(|_| f.flush())
            .map_err(|e| UpdateError::io(IoStep::WriteTemp, &tmp_path, e))
            .and_then(|_| {
                f.sync_all()
                    .map_err(|e| UpdateError::io(IoStep::SyncTemp, &tmp_path, e))
            });
        drop(f);

        if let Err(e) = staged {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(UpdateError::io(IoStep::Rename, path, e));
        }

        // committed from here on
        if let Err(e) = sync_parent_dir(path) {
            tracing::warn!(
                "Updated {} but could not sync its directory: {}",
                path.display(),
                e
            );
        }

        Ok(())
    }
}
