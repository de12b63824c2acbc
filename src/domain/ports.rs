use crate::utils::error::Result;
use std::path::Path;

/// Where patch documents are read from and committed to.
pub trait PatchStore {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replaces `path` with `data` so that readers observe either the old
    /// content or the new content, never a mix.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()>;
}
