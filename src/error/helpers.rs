use super::{ErrorCode, PartexpError};
use std::path::Path;

/// Extension trait for convenient error conversion
pub trait ErrorExt<T> {
    /// Convert to a storage error that remembers the path being written
    fn to_storage_error(self, path: &Path, message: impl Into<String>) -> Result<T, PartexpError>;
}

impl<T, E> ErrorExt<T> for Result<T, E>
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    fn to_storage_error(self, path: &Path, message: impl Into<String>) -> Result<T, PartexpError> {
        self.map_err(|e| {
            PartexpError::storage_with_code(
                ErrorCode::STORAGE_IO_ERROR,
                message,
                Some(path.to_path_buf()),
            )
            .with_source(e)
        })
    }
}
