use std::fs;
use std::path::Path;

use crate::errors::AppError;

// @module: File utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @reads: Whole file as raw bytes, decoding is left to the caller
    pub fn read_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, AppError> {
        let path = path.as_ref();
        if !Self::file_exists(path) {
            return Err(AppError::File(format!("Input file does not exist: {}", path.display())));
        }

        fs::read(path).map_err(|e| AppError::File(format!("Failed to read {}: {}", path.display(), e)))
    }
}
