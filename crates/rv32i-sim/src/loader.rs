//! Loads a raw binary image from disk into simulated memory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rv32i_core::{Memory, MemoryError};
use thiserror::Error;

/// Failure to place a program image into memory.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("can't open file '{}' for reading: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// The image is longer than the memory.
    #[error(transparent)]
    TooLarge(#[from] MemoryError),
}

/// Reads `path` and copies its bytes into `memory` starting at address 0.
///
/// # Errors
///
/// Returns [`LoadError::Io`] when the file cannot be read and
/// [`LoadError::TooLarge`] when it does not fit.
pub fn load_file(path: &Path, memory: &mut Memory) -> Result<usize, LoadError> {
    let image = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    memory.load_image(&image)?;
    log::info!("loaded {} into {} bytes of memory", path.display(), memory.size());
    Ok(image.len())
}
