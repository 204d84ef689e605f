//! Path context for filesystem results
//!
//! Reads and writes fail into separate [`ApplicationError`] variants so callers
//! can tell a missing input from an output that could not be created.

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait IoResultExt<T> {
    /// Tag a failed read of `path`.
    fn with_read_context(self, path: &Path) -> ApplicationResult<T>;

    /// Tag a failed write of `path`.
    fn with_write_context(self, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_read_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn with_write_context(self, path: &Path) -> ApplicationResult<T> {
        self.map_err(|source| ApplicationError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}
