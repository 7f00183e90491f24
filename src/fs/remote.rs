//! ## Remote
//!
//! the `RemoteFs` trait

use std::path::{Path, PathBuf};

use super::{File, ReadStream, RemoteResult, Walk, WriteStream};

/// What the client learnt about the remote host while connecting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Welcome {
    /// Banner sent by the server, if any
    pub banner: Option<String>,
    /// Working directory relative paths are resolved against
    pub wrkdir: PathBuf,
}

/// Defines the methods which must be implemented in order to operate on a remote file system.
///
/// All the operations are blocking; a client is used from a single thread of control.
pub trait RemoteFs {
    /// Connect to the remote server and authenticate.
    /// Can return banner / welcome message on success.
    fn connect(&mut self) -> RemoteResult<Welcome>;

    /// Disconnect from the remote server.
    /// Releases the file transfer subsystem before the underlying session.
    fn disconnect(&mut self) -> RemoteResult<()>;

    /// Gets whether the client is connected to remote
    fn is_connected(&self) -> bool;

    /// List directory entries at specified `path`.
    /// `.` and `..` are never returned
    fn list_dir(&mut self, path: &Path) -> RemoteResult<Vec<File>>;

    /// Stat file at specified `path`, following symbolic links
    fn stat(&mut self, path: &Path) -> RemoteResult<File>;

    /// Stat file at specified `path`, without following symbolic links
    fn lstat(&mut self, path: &Path) -> RemoteResult<File>;

    /// Remove file at specified `path`.
    /// Fails if is not a file or doesn't exist
    fn remove_file(&mut self, path: &Path) -> RemoteResult<()>;

    /// Create file at path for write.
    /// If the file already exists, its content will be overwritten
    fn create(&mut self, path: &Path) -> RemoteResult<WriteStream>;

    /// Open file at specified path for read.
    fn open(&mut self, path: &Path) -> RemoteResult<ReadStream>;

    /// Walk the file tree rooted at `path`, depth-first.
    ///
    /// See [`Walk`] for ordering and error semantics.
    fn walk(&mut self, path: &Path) -> Walk<'_, Self>
    where
        Self: Sized,
    {
        Walk::new(self, path)
    }
}
