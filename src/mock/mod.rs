//! ## Mock
//!
//! Contains mock for test units

pub mod ssh;

use crate::fs::{
    File, FileType, Metadata, Mode, ReadStream, RemoteError, RemoteErrorType, RemoteFs,
    RemoteResult, Welcome, WriteStream,
};

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Initialize the logger for tests; subsequent calls are no-op
pub fn logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

// -- mock

enum Node {
    File { data: Rc<RefCell<Vec<u8>>>, mode: u32 },
    Directory { mode: u32, readable: bool },
    Symlink { target: PathBuf },
}

/// In-memory remote file system
pub struct MockRemoteFs {
    connected: bool,
    nodes: BTreeMap<PathBuf, Node>,
    /// How many times the client has been disconnected
    pub disconnections: usize,
}

impl Default for MockRemoteFs {
    fn default() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            PathBuf::from("/"),
            Node::Directory {
                mode: 0o755,
                readable: true,
            },
        );
        Self {
            connected: true,
            nodes,
            disconnections: 0,
        }
    }
}

impl MockRemoteFs {
    pub fn disconnected() -> Self {
        Self {
            connected: false,
            ..Self::default()
        }
    }

    pub fn with_dir<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.nodes.insert(
            p.as_ref().to_path_buf(),
            Node::Directory {
                mode: 0o755,
                readable: true,
            },
        );
        self
    }

    pub fn with_unreadable_dir<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.nodes.insert(
            p.as_ref().to_path_buf(),
            Node::Directory {
                mode: 0o700,
                readable: false,
            },
        );
        self
    }

    pub fn with_file<P: AsRef<Path>>(self, p: P, data: &[u8]) -> Self {
        self.with_file_mode(p, data, 0o644)
    }

    pub fn with_file_mode<P: AsRef<Path>>(mut self, p: P, data: &[u8], mode: u32) -> Self {
        self.nodes.insert(
            p.as_ref().to_path_buf(),
            Node::File {
                data: Rc::new(RefCell::new(data.to_vec())),
                mode,
            },
        );
        self
    }

    pub fn with_symlink<P: AsRef<Path>, T: AsRef<Path>>(mut self, p: P, target: T) -> Self {
        self.nodes.insert(
            p.as_ref().to_path_buf(),
            Node::Symlink {
                target: target.as_ref().to_path_buf(),
            },
        );
        self
    }

    /// Get content of file at `p`
    pub fn content<P: AsRef<Path>>(&self, p: P) -> Option<Vec<u8>> {
        match self.nodes.get(p.as_ref()) {
            Some(Node::File { data, .. }) => Some(data.borrow().clone()),
            _ => None,
        }
    }

    fn check_connection(&self) -> RemoteResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(RemoteError::new(RemoteErrorType::NotConnected))
        }
    }

    /// Relative paths are resolved against `/`, the mock working directory
    fn absolutize(path: &Path) -> PathBuf {
        Path::new("/").join(path)
    }

    fn make_file(path: &Path, node: &Node) -> File {
        let metadata = match node {
            Node::File { data, mode } => {
                Metadata::new(FileType::File, data.borrow().len() as u64)
                    .with_mode(Mode::from(*mode))
            }
            Node::Directory { mode, .. } => {
                Metadata::new(FileType::Directory, 4096).with_mode(Mode::from(*mode))
            }
            Node::Symlink { target } => Metadata::new(FileType::Symlink, 0)
                .with_mode(Mode::from(0o777))
                .with_symlink(target.clone()),
        };
        File {
            path: path.to_path_buf(),
            metadata,
        }
    }
}

/// Writer appending to a file node shared with the mock
struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl RemoteFs for MockRemoteFs {
    fn connect(&mut self) -> RemoteResult<Welcome> {
        self.connected = true;
        Ok(Welcome {
            banner: None,
            wrkdir: PathBuf::from("/"),
        })
    }

    fn disconnect(&mut self) -> RemoteResult<()> {
        self.check_connection()?;
        self.connected = false;
        self.disconnections += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn list_dir(&mut self, path: &Path) -> RemoteResult<Vec<File>> {
        let path = Self::absolutize(path);
        let path = path.as_path();
        self.check_connection()?;
        match self.nodes.get(path) {
            Some(Node::Directory { readable: true, .. }) => Ok(self
                .nodes
                .iter()
                .filter(|(p, _)| p.parent() == Some(path))
                .map(|(p, node)| Self::make_file(p, node))
                .collect()),
            Some(_) => Err(RemoteError::new_ex(
                RemoteErrorType::CouldNotOpenFile,
                format!("permission denied: {}", path.display()),
            )),
            None => Err(RemoteError::new_ex(
                RemoteErrorType::NoSuchFileOrDirectory,
                path.display(),
            )),
        }
    }

    fn stat(&mut self, path: &Path) -> RemoteResult<File> {
        let file = self.lstat(path)?;
        match file.metadata.symlink.as_deref() {
            Some(target) => {
                let target = self.lstat(target)?;
                Ok(File {
                    path: file.path,
                    metadata: target.metadata,
                })
            }
            None => Ok(file),
        }
    }

    fn lstat(&mut self, path: &Path) -> RemoteResult<File> {
        let path = Self::absolutize(path);
        let path = path.as_path();
        self.check_connection()?;
        self.nodes
            .get(path)
            .map(|node| Self::make_file(path, node))
            .ok_or_else(|| {
                RemoteError::new_ex(RemoteErrorType::NoSuchFileOrDirectory, path.display())
            })
    }

    fn remove_file(&mut self, path: &Path) -> RemoteResult<()> {
        let path = Self::absolutize(path);
        let path = path.as_path();
        self.check_connection()?;
        match self.nodes.get(path) {
            Some(Node::File { .. }) | Some(Node::Symlink { .. }) => {
                self.nodes.remove(path);
                Ok(())
            }
            Some(Node::Directory { .. }) => Err(RemoteError::new_ex(
                RemoteErrorType::CouldNotRemoveFile,
                format!("{} is a directory", path.display()),
            )),
            None => Err(RemoteError::new_ex(
                RemoteErrorType::CouldNotRemoveFile,
                format!("no such file: {}", path.display()),
            )),
        }
    }

    fn create(&mut self, path: &Path) -> RemoteResult<WriteStream> {
        let path = Self::absolutize(path);
        let path = path.as_path();
        self.check_connection()?;
        let parent_is_dir = path
            .parent()
            .map(|p| matches!(self.nodes.get(p), Some(Node::Directory { .. })))
            .unwrap_or(false);
        if !parent_is_dir || matches!(self.nodes.get(path), Some(Node::Directory { .. })) {
            return Err(RemoteError::new_ex(
                RemoteErrorType::FileCreateDenied,
                path.display(),
            ));
        }
        let data = Rc::new(RefCell::new(Vec::new()));
        self.nodes.insert(
            path.to_path_buf(),
            Node::File {
                data: data.clone(),
                mode: 0o644,
            },
        );
        Ok(WriteStream::new(SharedBuffer(data)))
    }

    fn open(&mut self, path: &Path) -> RemoteResult<ReadStream> {
        let path = Self::absolutize(path);
        let path = path.as_path();
        self.check_connection()?;
        match self.nodes.get(path) {
            Some(Node::File { data, .. }) => Ok(ReadStream::new(Cursor::new(data.borrow().clone()))),
            Some(_) => Err(RemoteError::new_ex(
                RemoteErrorType::CouldNotOpenFile,
                format!("{} is not a file", path.display()),
            )),
            None => Err(RemoteError::new_ex(
                RemoteErrorType::CouldNotOpenFile,
                format!("no such file: {}", path.display()),
            )),
        }
    }
}
