//! ## Metadata
//!
//! attributes of a remote file

use std::path::PathBuf;

use super::{FileType, Mode};

/// Attributes returned by the server for a file.
/// Anything the server didn't report is `None`
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Metadata {
    pub file_type: FileType,
    /// Size in bytes
    pub size: u64,
    pub mode: Option<Mode>,
    /// Target of the link, for symlinks
    pub symlink: Option<PathBuf>,
}

impl Metadata {
    /// Metadata of a file of type `file_type`, `size` bytes long
    pub fn new(file_type: FileType, size: u64) -> Self {
        Self {
            file_type,
            size,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_symlink(mut self, target: PathBuf) -> Self {
        self.symlink = Some(target);
        self
    }

    /// Type and permissions as `ls -l` renders them, e.g. `drwxr-xr-x`.
    /// Unknown permissions are rendered as `?????????`
    pub fn mode_string(&self) -> String {
        let kind = match self.file_type {
            FileType::Directory => 'd',
            FileType::File => '-',
            FileType::Symlink => 'l',
        };
        match self.mode {
            Some(mode) => format!("{}{}", kind, mode),
            None => format!("{}?????????", kind),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn should_default_to_empty_regular_file() {
        let metadata = Metadata::default();
        assert_eq!(metadata.file_type, FileType::File);
        assert_eq!(metadata.size, 0);
        assert!(metadata.mode.is_none());
        assert!(metadata.symlink.is_none());
    }

    #[test]
    fn should_render_mode_string() {
        let metadata = Metadata::new(FileType::File, 12).with_mode(Mode::from(0o644));
        assert_eq!(metadata.mode_string().as_str(), "-rw-r--r--");
        let metadata = Metadata::new(FileType::Directory, 4096).with_mode(Mode::from(0o755));
        assert_eq!(metadata.mode_string().as_str(), "drwxr-xr-x");
        let metadata =
            Metadata::new(FileType::Symlink, 0).with_symlink(PathBuf::from("/tmp/a.txt"));
        assert_eq!(metadata.mode_string().as_str(), "l?????????");
        assert_eq!(metadata.symlink, Some(PathBuf::from("/tmp/a.txt")));
    }
}
