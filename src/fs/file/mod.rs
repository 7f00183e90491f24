//! ## File
//!
//! remote file entries

/**
 * MIT License
 *
 * sftpctl - Copyright (c) 2021 Christian Visintin
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */
use std::path::{Path, PathBuf};

mod metadata;
mod mode;

pub use metadata::Metadata;
pub use mode::Mode;

/// Kind of a remote entry.
/// A symlink is reported as such, whatever it points to
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FileType {
    Directory,
    #[default]
    File,
    Symlink,
}

/// An entry of the remote file system: its absolute path and what the server reported about it
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct File {
    pub path: PathBuf,
    pub metadata: Metadata,
}

impl File {
    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    /// Last component of the path; `/` for the root
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|x| x.to_string_lossy().to_string())
            .unwrap_or_else(|| "/".to_string())
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn is_dir(&self) -> bool {
        self.metadata.file_type == FileType::Directory
    }

    pub fn is_file(&self) -> bool {
        self.metadata.file_type == FileType::File
    }

    pub fn is_symlink(&self) -> bool {
        self.metadata.file_type == FileType::Symlink
    }
}
