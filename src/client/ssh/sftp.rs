//! ## SFTP
//!
//! Sftp remote fs implementation

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
use super::{commons, SshOpts};
use crate::fs::{
    File, FileType, Metadata, Mode, ReadStream, RemoteError, RemoteErrorType, RemoteFs,
    RemoteResult, Welcome, WriteStream,
};

use ssh2::{ErrorCode, FileStat, OpenFlags, OpenType};
use ssh2::{Session as SshSession, Sftp as SshSftp};
use std::path::{Path, PathBuf};

/// `LIBSSH2_FX_NO_SUCH_FILE`
const SFTP_NO_SUCH_FILE: i32 = 2;

/// Sftp "filesystem" client.
///
/// Owns the ssh session and the sftp subsystem started on it.
/// The subsystem is always released before the session; both are released on drop
/// if the client is still connected.
pub struct SftpFs {
    // NOTE: `sftp` must be declared before `session`, fields are dropped in order
    sftp: Option<SshSftp>,
    session: Option<SshSession>,
    wrkdir: PathBuf,
    opts: SshOpts,
}

impl SftpFs {
    /// Creates a new `SftpFs`
    pub fn new(opts: SshOpts) -> Self {
        Self {
            sftp: None,
            session: None,
            wrkdir: PathBuf::from("/"),
            opts,
        }
    }

    /// Get sftp subsystem, if connected
    fn check_connection(&self) -> RemoteResult<&SshSftp> {
        match self.sftp.as_ref() {
            Some(sftp) if self.is_connected() => Ok(sftp),
            _ => Err(RemoteError::new(RemoteErrorType::NotConnected)),
        }
    }

    /// Make an absolute path out of `p`, relative to the working directory
    fn absolutize(&self, p: &Path) -> PathBuf {
        self.wrkdir.join(p)
    }

    /// Make a `File` from the path and the `FileStat` returned by the server
    fn make_file(path: PathBuf, metadata: FileStat, symlink: Option<PathBuf>) -> File {
        let file_type = if metadata.file_type().is_symlink() {
            FileType::Symlink
        } else if metadata.is_dir() {
            FileType::Directory
        } else {
            FileType::File
        };
        let metadata = Metadata {
            file_type,
            size: metadata.size.unwrap_or(0),
            mode: metadata.perm.map(Mode::from),
            symlink,
        };
        File { path, metadata }
    }
}

/// Map a failed stat to `NoSuchFileOrDirectory` or to `fallback`
fn stat_error(err: ssh2::Error, path: &Path, fallback: RemoteErrorType) -> RemoteError {
    let kind = match err.code() {
        ErrorCode::SFTP(SFTP_NO_SUCH_FILE) => RemoteErrorType::NoSuchFileOrDirectory,
        _ => fallback,
    };
    RemoteError::new_ex(kind, format!("{}: {}", path.display(), err))
}

impl RemoteFs for SftpFs {
    fn connect(&mut self) -> RemoteResult<Welcome> {
        if self.is_connected() {
            return Err(RemoteError::new(RemoteErrorType::AlreadyConnected));
        }
        debug!("Initializing SFTP connection...");
        let session = commons::connect(&self.opts)?;
        let banner: Option<String> = session.banner().map(String::from);
        debug!(
            "Connection established: {}",
            banner.as_deref().unwrap_or("")
        );
        debug!("Starting sftp subsystem...");
        let sftp = match session.sftp() {
            Ok(s) => s,
            Err(err) => {
                error!("Could not start sftp subsystem: {}", err);
                return Err(RemoteError::new_ex(RemoteErrorType::SubsystemError, err));
            }
        };
        // Get working directory
        self.wrkdir = match sftp.realpath(Path::new(".")) {
            Ok(p) => p,
            Err(err) => {
                warn!("Could not resolve working directory: {}", err);
                PathBuf::from("/")
            }
        };
        self.sftp = Some(sftp);
        self.session = Some(session);
        info!(
            "Connection established; working directory: {}",
            self.wrkdir.display()
        );
        Ok(Welcome {
            banner,
            wrkdir: self.wrkdir.clone(),
        })
    }

    fn disconnect(&mut self) -> RemoteResult<()> {
        debug!("Disconnecting from remote...");
        // release the subsystem first
        self.sftp = None;
        match self.session.take() {
            Some(session) => session
                .disconnect(None, "Mandi!", None)
                .map_err(|err| RemoteError::new_ex(RemoteErrorType::ConnectionError, err)),
            None => Err(RemoteError::new(RemoteErrorType::NotConnected)),
        }
    }

    fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .map(|x| x.authenticated())
            .unwrap_or(false)
    }

    fn list_dir(&mut self, path: &Path) -> RemoteResult<Vec<File>> {
        let path = self.absolutize(path);
        let sftp = self.check_connection()?;
        debug!("Reading directory content of {}", path.display());
        let entries = sftp.readdir(path.as_path()).map_err(|err| {
            stat_error(err, path.as_path(), RemoteErrorType::CouldNotOpenFile)
        })?;
        // `.` and `..` are already filtered out by libssh2
        Ok(entries
            .into_iter()
            .map(|(p, metadata)| {
                let symlink = match metadata.file_type().is_symlink() {
                    true => sftp.readlink(p.as_path()).ok(),
                    false => None,
                };
                Self::make_file(p, metadata, symlink)
            })
            .collect())
    }

    fn stat(&mut self, path: &Path) -> RemoteResult<File> {
        let path = self.absolutize(path);
        let sftp = self.check_connection()?;
        debug!("Stat {}", path.display());
        let metadata = sftp
            .stat(path.as_path())
            .map_err(|err| stat_error(err, path.as_path(), RemoteErrorType::StatFailed))?;
        Ok(Self::make_file(path, metadata, None))
    }

    fn lstat(&mut self, path: &Path) -> RemoteResult<File> {
        let path = self.absolutize(path);
        let sftp = self.check_connection()?;
        debug!("Lstat {}", path.display());
        let metadata = sftp
            .lstat(path.as_path())
            .map_err(|err| stat_error(err, path.as_path(), RemoteErrorType::StatFailed))?;
        let symlink = match metadata.file_type().is_symlink() {
            true => sftp.readlink(path.as_path()).ok(),
            false => None,
        };
        Ok(Self::make_file(path, metadata, symlink))
    }

    fn remove_file(&mut self, path: &Path) -> RemoteResult<()> {
        let path = self.absolutize(path);
        let sftp = self.check_connection()?;
        debug!("Removing file {}", path.display());
        sftp.unlink(path.as_path()).map_err(|err| {
            error!("Could not remove {}: {}", path.display(), err);
            RemoteError::new_ex(
                RemoteErrorType::CouldNotRemoveFile,
                format!("{}: {}", path.display(), err),
            )
        })
    }

    fn create(&mut self, path: &Path) -> RemoteResult<WriteStream> {
        let path = self.absolutize(path);
        let sftp = self.check_connection()?;
        debug!("Creating file {}", path.display());
        match sftp.open_mode(
            path.as_path(),
            OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::TRUNCATE,
            0o644,
            OpenType::File,
        ) {
            Ok(file) => Ok(WriteStream::new(file)),
            Err(err) => {
                error!("Could not create {}: {}", path.display(), err);
                Err(RemoteError::new_ex(
                    RemoteErrorType::FileCreateDenied,
                    format!("{}: {}", path.display(), err),
                ))
            }
        }
    }

    fn open(&mut self, path: &Path) -> RemoteResult<ReadStream> {
        let path = self.absolutize(path);
        let sftp = self.check_connection()?;
        debug!("Opening file {} for read", path.display());
        match sftp.open(path.as_path()) {
            Ok(file) => Ok(ReadStream::new(file)),
            Err(err) => {
                error!("Could not open {}: {}", path.display(), err);
                Err(RemoteError::new_ex(
                    RemoteErrorType::CouldNotOpenFile,
                    format!("{}: {}", path.display(), err),
                ))
            }
        }
    }
}

impl Drop for SftpFs {
    fn drop(&mut self) {
        if self.session.is_some() {
            if let Err(err) = self.disconnect() {
                warn!("Could not disconnect from remote: {}", err);
            }
        }
    }
}
