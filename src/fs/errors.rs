//! ## Errors
//!
//! errors returned by a remote file system

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Error of an operation on the remote host: what went wrong and, optionally, the details
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RemoteError {
    pub kind: RemoteErrorType,
    pub msg: Option<String>,
}

/// What went wrong
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteErrorType {
    #[error("already connected")]
    AlreadyConnected,
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("could not resolve address")]
    BadAddress,
    #[error("connection error")]
    ConnectionError,
    #[error("could not stat file")]
    StatFailed,
    #[error("could not create file")]
    FileCreateDenied,
    #[error("could not open file")]
    CouldNotOpenFile,
    #[error("could not remove file")]
    CouldNotRemoveFile,
    #[error("I/O error")]
    IoError,
    #[error("no such file or directory")]
    NoSuchFileOrDirectory,
    #[error("ssh protocol error")]
    ProtocolError,
    #[error("unable to start sftp subsystem")]
    SubsystemError,
    #[error("not connected")]
    NotConnected,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorType) -> RemoteError {
        RemoteError { kind, msg: None }
    }

    /// Error of kind `kind`, detailed by `msg`
    pub fn new_ex<S: ToString>(kind: RemoteErrorType, msg: S) -> RemoteError {
        RemoteError {
            kind,
            msg: Some(msg.to_string()),
        }
    }
}

/// Renders as `kind (msg)`
impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(msg) = self.msg.as_deref() {
            write!(f, " ({})", msg)?;
        }
        Ok(())
    }
}

impl StdError for RemoteError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.kind)
    }
}
