//! ## Fs
//!
//! `fs` is the module which provides remote file system entities and the `RemoteFs` trait

mod errors;
mod file;
mod remote;
pub mod stream;
mod walk;

pub use self::errors::{RemoteError, RemoteErrorType, RemoteResult};
pub use self::file::{File, FileType, Metadata, Mode};
pub use self::remote::{RemoteFs, Welcome};
pub use self::stream::{ReadStream, WriteStream};
pub use self::walk::Walk;
