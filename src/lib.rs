#![crate_name = "sftpctl"]
#![crate_type = "lib"]

//! # sftpctl
//!
//! sftpctl is a small command line client to operate on a remote host over SFTP.
//! It connects to an ssh server, authenticates with the ssh agent or a password,
//! opens the sftp subsystem and runs exactly one of these commands:
//!
//! - `ls <path>`: walk the tree at path and print every entry, one per line
//! - `fetch <path>`: write the content of the remote file to stdout
//! - `put <path>`: write stdin to the remote file, creating or truncating it
//! - `stat <path>`: print name, size and mode of the remote file
//! - `rm <path>`: remove the remote file
//!
//! ## Usage
//!
//! ```sh
//! sftpctl --host example.com --user omar ls /var/log
//! echo "hello" | SFTPCTL_PASSWORD=secret sftpctl --host example.com put /tmp/hello.txt
//! ```
//!
//! ## Library
//!
//! The client is also usable as a library, through the `RemoteFs` trait:
//!
//! ```rust,ignore
//! use sftpctl::RemoteFs;
//! use sftpctl::client::ssh::{SftpFs, SshOpts};
//! use std::path::Path;
//!
//! let mut client: SftpFs = SshOpts::new("127.0.0.1")
//!     .port(22)
//!     .username("test")
//!     .password("password")
//!     .into();
//!
//! // connect
//! assert!(client.connect().is_ok());
//! // walk the tree
//! for entry in client.walk(Path::new("/tmp")) {
//!     println!("{}", entry.ok().unwrap().path().display());
//! }
//! // disconnect
//! assert!(client.disconnect().is_ok());
//! ```
//!

#![doc(html_playground_url = "https://play.rust-lang.org")]

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
// -- crates
#[macro_use]
extern crate log;

// -- export
pub use fs::{File, RemoteError, RemoteErrorType, RemoteFs, RemoteResult};
// -- modules
pub mod cli;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod fs;

// -- mock
#[cfg(test)]
pub(crate) mod mock;
