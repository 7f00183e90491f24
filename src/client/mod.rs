//! ## Client
//!
//! remote file system clients

pub mod ssh;
