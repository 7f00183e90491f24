//! ## Ssh mock
//!
//! fixtures for the ssh client: configuration file and agent socket

use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

// -- config file

/// Ssh configuration with global defaults and a `sftp` alias for the test server
pub fn ssh_config_fixture() -> NamedTempFile {
    let mut temp = NamedTempFile::new().expect("Failed to create tempfile");
    let config = r##"
# global defaults

Compression yes
ConnectionAttempts  3
ConnectTimeout      60

Ciphers             aes128-ctr,aes192-ctr,aes256-ctr
KexAlgorithms       diffie-hellman-group-exchange-sha256
MACs                hmac-sha2-512,hmac-sha2-256,hmac-ripemd160

# test server

Host sftp
    HostName    127.0.0.1
    Port        10022
    User        sftp
"##;
    temp.write_all(config.as_bytes()).unwrap();
    temp
}

// -- agent

/// A listening unix socket standing in for a running ssh agent.
/// The socket is removed when the mock is dropped.
pub struct MockAgent {
    #[cfg(target_family = "unix")]
    _listener: std::os::unix::net::UnixListener,
    dir: TempDir,
}

impl MockAgent {
    #[cfg(target_family = "unix")]
    pub fn start() -> Self {
        let dir = TempDir::new().expect("Failed to create tempdir");
        let listener = std::os::unix::net::UnixListener::bind(dir.path().join("agent.sock"))
            .expect("Failed to bind agent socket");
        Self {
            _listener: listener,
            dir,
        }
    }

    /// Path of the agent socket
    pub fn socket(&self) -> PathBuf {
        self.dir.path().join("agent.sock")
    }
}

/// A socket path nobody listens to
pub fn dead_agent_socket(dir: &Path) -> PathBuf {
    dir.join("dead-agent.sock")
}
