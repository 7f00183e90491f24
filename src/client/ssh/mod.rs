//! ## SSH
//!
//! implements the file transfer over the SFTP subsystem of an SSH session

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
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod auth;
mod commons;
pub(crate) mod config;
mod sftp;

pub use auth::{resolve_auth_methods, AuthMethod};
pub use commons::connect;
pub use sftp::SftpFs;

/// Where to connect and which credentials to offer.
///
/// When an ssh configuration file is set, its `Host` block matching `host` is applied
/// first; every option set here wins over the file.
#[derive(Clone, Default)]
pub struct SshOpts {
    pub(crate) host: String,
    pub(crate) port: Option<u16>,
    pub(crate) username: Option<String>,
    pub(crate) default_username: Option<String>,
    pub(crate) password: Option<String>,
    pub(crate) connection_timeout: Option<Duration>,
    pub(crate) config_file: Option<PathBuf>,
    pub(crate) agent_socket: Option<PathBuf>,
}

impl SshOpts {
    /// Target `host`; may be an alias resolved by the ssh configuration file
    pub fn new<S: AsRef<str>>(host: S) -> Self {
        Self {
            host: host.as_ref().to_string(),
            ..Self::default()
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn username<S: AsRef<str>>(mut self, username: S) -> Self {
        self.username = Some(username.as_ref().to_string());
        self
    }

    /// Username used when neither `username` nor the configuration file sets one
    pub fn default_username<S: AsRef<str>>(mut self, username: S) -> Self {
        self.default_username = Some(username.as_ref().to_string());
        self
    }

    pub fn password<S: AsRef<str>>(mut self, password: S) -> Self {
        self.password = Some(password.as_ref().to_string());
        self
    }

    /// Timeout of each TCP connection attempt (default 30 seconds)
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = Some(timeout);
        self
    }

    /// OpenSSH client configuration to read on connect.
    ///
    /// Applied keys: HostName, Port, User, ConnectTimeout, ConnectionAttempts,
    /// Compression, Ciphers, MACs, KexAlgorithms, HostKeyAlgorithms
    pub fn config_file<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.config_file = Some(p.as_ref().to_path_buf());
        self
    }

    /// Socket of the ssh agent.
    ///
    /// libssh2 talks to the agent through `SSH_AUTH_SOCK`; this socket is only checked
    /// to decide whether the agent is worth trying.
    pub fn agent_socket<P: AsRef<Path>>(mut self, p: P) -> Self {
        self.agent_socket = Some(p.as_ref().to_path_buf());
        self
    }

    pub fn host(&self) -> &str {
        self.host.as_str()
    }
}

impl fmt::Debug for SshOpts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SshOpts")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("default_username", &self.default_username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("connection_timeout", &self.connection_timeout)
            .field("config_file", &self.config_file)
            .field("agent_socket", &self.agent_socket)
            .finish()
    }
}

impl From<SshOpts> for SftpFs {
    fn from(opts: SshOpts) -> Self {
        SftpFs::new(opts)
    }
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::RemoteFs;

    use pretty_assertions::assert_eq;

    #[test]
    fn should_only_set_host() {
        let opts = SshOpts::new("localhost");
        assert_eq!(opts.host(), "localhost");
        assert!(opts.port.is_none());
        assert!(opts.username.is_none());
        assert!(opts.default_username.is_none());
        assert!(opts.password.is_none());
        assert!(opts.connection_timeout.is_none());
        assert!(opts.config_file.is_none());
        assert!(opts.agent_socket.is_none());
    }

    #[test]
    fn should_set_every_option() {
        let opts = SshOpts::new("example.com")
            .port(2022)
            .username("omar")
            .default_username("root")
            .password("qwerty123")
            .connection_timeout(Duration::from_secs(5))
            .config_file("/home/omar/.ssh/config")
            .agent_socket("/tmp/ssh-agent.sock");
        assert_eq!(opts.port, Some(2022));
        assert_eq!(opts.username.as_deref(), Some("omar"));
        assert_eq!(opts.default_username.as_deref(), Some("root"));
        assert_eq!(opts.password.as_deref(), Some("qwerty123"));
        assert_eq!(opts.connection_timeout, Some(Duration::from_secs(5)));
        assert_eq!(
            opts.config_file.as_deref(),
            Some(Path::new("/home/omar/.ssh/config"))
        );
        assert_eq!(
            opts.agent_socket.as_deref(),
            Some(Path::new("/tmp/ssh-agent.sock"))
        );
    }

    #[test]
    fn should_hide_password_in_debug() {
        let opts = SshOpts::new("example.com").password("qwerty123");
        let debug = format!("{:?}", opts);
        assert!(debug.contains("example.com"));
        assert!(!debug.contains("qwerty123"));
    }

    #[test]
    fn should_build_disconnected_client() {
        let client: SftpFs = SshOpts::new("localhost").into();
        assert!(!client.is_connected());
    }
}
