//! ## Cli
//!
//! command line arguments and subcommand parsing

use crate::client::ssh::SshOpts;

use argh::FromArgs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the default password
pub const PASSWORD_ENV: &str = "SFTPCTL_PASSWORD";
/// Environment variable holding the ssh agent socket
pub const AGENT_SOCKET_ENV: &str = "SSH_AUTH_SOCK";

#[derive(FromArgs, Debug)]
/// List, fetch, put, stat or remove files on a remote host over SFTP.
///
/// Subcommands: ls <path>, fetch <path>, put <path>, stat <path>, rm <path>
pub struct Args {
    /// ssh username (default: User from --config, then current user)
    #[argh(option)]
    pub user: Option<String>,
    /// ssh server hostname
    #[argh(option, default = "String::from(\"localhost\")")]
    pub host: String,
    /// ssh server port (default: Port from --config, then 22)
    #[argh(option)]
    pub port: Option<u16>,
    /// ssh password (default: $SFTPCTL_PASSWORD)
    #[argh(option)]
    pub pass: Option<String>,
    /// ssh configuration file to resolve the host with
    #[argh(option)]
    pub config: Option<PathBuf>,
    /// connection timeout in seconds
    #[argh(option)]
    pub timeout: Option<u64>,
    /// subcommand followed by the remote path
    #[argh(positional)]
    pub args: Vec<String>,
}

/// Values read from the process environment, used as defaults for the options
#[derive(Debug, Default, Clone)]
pub struct Environment {
    pub user: Option<String>,
    pub password: Option<String>,
    pub agent_socket: Option<PathBuf>,
}

impl Environment {
    /// Read defaults from the current process
    pub fn from_env() -> Self {
        Self {
            user: current_username(),
            password: std::env::var(PASSWORD_ENV).ok(),
            agent_socket: std::env::var_os(AGENT_SOCKET_ENV).map(PathBuf::from),
        }
    }
}

#[cfg(target_family = "unix")]
fn current_username() -> Option<String> {
    users::get_current_username()
        .map(|x| x.to_string_lossy().to_string())
        .or_else(|| std::env::var("USER").ok())
}

#[cfg(not(target_family = "unix"))]
fn current_username() -> Option<String> {
    std::env::var("USERNAME").ok()
}

impl Args {
    /// Build the connection target, falling back to `env` for the missing options.
    /// The current user only applies if the configuration file doesn't set `User` either
    pub fn ssh_opts(&self, env: &Environment) -> SshOpts {
        let mut opts = SshOpts::new(self.host.as_str());
        if let Some(port) = self.port {
            opts = opts.port(port);
        }
        if let Some(user) = self.user.as_ref() {
            opts = opts.username(user);
        }
        if let Some(user) = env.user.as_ref() {
            opts = opts.default_username(user);
        }
        if let Some(password) = self.pass.as_ref().or(env.password.as_ref()) {
            opts = opts.password(password);
        }
        if let Some(socket) = env.agent_socket.as_deref() {
            opts = opts.agent_socket(socket);
        }
        if let Some(config) = self.config.as_deref() {
            opts = opts.config_file(config);
        }
        if let Some(secs) = self.timeout {
            opts = opts.connection_timeout(Duration::from_secs(secs));
        }
        opts
    }
}

/// Usage errors, detected before connecting
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("subcommand required")]
    MissingSubcommand,
    #[error("{command} {program}: remote path required")]
    MissingRemotePath { command: String, program: String },
    #[error("unknown subcommand: {0}")]
    UnknownSubcommand(String),
}

/// The operation to perform on the remote host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Walk the tree at path, printing every entry
    List(PathBuf),
    /// Write the remote file to stdout
    Fetch(PathBuf),
    /// Write stdin to the remote file
    Put(PathBuf),
    /// Print name, size and mode of the remote file
    Stat(PathBuf),
    /// Remove the remote file
    Remove(PathBuf),
}

impl Command {
    /// Parse the positional arguments: the subcommand and its remote path.
    /// `program` is used to report usage errors only
    pub fn parse<S: AsRef<str>>(program: &str, args: &[S]) -> Result<Self, UsageError> {
        let name = args
            .first()
            .map(|x| x.as_ref())
            .ok_or(UsageError::MissingSubcommand)?;
        let constructor: fn(PathBuf) -> Self = match name {
            "ls" => Self::List,
            "fetch" => Self::Fetch,
            "put" => Self::Put,
            "stat" => Self::Stat,
            "rm" => Self::Remove,
            other => return Err(UsageError::UnknownSubcommand(other.to_string())),
        };
        let path = args
            .get(1)
            .map(|x| PathBuf::from(x.as_ref()))
            .ok_or_else(|| UsageError::MissingRemotePath {
                command: name.to_string(),
                program: program.to_string(),
            })?;
        if args.len() > 2 {
            debug!("ignoring {} extra arguments", args.len() - 2);
        }
        Ok(constructor(path))
    }

    /// Subcommand name
    pub fn name(&self) -> &'static str {
        match self {
            Self::List(_) => "ls",
            Self::Fetch(_) => "fetch",
            Self::Put(_) => "put",
            Self::Stat(_) => "stat",
            Self::Remove(_) => "rm",
        }
    }

    /// Remote path the command operates on
    pub fn remote_path(&self) -> &Path {
        match self {
            Self::List(p) | Self::Fetch(p) | Self::Put(p) | Self::Stat(p) | Self::Remove(p) => {
                p.as_path()
            }
        }
    }
}
