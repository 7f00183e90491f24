//! ## Config
//!
//! merges the ssh options with the ssh configuration file

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
use super::SshOpts;
use crate::{RemoteError, RemoteErrorType, RemoteResult};

use ssh2_config::{HostParams, SshConfig};
use std::fs::File;
use std::io::BufReader;
use std::net::Ipv6Addr;
use std::path::Path;
use std::time::Duration;

const DEFAULT_PORT: u16 = 22;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection parameters, once the options have been merged with the configuration file
pub struct Config {
    /// Host block matching the target; default when there's no configuration file
    pub params: HostParams,
    pub host: String,
    /// `host:port`, ready to be resolved
    pub address: String,
    /// Options first, then the configuration file, then the default username;
    /// empty if none sets one
    pub username: String,
    pub connection_timeout: Duration,
    /// At least 1
    pub connection_attempts: usize,
}

impl TryFrom<&SshOpts> for Config {
    type Error = RemoteError;

    fn try_from(opts: &SshOpts) -> Result<Self, Self::Error> {
        let params = match opts.config_file.as_deref() {
            Some(p) => read_host_params(p, opts.host.as_str())?,
            None => HostParams::default(),
        };
        let host = params
            .host_name
            .clone()
            .unwrap_or_else(|| opts.host.clone());
        let port = opts.port.or(params.port).unwrap_or(DEFAULT_PORT);
        let username = opts
            .username
            .clone()
            .or_else(|| params.user.clone())
            .or_else(|| opts.default_username.clone())
            .unwrap_or_default();
        let connection_timeout = opts
            .connection_timeout
            .or(params.connect_timeout)
            .unwrap_or(DEFAULT_CONNECTION_TIMEOUT);
        let connection_attempts = params.connection_attempts.unwrap_or(1).max(1);
        Ok(Self {
            address: socket_address(host.as_str(), port),
            host,
            username,
            connection_timeout,
            connection_attempts,
            params,
        })
    }
}

/// Read the configuration file at `p` and return the parameters for `host`
fn read_host_params(p: &Path, host: &str) -> RemoteResult<HostParams> {
    trace!("Reading ssh configuration at {}", p.display());
    let file = File::open(p).map_err(|e| {
        RemoteError::new_ex(
            RemoteErrorType::IoError,
            format!("could not open {}: {}", p.display(), e),
        )
    })?;
    let config = SshConfig::default()
        .parse(&mut BufReader::new(file))
        .map_err(|e| {
            RemoteError::new_ex(
                RemoteErrorType::IoError,
                format!("could not parse {}: {}", p.display(), e),
            )
        })?;
    Ok(config.query(host))
}

/// `host:port`; IPv6 literals are bracketed, a host already carrying a port is kept as is
fn socket_address(host: &str, port: u16) -> String {
    if host.parse::<Ipv6Addr>().is_ok() {
        format!("[{}]:{}", host, port)
    } else if host.contains(':') {
        host.to_string()
    } else {
        format!("{}:{}", host, port)
    }
}
