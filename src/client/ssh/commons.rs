//! ## Commons
//!
//! SSH2 session establishment

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
use super::{auth, config::Config, SshOpts};
use crate::{RemoteError, RemoteErrorType, RemoteResult};

use ssh2::{MethodType, Session};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};

/// Establish the ssh session described by `opts` and authenticate it
pub fn connect(opts: &SshOpts) -> RemoteResult<Session> {
    let config = Config::try_from(opts)?;
    // credentials are resolved before dialing
    let methods = auth::resolve_auth_methods(opts.agent_socket.as_deref(), opts.password.as_deref());
    debug!(
        "Connecting to {} as '{}' ({} authentication methods)",
        config.address,
        config.username,
        methods.len()
    );
    let stream = open_stream(&config)?;
    let mut session = Session::new().map_err(|err| {
        error!("Could not create ssh session: {}", err);
        RemoteError::new_ex(RemoteErrorType::ConnectionError, err)
    })?;
    session.set_tcp_stream(stream);
    set_algo_prefs(&mut session, &config)?;
    session.handshake().map_err(|err| {
        error!("Ssh handshake with {} failed: {}", config.address, err);
        RemoteError::new_ex(RemoteErrorType::ProtocolError, err)
    })?;
    auth::authenticate(&session, config.username.as_str(), &methods)?;
    Ok(session)
}

/// Dial every address `config.address` resolves to, for `config.connection_attempts` rounds;
/// the first stream established is returned
fn open_stream(config: &Config) -> RemoteResult<TcpStream> {
    let addresses: Vec<SocketAddr> = config
        .address
        .to_socket_addrs()
        .map_err(|err| {
            error!("Could not resolve {}: {}", config.address, err);
            RemoteError::new_ex(
                RemoteErrorType::BadAddress,
                format!("{}: {}", config.address, err),
            )
        })?
        .collect();
    for attempt in 1..=config.connection_attempts {
        for address in addresses.iter() {
            trace!(
                "Dialing {} (attempt {}/{}, timeout {}s)",
                address,
                attempt,
                config.connection_attempts,
                config.connection_timeout.as_secs()
            );
            match TcpStream::connect_timeout(address, config.connection_timeout) {
                Ok(stream) => {
                    debug!("Connected to {}", address);
                    return Ok(stream);
                }
                Err(err) => trace!("Could not connect to {}: {}", address, err),
            }
        }
    }
    error!("Could not connect to {}", config.address);
    Err(RemoteError::new_ex(
        RemoteErrorType::ConnectionError,
        format!("unable to connect to [{}]", config.address),
    ))
}

/// Apply compression and the algorithm lists of the ssh configuration to `session`
fn set_algo_prefs(session: &mut Session, config: &Config) -> RemoteResult<()> {
    let params = &config.params;
    if let Some(compress) = params.compression {
        trace!("Compression: {}", compress);
        session.set_compress(compress);
    }
    let prefs: [(&str, &[String], &[MethodType]); 4] = [
        (
            "KEX",
            params.kex_algorithms.as_deref().unwrap_or_default(),
            &[MethodType::Kex],
        ),
        (
            "host key",
            params.host_key_algorithms.as_deref().unwrap_or_default(),
            &[MethodType::HostKey],
        ),
        (
            "crypt",
            params.ciphers.as_deref().unwrap_or_default(),
            &[MethodType::CryptCs, MethodType::CryptSc],
        ),
        (
            "MAC",
            params.mac.as_deref().unwrap_or_default(),
            &[MethodType::MacCs, MethodType::MacSc],
        ),
    ];
    for (name, algos, method_types) in prefs.iter() {
        if algos.is_empty() {
            continue;
        }
        let algos = algos.join(",");
        trace!("Configuring {} algorithms: {}", name, algos);
        for method_type in method_types.iter() {
            if let Err(err) = session.method_pref(*method_type, algos.as_str()) {
                error!("Could not set {} algorithms: {}", name, err);
                return Err(RemoteError::new_ex(RemoteErrorType::ProtocolError, err));
            }
        }
    }
    Ok(())
}
