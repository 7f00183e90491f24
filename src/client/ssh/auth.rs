//! ## Auth
//!
//! resolves and tries the ssh authentication methods

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
use crate::{RemoteError, RemoteErrorType, RemoteResult};

use ssh2::Session;
use std::fmt;
use std::path::{Path, PathBuf};

/// A method to authenticate on the ssh server with
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMethod {
    /// Authenticate with the identities held by the ssh agent listening at this socket
    Agent(PathBuf),
    /// Authenticate with password
    Password(String),
}

impl fmt::Debug for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Agent(socket) => f.debug_tuple("Agent").field(socket).finish(),
            Self::Password(_) => f.debug_tuple("Password").field(&"********").finish(),
        }
    }
}

/// Build the ordered list of authentication methods to try.
///
/// The agent comes first, if its socket accepts a connection; then the password, if not empty.
/// The returned list may be empty.
pub fn resolve_auth_methods(
    agent_socket: Option<&Path>,
    password: Option<&str>,
) -> Vec<AuthMethod> {
    let mut methods = Vec::with_capacity(2);
    if let Some(socket) = agent_socket {
        if agent_reachable(socket) {
            debug!("ssh agent is listening at {}", socket.display());
            methods.push(AuthMethod::Agent(socket.to_path_buf()));
        } else {
            debug!("ssh agent at {} is not reachable", socket.display());
        }
    }
    if let Some(password) = password.filter(|x| !x.is_empty()) {
        methods.push(AuthMethod::Password(password.to_string()));
    }
    methods
}

/// Whether the agent socket accepts connections. The test connection is closed before returning
#[cfg(target_family = "unix")]
fn agent_reachable(socket: &Path) -> bool {
    use std::net::Shutdown;
    use std::os::unix::net::UnixStream;

    match UnixStream::connect(socket) {
        Ok(stream) => {
            let _ = stream.shutdown(Shutdown::Both);
            true
        }
        Err(err) => {
            trace!("agent socket unreachable: {}", err);
            false
        }
    }
}

#[cfg(not(target_family = "unix"))]
fn agent_reachable(_socket: &Path) -> bool {
    false
}

/// Try `methods` in order until the session is authenticated.
/// Fails with `AuthenticationFailed` if the list is empty or no method succeeds.
pub(crate) fn authenticate(
    session: &Session,
    username: &str,
    methods: &[AuthMethod],
) -> RemoteResult<()> {
    if methods.is_empty() {
        error!("No authentication method available");
        return Err(RemoteError::new_ex(
            RemoteErrorType::AuthenticationFailed,
            "no authentication method available (no ssh agent and no password)",
        ));
    }
    let mut last_error = None;
    for method in methods.iter() {
        let result = match method {
            AuthMethod::Agent(socket) => {
                debug!(
                    "Authenticating with username '{}' and ssh agent at {}",
                    username,
                    socket.display()
                );
                session_auth_with_agent(session, username)
            }
            AuthMethod::Password(password) => {
                debug!("Authenticating with username '{}' and password", username);
                session
                    .userauth_password(username, password)
                    .map_err(|e| e.to_string())
            }
        };
        match result {
            Ok(()) if session.authenticated() => {
                debug!("Authenticated with {:?}", method);
                return Ok(());
            }
            Ok(()) => last_error = Some(format!("{:?}: not authenticated", method)),
            Err(err) => {
                warn!("Authentication with {:?} failed: {}", method, err);
                last_error = Some(err);
            }
        }
    }
    error!("Authentication failed");
    Err(RemoteError::new_ex(
        RemoteErrorType::AuthenticationFailed,
        last_error.unwrap_or_default(),
    ))
}

/// Try every identity held by the agent. The agent connection is closed before returning
fn session_auth_with_agent(session: &Session, username: &str) -> Result<(), String> {
    let mut agent = session.agent().map_err(|e| e.to_string())?;
    agent.connect().map_err(|e| e.to_string())?;
    let result = agent
        .list_identities()
        .and_then(|_| agent.identities())
        .map_err(|e| e.to_string())
        .and_then(|identities| {
            for identity in identities.iter() {
                trace!("Trying agent identity '{}'", identity.comment());
                if agent.userauth(username, identity).is_ok() {
                    return Ok(());
                }
            }
            Err(String::from("no agent identity was accepted"))
        });
    if let Err(err) = agent.disconnect() {
        warn!("Could not disconnect from ssh agent: {}", err);
    }
    result
}
