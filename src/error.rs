//! ## Error
//!
//! top level error of the command line client

use crate::cli::UsageError;
use crate::fs::RemoteError;

use thiserror::Error;

/// Anything that makes the client exit with a failure
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {

    use super::*;
    use crate::fs::RemoteErrorType;

    use pretty_assertions::assert_eq;

    #[test]
    fn should_display_inner_error() {
        let err: Error = UsageError::MissingSubcommand.into();
        assert_eq!(err.to_string().as_str(), "subcommand required");
        let err: Error = RemoteError::new_ex(
            RemoteErrorType::ConnectionError,
            "unable to connect to [localhost:22]",
        )
        .into();
        assert_eq!(
            err.to_string().as_str(),
            "connection error (unable to connect to [localhost:22])"
        );
    }
}
