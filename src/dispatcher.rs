//! ## Dispatcher
//!
//! runs a `Command` against a connected `RemoteFs`

use crate::cli::Command;
use crate::fs::{RemoteError, RemoteErrorType, RemoteFs, RemoteResult};

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Runs commands on `client`, reading uploads from `input` and writing results to `output`
pub struct Dispatcher<'a, F: RemoteFs> {
    client: &'a mut F,
    input: &'a mut dyn Read,
    output: &'a mut dyn Write,
}

/// Connect `client`, run `command` and disconnect.
/// The client is disconnected whatever the outcome of the command
pub fn run<F: RemoteFs>(
    client: &mut F,
    command: &Command,
    input: &mut dyn Read,
    output: &mut dyn Write,
) -> RemoteResult<()> {
    let welcome = client.connect()?;
    if let Some(banner) = welcome.banner.as_deref() {
        debug!("{}", banner);
    }
    let result = Dispatcher::new(client, input, output).dispatch(command);
    if let Err(err) = client.disconnect() {
        warn!("Could not disconnect: {}", err);
    }
    result
}

fn io_error(err: io::Error) -> RemoteError {
    RemoteError::new_ex(RemoteErrorType::IoError, err)
}

/// Spell `walked` the way the user spelled the walk root: `walked` is rebased from `base`,
/// the resolved root, onto `root`, the path given on the command line
fn display_path(root: &Path, base: &Path, walked: &Path) -> PathBuf {
    match walked.strip_prefix(base) {
        Ok(rel) if rel.as_os_str().is_empty() => root.to_path_buf(),
        Ok(rel) => root.join(rel),
        Err(_) => walked.to_path_buf(),
    }
}

impl<'a, F: RemoteFs> Dispatcher<'a, F> {
    pub fn new(client: &'a mut F, input: &'a mut dyn Read, output: &'a mut dyn Write) -> Self {
        Self {
            client,
            input,
            output,
        }
    }

    /// Run `command`
    pub fn dispatch(&mut self, command: &Command) -> RemoteResult<()> {
        debug!(
            "Running {} on {}",
            command.name(),
            command.remote_path().display()
        );
        match command {
            Command::List(p) => self.list(p).map(|_| ()),
            Command::Fetch(p) => self.fetch(p).map(|_| ()),
            Command::Put(p) => self.put(p).map(|_| ()),
            Command::Stat(p) => self.stat(p),
            Command::Remove(p) => self.remove(p),
        }
    }

    /// Print every path under `path`, one per line, prefixed by `path` as given.
    /// A directory which can't be listed is printed, then its error is logged and counted;
    /// returns how many errors were met
    pub fn list(&mut self, path: &Path) -> RemoteResult<usize> {
        let mut skipped = 0;
        // the walk yields the resolved root first
        let mut base: Option<PathBuf> = None;
        for entry in self.client.walk(path) {
            match entry {
                Ok(file) => {
                    let base = base.get_or_insert_with(|| file.path().to_path_buf());
                    let shown = display_path(path, base, file.path());
                    writeln!(self.output, "{}", shown.display()).map_err(io_error)?;
                }
                Err(err) => {
                    warn!("{}", err);
                    skipped += 1;
                }
            }
        }
        self.output.flush().map_err(io_error)?;
        Ok(skipped)
    }

    /// Copy the remote file at `path` to output; returns the amount of bytes copied
    pub fn fetch(&mut self, path: &Path) -> RemoteResult<u64> {
        let mut reader = self.client.open(path)?;
        io::copy(&mut reader, &mut *self.output).map_err(io_error)?;
        self.output.flush().map_err(io_error)?;
        debug!("fetched {} bytes from {}", reader.bytes(), path.display());
        Ok(reader.bytes())
    }

    /// Copy input to the remote file at `path`; returns the amount of bytes copied
    pub fn put(&mut self, path: &Path) -> RemoteResult<u64> {
        let mut writer = self.client.create(path)?;
        io::copy(&mut *self.input, &mut writer).map_err(io_error)?;
        writer.flush().map_err(io_error)?;
        debug!("put {} bytes to {}", writer.bytes(), path.display());
        Ok(writer.bytes())
    }

    /// Print `<name> <size> <mode>` of the file at `path`
    pub fn stat(&mut self, path: &Path) -> RemoteResult<()> {
        let file = self.client.stat(path)?;
        writeln!(
            self.output,
            "{} {} {}",
            file.name(),
            file.metadata().size,
            file.metadata().mode_string()
        )
        .map_err(io_error)?;
        self.output.flush().map_err(io_error)
    }

    /// Remove the file at `path`
    pub fn remove(&mut self, path: &Path) -> RemoteResult<()> {
        self.client.remove_file(path)
    }
}
