//! # sftpctl
//!
//! list, fetch, put, stat or remove a file on a remote host over SFTP

#[macro_use]
extern crate log;

use sftpctl::cli::{Args, Command, Environment};
use sftpctl::client::ssh::SftpFs;
use sftpctl::dispatcher;
use sftpctl::error::Result;

use env_logger::{Builder, Env};
use std::io;
use std::path::Path;

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|x| Path::new(x).file_name())
        .map(|x| x.to_string_lossy().to_string())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
}

fn run(args: Args) -> Result<()> {
    let command = Command::parse(program_name().as_str(), &args.args)?;
    let env = Environment::from_env();
    let mut client = SftpFs::from(args.ssh_opts(&env));
    let stdin = io::stdin();
    let stdout = io::stdout();
    dispatcher::run(
        &mut client,
        &command,
        &mut stdin.lock(),
        &mut stdout.lock(),
    )?;
    Ok(())
}

fn main() {
    Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args: Args = argh::from_env();
    if let Err(err) = run(args) {
        error!("{}", err);
        std::process::exit(1);
    }
}
