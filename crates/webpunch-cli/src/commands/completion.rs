use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Shell};
use std::io;

/// Write a completion script for the given shell to stdout.
pub fn execute(shell: Shell, cmd: &mut Command) -> Result<()> {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, &mut io::stdout());
    Ok(())
}
