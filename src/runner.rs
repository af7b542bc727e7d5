// Process invocation boundary for the wireguard-tools binaries

//! External command execution
//!
//! Every interaction with `wg` and `wg-quick` goes through the
//! [`CommandRunner`] trait so the rest of the program never touches
//! `std::process` directly and tests can substitute canned output.

use anyhow::{Context, Result};
use std::io::Write;
use std::process::{Command, Stdio};

/// Captured result of one external command.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Everything the command wrote to stdout, lossily decoded.
    pub stdout: String,
    /// Everything the command wrote to stderr, lossily decoded.
    pub stderr: String,
    /// Exit code; -1 when the command was terminated by a signal.
    pub code: i32,
}

impl CommandOutput {
    /// Whether the command exited with code 0.
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs external commands to completion and captures their output.
pub trait CommandRunner {
    /// Run `program` with `args`, blocking until it exits.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Run `program` with `args`, feeding `input` on stdin.
    fn run_with_input(&self, program: &str, args: &[&str], input: &str) -> Result<CommandOutput>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl SystemRunner {
    fn capture(output: std::process::Output) -> CommandOutput {
        CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code().unwrap_or(-1),
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        log::debug!("Running: {} {}", program, args.join(" "));
        let output = Command::new(program)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute {}", program))?;
        Ok(Self::capture(output))
    }

    fn run_with_input(&self, program: &str, args: &[&str], input: &str) -> Result<CommandOutput> {
        log::debug!("Running (with stdin): {} {}", program, args.join(" "));
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to execute {}", program))?;
        child
            .stdin
            .take()
            .with_context(|| format!("No stdin handle for {}", program))?
            .write_all(input.as_bytes())
            .with_context(|| format!("Failed to write to stdin of {}", program))?;
        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for {}", program))?;
        Ok(Self::capture(output))
    }
}
