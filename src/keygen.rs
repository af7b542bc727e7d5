// Keypair generation via the wg toolchain

//! WireGuard keypair generation
//!
//! `wg genkey` produces the private key and `wg pubkey` derives the
//! public key from it on stdin. Both files are written with owner-only
//! permissions. Existing files are only replaced after a confirmation,
//! abstracted behind [`ConfirmSource`] so the decision loop can be tested
//! without a terminal.

use crate::runner::CommandRunner;
use crate::types::Settings;
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Attempts before an unintelligible overwrite answer becomes an error.
const MAX_CONFIRM_ATTEMPTS: u32 = 3;

/// Yields one line of operator input per overwrite prompt.
pub trait ConfirmSource {
    /// Show `prompt` and read one line of input.
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// [`ConfirmSource`] reading answers from stdin. The prompt goes to
/// stderr so report output on stdout stays clean.
#[derive(Debug, Default)]
pub struct StdinConfirm;

impl ConfirmSource for StdinConfirm {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        eprint!("{} [y/n]: ", prompt);
        std::io::stderr().flush().context("Failed to flush stderr")?;
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        Ok(line)
    }
}

/// Ask a yes/no question. Accepts y/yes, declines on n/no
/// (case-insensitive, surrounding whitespace ignored); anything else
/// reprompts up to [`MAX_CONFIRM_ATTEMPTS`] times.
fn confirm(source: &mut dyn ConfirmSource, prompt: &str) -> Result<bool> {
    for _ in 0..MAX_CONFIRM_ATTEMPTS {
        let answer = source.ask(prompt)?;
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => eprintln!("Please answer y or n"),
        }
    }
    anyhow::bail!("No usable answer after {} attempts", MAX_CONFIRM_ATTEMPTS)
}

/// Generate a WireGuard keypair into the key files from the settings.
///
/// Each pre-existing key file requires an overwrite confirmation first; a
/// decline aborts the whole operation before any tool invocation. After
/// writing, both files are verified to exist.
pub fn generate_keys(
    runner: &dyn CommandRunner,
    source: &mut dyn ConfirmSource,
    settings: &Settings,
) -> Result<()> {
    let key_files = [&settings.private_key_file, &settings.public_key_file];

    for path in key_files {
        if path.exists() {
            let question = format!("{} already exists. Overwrite?", path.display());
            if !confirm(source, &question)? {
                anyhow::bail!("Aborted: refusing to overwrite {}", path.display());
            }
        }
    }

    let genkey = runner.run("wg", &["genkey"])?;
    if !genkey.success() {
        anyhow::bail!(
            "wg genkey failed with exit code {}: {}",
            genkey.code,
            genkey.stderr.trim()
        );
    }
    let private_key = genkey.stdout.trim();
    if private_key.is_empty() {
        anyhow::bail!("wg genkey produced no output");
    }

    let pubkey = runner.run_with_input("wg", &["pubkey"], &genkey.stdout)?;
    if !pubkey.success() {
        anyhow::bail!(
            "wg pubkey failed with exit code {}: {}",
            pubkey.code,
            pubkey.stderr.trim()
        );
    }
    let public_key = pubkey.stdout.trim();

    write_key_file(&settings.private_key_file, private_key)?;
    write_key_file(&settings.public_key_file, public_key)?;

    for path in key_files {
        if !path.exists() {
            anyhow::bail!("Key file was not created: {}", path.display());
        }
    }

    println!("Wrote private key to {}", settings.private_key_file.display());
    println!("Wrote public key to {}", settings.public_key_file.display());
    Ok(())
}

/// Write `key` newline-terminated with owner-only permissions.
fn write_key_file(path: &Path, key: &str) -> Result<()> {
    fs::write(path, format!("{}\n", key))
        .with_context(|| format!("Failed to write key file {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = fs::Permissions::from_mode(0o600);
        fs::set_permissions(path, permissions)
            .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}
