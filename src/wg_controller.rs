// Bulk tunnel lifecycle via wg-quick

//! Bulk start/kill of WireGuard tunnels
//!
//! Both operations work from the scanned configs and the active peer
//! listing; the exception lists from the settings file veto individual
//! tunnels. `wg-quick` is always invoked with a tunnel's short name,
//! never with a path, and only after the name passes validation.

use crate::peers;
use crate::runner::CommandRunner;
use crate::types::{ActivePeer, TunnelConfig};
use anyhow::Result;

/// Validates that a tunnel short name is safe to pass to wg-quick.
/// Only allows alphanumeric characters, hyphens, and underscores.
fn validate_short_name(name: &str) -> Result<()> {
    if name.is_empty() {
        anyhow::bail!("Tunnel short name cannot be empty");
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        anyhow::bail!(
            "Tunnel short name contains invalid characters: '{}'. Only alphanumeric, hyphens, and underscores are allowed",
            name
        );
    }

    Ok(())
}

/// Bring up every tunnel that has a config but no active peer.
///
/// Configs whose public key is already present among the active peers are
/// reported as already started; configs named in `exceptions` are skipped
/// without being invoked. A `wg-quick up` that exits non-zero is reported
/// and the batch continues; failing to dispatch the command at all is
/// fatal and propagates.
pub fn start_all(
    runner: &dyn CommandRunner,
    configs: &[TunnelConfig],
    active: &[ActivePeer],
    exceptions: &[String],
) -> Result<()> {
    println!("\n=== Start all tunnels ===");

    // Coarse shortcut: an active-peer count at or above the config count
    // is treated as everything already running, without per-config
    // inspection.
    if active.len() >= configs.len() {
        println!("\nAll tunnels are already started");
    } else {
        for config in configs {
            if exceptions.iter().any(|name| name == &config.file_name) {
                println!("Skipping start-excepted tunnel: {}", config.file_name);
                continue;
            }
            if peers::contains_public_key(active, &config.public_key) {
                println!("Tunnel for file is already started: {}", config.file_name);
                continue;
            }
            if let Err(err) = validate_short_name(config.short_name()) {
                println!("Not starting {}: {}", config.file_name, err);
                continue;
            }

            println!("\nStarting tunnel: {}", config.short_name());
            let output = runner.run("wg-quick", &["up", config.short_name()])?;
            if !output.success() {
                println!(
                    "Failed to start {}: wg-quick exited with code {}",
                    config.short_name(),
                    output.code
                );
                let stderr = output.stderr.trim();
                if !stderr.is_empty() {
                    log::debug!("wg-quick up {} stderr: {}", config.short_name(), stderr);
                }
            }
        }
    }

    println!("\n=========================");
    Ok(())
}

/// Tear down every active tunnel that has a config.
///
/// Active peers with no matching config are left alone; configs named in
/// `exceptions` are skipped. Unlike [`start_all`], a `wg-quick down` that
/// exits non-zero aborts the remaining batch.
pub fn kill_all(
    runner: &dyn CommandRunner,
    configs: &[TunnelConfig],
    active: &[ActivePeer],
    exceptions: &[String],
) -> Result<()> {
    println!("\n=== Kill all active tunnels ===");

    if active.is_empty() {
        println!("No active VPN peers found");
    } else {
        for peer in active {
            let config = configs.iter().find(|c| c.public_key == peer.public_key);
            let config = match config {
                Some(config) => config,
                None => {
                    log::debug!(
                        "Active peer on {} has no matching config: {}",
                        peer.interface,
                        peer.public_key
                    );
                    continue;
                }
            };

            if exceptions.iter().any(|name| name == &config.file_name) {
                println!("Skipping kill-excepted tunnel: {}", config.file_name);
                continue;
            }
            validate_short_name(config.short_name())?;

            println!("==Killing tunnel: {}==", config.short_name());
            let output = runner.run("wg-quick", &["down", config.short_name()])?;
            if !output.success() {
                anyhow::bail!(
                    "wg-quick down {} failed with exit code {}: {}",
                    config.short_name(),
                    output.code,
                    output.stderr.trim()
                );
            }
        }
    }

    println!("\n===============================");
    Ok(())
}
