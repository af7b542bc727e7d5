// Shared types for configs, peers, and settings

//! Shared data structures
//!
//! This module defines the data carried between components: tunnel
//! definitions read from disk, active peers reported by `wg show`, and
//! the program settings including the per-operation exception lists.

use std::path::PathBuf;

/// A tunnel definition parsed from one config file.
///
/// The only key shared with an active peer is the public key; two records
/// refer to the same tunnel iff their public key strings are byte-equal.
/// No case or whitespace normalization is applied before comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelConfig {
    /// File name the config was read from, e.g. `vpn0.conf`.
    pub file_name: String,
    /// Remote endpoint from the `Peer` section.
    pub endpoint: String,
    /// Peer public key from the `Peer` section, kept verbatim.
    pub public_key: String,
    /// Full path of the source file.
    pub path: PathBuf,
}

impl TunnelConfig {
    /// Interface identifier passed to `wg-quick`: the file name up to its
    /// first dot (`vpn0.conf` -> `vpn0`, `a.b.conf` -> `a`).
    pub fn short_name(&self) -> &str {
        match self.file_name.split_once('.') {
            Some((stem, _)) => stem,
            None => &self.file_name,
        }
    }
}

/// A tunnel interface currently instantiated on the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivePeer {
    /// Interface name as reported by `wg show`, e.g. `utun4` or `wg0`.
    pub interface: String,
    /// Public key of the peer on that interface.
    pub public_key: String,
}

/// Config filenames excluded from the bulk operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exceptions {
    /// Filenames start-all must not bring up.
    pub start: Vec<String>,
    /// Filenames kill-all must not tear down.
    pub kill: Vec<String>,
}

/// Program settings loaded from the settings file.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory holding the tunnel config files.
    pub config_dir: PathBuf,
    /// Destination for the generated private key.
    pub private_key_file: PathBuf,
    /// Destination for the derived public key.
    pub public_key_file: PathBuf,
    /// Default log filter when `--debug` is not given.
    pub log_level: String,
    /// Per-operation exception lists.
    pub exceptions: Exceptions,
}
