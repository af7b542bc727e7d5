// Tunnel config discovery

//! Tunnel config directory scanning
//!
//! Walks the configured directory (one level deep, no recursion), treats
//! every regular file whose name contains ".conf" as a tunnel definition,
//! and parses it as an INI document to extract the peer metadata used for
//! matching and lifecycle decisions.

use crate::types::TunnelConfig;
use anyhow::{Context, Result};
use ini::{Ini, Properties};
use std::path::Path;

/// Scan `dir` for tunnel config files.
///
/// Order follows filesystem iteration order and is not guaranteed stable
/// across platforms. A qualifying file that fails to parse aborts the
/// whole scan; broken tunnel definitions are never silently skipped.
pub fn scan_config_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<TunnelConfig>> {
    let dir = dir.as_ref();
    let mut configs = Vec::new();

    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read config directory {}", dir.display()))?;
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read directory entry in {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("Failed to stat {}", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if !file_name.contains(".conf") {
            continue;
        }
        log::debug!("Found tunnel config file: {}", file_name);

        let config = parse_tunnel_config(&entry.path(), &file_name)
            .with_context(|| format!("Failed to parse {}", entry.path().display()))?;
        log::debug!(
            "Parsed {}: endpoint={} publickey={}",
            config.file_name,
            config.endpoint,
            config.public_key
        );
        configs.push(config);
    }

    Ok(configs)
}

fn parse_tunnel_config(path: &Path, file_name: &str) -> Result<TunnelConfig> {
    let ini = Ini::load_from_file(path).map_err(|e| anyhow::anyhow!("{}", e))?;

    let peer = ini
        .section(Some("Peer"))
        .context("Missing Peer section")?;
    let endpoint = get_ci(peer, "endpoint").context("Peer section is missing endpoint")?;
    let public_key = get_ci(peer, "publickey").context("Peer section is missing publickey")?;

    Ok(TunnelConfig {
        file_name: file_name.to_string(),
        endpoint: endpoint.to_string(),
        public_key: public_key.to_string(),
        path: path.to_path_buf(),
    })
}

/// Case-insensitive property lookup. wg-quick configs spell the keys
/// `Endpoint` / `PublicKey`; other generators use lower case.
fn get_ci<'a>(props: &'a Properties, key: &str) -> Option<&'a str> {
    props
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, value)| value)
}
