// Config/peer matching and report rendering

//! Matching and report rendering
//!
//! Joins the active peer listing against the scanned configs by public
//! key and renders plain-text reports. Rendering returns a `String` so
//! the format is unit-testable; printing happens at the call site.

use crate::types::{ActivePeer, TunnelConfig};

/// Render the active-tunnel report: one record per active peer whose
/// public key matches a scanned config.
///
/// Peers matching no config are omitted from the report (logged at debug
/// level); an empty peer set renders a "none active" notice instead.
pub fn render_active(active: &[ActivePeer], configs: &[TunnelConfig]) -> String {
    let mut out = String::new();
    out.push_str("\n=== The following peers are active ===\n\n");

    if active.is_empty() {
        out.push_str("No active VPN peers found\n\n");
    } else {
        for peer in active {
            match configs.iter().find(|c| c.public_key == peer.public_key) {
                Some(config) => {
                    out.push_str(&format!("Filename: {}\n", config.file_name));
                    out.push_str(&format!("Endpoint: {}\n", config.endpoint));
                    out.push_str(&format!("PubKey: {}\n", config.public_key));
                    out.push_str(&format!("Interface name: {}\n\n", peer.interface));
                }
                None => {
                    log::debug!(
                        "Active peer on {} matches no config: {}",
                        peer.interface,
                        peer.public_key
                    );
                }
            }
        }
    }

    out.push_str("======================================\n");
    out
}

/// Render the listing of all scanned tunnel configs.
pub fn render_configs(configs: &[TunnelConfig]) -> String {
    let mut out = String::new();
    out.push_str("\n=== Tunnel configs ===\n\n");

    if configs.is_empty() {
        out.push_str("No tunnel config files found\n\n");
    } else {
        for config in configs {
            out.push_str(&format!("Filename: {}\n", config.file_name));
            out.push_str(&format!("Endpoint: {}\n", config.endpoint));
            out.push_str(&format!("PubKey: {}\n", config.public_key));
            out.push_str(&format!("Source: {}\n\n", config.path.display()));
        }
    }

    out.push_str("======================\n");
    out
}
