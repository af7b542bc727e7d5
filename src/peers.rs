// Active peer discovery via `wg show`

//! Active-peer querying and parsing
//!
//! `wg show all peers` prints one line per peer: the interface name and
//! the peer's public key, separated by a tab. Parsing tokenizes on any
//! whitespace and consumes the tokens in (interface, public key) pairs,
//! mirroring the fixed output format of wireguard-tools. The parse lives
//! in its own function so a format change stays localized here.

use crate::runner::CommandRunner;
use crate::types::ActivePeer;
use anyhow::Result;

/// Query all active peers across all WireGuard interfaces.
///
/// Requires elevated privileges. A permission failure from `wg` is
/// surfaced as its own diagnostic instead of a generic exit-code error.
pub fn query_active_peers(runner: &dyn CommandRunner) -> Result<Vec<ActivePeer>> {
    let output = runner.run("wg", &["show", "all", "peers"])?;
    if !output.success() {
        let stderr = output.stderr.trim();
        if stderr.contains("Operation not permitted")
            || stderr.to_lowercase().contains("permission denied")
        {
            anyhow::bail!("wg show requires elevated privileges: {}", stderr);
        }
        anyhow::bail!(
            "wg show all peers failed with exit code {}: {}",
            output.code,
            stderr
        );
    }
    log::debug!("Raw peer listing from wg show all peers:\n{}", output.stdout);
    parse_peer_listing(&output.stdout)
}

/// Parse `wg show all peers` output into (interface, public key) pairs.
///
/// An odd token count means the tool's output format changed or got
/// truncated; that fails explicitly rather than dropping the trailing
/// token.
pub fn parse_peer_listing(raw: &str) -> Result<Vec<ActivePeer>> {
    let tokens: Vec<&str> = raw.split_whitespace().collect();
    if tokens.len() % 2 != 0 {
        anyhow::bail!(
            "Malformed peer listing: expected interface/key pairs, got {} tokens",
            tokens.len()
        );
    }

    Ok(tokens
        .chunks(2)
        .map(|pair| ActivePeer {
            interface: pair[0].to_string(),
            public_key: pair[1].to_string(),
        })
        .collect())
}

/// Whether any active peer carries exactly this public key.
pub fn contains_public_key(peers: &[ActivePeer], public_key: &str) -> bool {
    peers.iter().any(|peer| peer.public_key == public_key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::MockRunner;

    #[test]
    fn test_parse_peer_listing_pairs() {
        let raw = "utun4\tkeyA=\nutun5\tkeyB=\n";
        let peers = parse_peer_listing(raw).unwrap();
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[0].interface, "utun4");
        assert_eq!(peers[0].public_key, "keyA=");
        assert_eq!(peers[1].interface, "utun5");
        assert_eq!(peers[1].public_key, "keyB=");
    }

    #[test]
    fn test_parse_peer_listing_empty() {
        assert!(parse_peer_listing("").unwrap().is_empty());
        assert!(parse_peer_listing("\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_peer_listing_odd_token_count() {
        let err = parse_peer_listing("utun4\tkeyA=\nutun5\n").unwrap_err();
        assert!(err.to_string().contains("3 tokens"));
    }

    #[test]
    fn test_parse_peer_listing_mixed_whitespace() {
        let peers = parse_peer_listing("wg0 keyA=   wg1\tkeyB=").unwrap();
        assert_eq!(peers.len(), 2);
        assert_eq!(peers[1].interface, "wg1");
    }

    #[test]
    fn test_contains_public_key_is_exact() {
        let peers = vec![ActivePeer {
            interface: "wg0".to_string(),
            public_key: "KeyA=".to_string(),
        }];
        assert!(contains_public_key(&peers, "KeyA="));
        assert!(!contains_public_key(&peers, "keya="));
        assert!(!contains_public_key(&peers, "KeyA= "));
    }

    #[test]
    fn test_query_active_peers_parses_output() {
        let runner = MockRunner::new().respond("wg show all peers", "wg0\tkeyA=\n", 0);
        let peers = query_active_peers(&runner).unwrap();
        assert_eq!(peers.len(), 1);
        assert_eq!(runner.calls.borrow().as_slice(), ["wg show all peers"]);
    }

    #[test]
    fn test_query_active_peers_permission_failure() {
        let runner = MockRunner::new().respond_stderr(
            "wg show all peers",
            "Unable to access interface: Operation not permitted",
            1,
        );
        let err = query_active_peers(&runner).unwrap_err();
        assert!(err.to_string().contains("elevated privileges"));
    }

    #[test]
    fn test_query_active_peers_generic_failure() {
        let runner = MockRunner::new().respond_stderr("wg show all peers", "boom", 2);
        let err = query_active_peers(&runner).unwrap_err();
        assert!(err.to_string().contains("exit code 2"));
    }
}
