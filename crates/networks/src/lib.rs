//! Fixed catalog of the EVM networks the deployer recognizes.
//!
//! Everything here is a pure lookup over the chain id reported by the wallet:
//! display names, mainnet/testnet classification and the color tag used when
//! rendering a network badge. Unrecognized ids are never an error, they simply
//! classify as [`NetworkKind::Unknown`].

use alloy_primitives::{Address, ChainId};
use serde::{Deserialize, Serialize};
use yansi::Color;

/// Chain ids classified as production networks.
pub const MAINNET_CHAIN_IDS: [ChainId; 4] = [1, 56, 137, 43114];

/// Chain ids classified as test networks.
pub const TESTNET_CHAIN_IDS: [ChainId; 8] = [3, 4, 5, 42, 97, 11155111, 80001, 43113];

/// Coarse classification of a chain id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkKind {
    Mainnet,
    Testnet,
    Unknown,
}

impl NetworkKind {
    /// Color tag for rendering a badge for this kind of network.
    pub fn color(&self) -> Color {
        match self {
            Self::Mainnet => Color::Green,
            Self::Testnet => Color::Cyan,
            Self::Unknown => Color::Yellow,
        }
    }
}

impl std::fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Classifies a chain id against the fixed mainnet/testnet sets.
///
/// Total over all inputs: anything outside both sets, including a missing
/// chain id, is [`NetworkKind::Unknown`].
pub fn network_kind(chain_id: Option<ChainId>) -> NetworkKind {
    let Some(id) = chain_id else { return NetworkKind::Unknown };
    if MAINNET_CHAIN_IDS.contains(&id) {
        NetworkKind::Mainnet
    } else if TESTNET_CHAIN_IDS.contains(&id) {
        NetworkKind::Testnet
    } else {
        NetworkKind::Unknown
    }
}

/// Display name for a chain id.
///
/// Returns `"Disconnected"` when no chain id is present and
/// `"Unknown Network (<id>)"` for ids outside the fixed catalog.
pub fn network_name(chain_id: Option<ChainId>) -> String {
    let Some(id) = chain_id else { return "Disconnected".to_string() };
    match id {
        1 => "Ethereum Mainnet".to_string(),
        3 => "Ropsten Testnet".to_string(),
        4 => "Rinkeby Testnet".to_string(),
        5 => "Goerli Testnet".to_string(),
        42 => "Kovan Testnet".to_string(),
        56 => "BNB Smart Chain".to_string(),
        97 => "BNB Testnet".to_string(),
        137 => "Polygon Mainnet".to_string(),
        80001 => "Mumbai Testnet".to_string(),
        43113 => "Avalanche Fuji Testnet".to_string(),
        43114 => "Avalanche C-Chain".to_string(),
        11155111 => "Sepolia Testnet".to_string(),
        id => format!("Unknown Network ({id})"),
    }
}

/// Badge color for a chain id; disconnected renders dim.
pub fn network_color(chain_id: Option<ChainId>) -> Color {
    match chain_id {
        None => Color::BrightBlack,
        some => network_kind(some).color(),
    }
}

/// Shortens an address to the `0x1234…abcd` form used in badges and history
/// cards. Empty string when no account is present.
pub fn shorten_address(address: Option<Address>) -> String {
    match address {
        Some(addr) => {
            let s = addr.to_string();
            format!("{}...{}", &s[..6], &s[s.len() - 4..])
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn classifies_fixed_sets() {
        for id in MAINNET_CHAIN_IDS {
            assert_eq!(network_kind(Some(id)), NetworkKind::Mainnet, "chain {id}");
        }
        for id in TESTNET_CHAIN_IDS {
            assert_eq!(network_kind(Some(id)), NetworkKind::Testnet, "chain {id}");
        }
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(network_kind(None), NetworkKind::Unknown);
        for id in [0, 2, 10, 42161, 1337, u64::MAX] {
            assert_eq!(network_kind(Some(id)), NetworkKind::Unknown, "chain {id}");
        }
    }

    #[test]
    fn display_names() {
        assert_eq!(network_name(Some(1)), "Ethereum Mainnet");
        assert_eq!(network_name(Some(11155111)), "Sepolia Testnet");
        assert_eq!(network_name(Some(999)), "Unknown Network (999)");
        assert_eq!(network_name(None), "Disconnected");
    }

    #[test]
    fn badge_colors() {
        assert_eq!(network_color(Some(1)), Color::Green);
        assert_eq!(network_color(Some(5)), Color::Cyan);
        assert_eq!(network_color(Some(999)), Color::Yellow);
        assert_eq!(network_color(None), Color::BrightBlack);
    }

    #[test]
    fn shortens_addresses() {
        let addr = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(shorten_address(Some(addr)), "0xf39F...2266");
        assert_eq!(shorten_address(None), "");
    }
}
