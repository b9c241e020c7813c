use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChainError;

/// Sui networks the launchpad can talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[default]
    Devnet,
    Testnet,
    Mainnet,
    Localnet,
}

impl Network {
    pub const ALL: [Network; 4] = [
        Network::Devnet,
        Network::Testnet,
        Network::Mainnet,
        Network::Localnet,
    ];

    /// Human-readable label for the network.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Devnet => "Sui Devnet",
            Network::Testnet => "Sui Testnet",
            Network::Mainnet => "Sui Mainnet",
            Network::Localnet => "Sui Localnet",
        }
    }

    /// Lowercase identifier used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Devnet => "devnet",
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
            Network::Localnet => "localnet",
        }
    }

    /// Public full-node JSON-RPC endpoint.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Devnet => "https://fullnode.devnet.sui.io:443",
            Network::Testnet => "https://fullnode.testnet.sui.io:443",
            Network::Mainnet => "https://fullnode.mainnet.sui.io:443",
            Network::Localnet => "http://127.0.0.1:9000",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Network {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "devnet" => Ok(Network::Devnet),
            "testnet" => Ok(Network::Testnet),
            "mainnet" => Ok(Network::Mainnet),
            "localnet" | "local" => Ok(Network::Localnet),
            other => Err(ChainError::UnknownNetwork(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_config_names() {
        for network in Network::ALL {
            assert_eq!(network.as_str().parse::<Network>().unwrap(), network);
        }
        assert_eq!(" DevNet ".parse::<Network>().unwrap(), Network::Devnet);
        assert_eq!("local".parse::<Network>().unwrap(), Network::Localnet);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "ropsten".parse::<Network>().unwrap_err();
        assert!(matches!(err, ChainError::UnknownNetwork(ref n) if n == "ropsten"));
    }

    #[test]
    fn devnet_is_default() {
        assert_eq!(Network::default(), Network::Devnet);
        assert!(Network::Devnet.default_rpc_url().contains("devnet"));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Network::Testnet).unwrap();
        assert_eq!(json, "\"testnet\"");
    }
}
