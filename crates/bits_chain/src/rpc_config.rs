use std::collections::HashMap;
use std::time::Duration;

use bits_core::LaunchConfig;
use serde::{Deserialize, Serialize};

use crate::error::ChainError;
use crate::network::Network;

/// Configuration for a single full-node endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    pub network: Network,
    pub url: String,
    pub is_custom: bool,
    pub timeout_secs: u64,
}

impl RpcConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Per-network endpoint configuration with custom override support.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfigStore {
    active: Network,
    configs: HashMap<Network, RpcConfig>,
}

impl RpcConfigStore {
    /// Create a store populated with each network's public endpoint, Devnet
    /// active.
    pub fn with_defaults() -> Self {
        let configs = Network::ALL
            .into_iter()
            .map(|network| (network, default_config(network, DEFAULT_TIMEOUT_SECS)))
            .collect();

        Self {
            active: Network::default(),
            configs,
        }
    }

    /// Build a store from the on-disk client config: selects the configured
    /// network, applies its timeout everywhere and installs the custom URL, if
    /// any, on the active network.
    pub fn from_config(config: &LaunchConfig) -> anyhow::Result<Self> {
        let active: Network = config.network.parse()?;
        let mut store = Self::with_defaults();
        for rpc in store.configs.values_mut() {
            rpc.timeout_secs = config.request_timeout_secs;
        }
        store.active = active;
        if let Some(url) = config.custom_rpc_url() {
            store.set_custom_rpc(active, url.to_string())?;
        }
        Ok(store)
    }

    /// The network selected for queries and submissions.
    pub fn active_network(&self) -> Network {
        self.active
    }

    pub fn set_active_network(&mut self, network: Network) {
        self.active = network;
    }

    /// Endpoint of the active network.
    pub fn active_rpc(&self) -> Option<&RpcConfig> {
        self.configs.get(&self.active)
    }

    /// Get the RPC configuration for a network. Returns `None` only if the
    /// entry was never populated, which cannot happen after [`Self::with_defaults`].
    pub fn get_rpc(&self, network: Network) -> Option<&RpcConfig> {
        self.configs.get(&network)
    }

    /// Override the RPC URL for a network with a custom endpoint.
    ///
    /// Returns `Err` if the URL fails validation.
    pub fn set_custom_rpc(&mut self, network: Network, url: String) -> anyhow::Result<()> {
        if !validate_url(&url) {
            return Err(ChainError::InvalidUrl(url).into());
        }

        let entry = self
            .configs
            .entry(network)
            .or_insert_with(|| default_config(network, DEFAULT_TIMEOUT_SECS));
        entry.url = url;
        entry.is_custom = true;
        Ok(())
    }

    /// Reset a network's RPC URL back to the public endpoint.
    pub fn reset_to_default(&mut self, network: Network) {
        let entry = self
            .configs
            .entry(network)
            .or_insert_with(|| default_config(network, DEFAULT_TIMEOUT_SECS));
        entry.url = network.default_rpc_url().to_string();
        entry.is_custom = false;
    }
}

impl Default for RpcConfigStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn default_config(network: Network, timeout_secs: u64) -> RpcConfig {
    RpcConfig {
        network,
        url: network.default_rpc_url().to_string(),
        is_custom: false,
        timeout_secs,
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}
