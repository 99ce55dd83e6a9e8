//! Immutable per-network parameter registry, built once at startup.

use std::sync::Arc;

use crate::networks::ALL_SPECS;
use crate::params::{Network, NetworkParams, NetworkSpec, ParamsError};

#[derive(Clone, Debug)]
pub struct NetworkRegistry {
    networks: Vec<Arc<NetworkParams>>,
}

impl NetworkRegistry {
    /// Loads and validates every built-in network.
    pub fn load() -> Result<Self, ParamsError> {
        Self::from_specs(&ALL_SPECS)
    }

    pub fn from_specs(specs: &[NetworkSpec]) -> Result<Self, ParamsError> {
        let mut networks: Vec<Arc<NetworkParams>> = Vec::with_capacity(specs.len());
        for spec in specs {
            if networks.iter().any(|known| known.network == spec.network) {
                return Err(ParamsError::DuplicateNetwork(spec.network));
            }
            networks.push(Arc::new(NetworkParams::load(spec)?));
        }
        Ok(Self { networks })
    }

    pub fn get(&self, network: Network) -> Result<&Arc<NetworkParams>, ParamsError> {
        self.networks
            .iter()
            .find(|params| params.network == network)
            .ok_or_else(|| ParamsError::UnknownNetwork(network.as_str().to_string()))
    }

    pub fn by_name(&self, name: &str) -> Result<&Arc<NetworkParams>, ParamsError> {
        let network: Network = name.parse()?;
        self.get(network)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<NetworkParams>> {
        self.networks.iter()
    }
}
