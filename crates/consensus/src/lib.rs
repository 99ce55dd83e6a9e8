//! IoP network parameters, versionbits deployments, and the network registry.

pub mod constants;
pub mod deployments;
pub mod money;
pub mod networks;
pub mod params;
pub mod registry;

pub use deployments::{Deployment, DeploymentSpec, StartTime, Timeout};
pub use params::{
    hash256_from_hex, hash256_to_display_hex, hash256_to_hex, Hash256, Network, NetworkParams,
    ParamsError, ZERO_HASH,
};
pub use registry::NetworkRegistry;
