//! Prints IoP network parameters and deployment tables as JSON.

pub mod cli;
pub mod report;

use std::sync::Arc;

use iop_consensus::{NetworkParams, NetworkRegistry, ZERO_HASH};
use iop_log as logging;
use iop_log::{log_debug, log_info};
use iop_versionbits::{HeaderInfo, MemoryHeaders, VersionBits};

use crate::cli::{CliAction, Config};

pub fn run_entry() -> Result<(), String> {
    match cli::parse_args()? {
        CliAction::PrintHelp => {
            println!("{}", cli::usage());
            Ok(())
        }
        CliAction::PrintVersion => {
            println!("iop-chaininfo {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        CliAction::Run(config) => {
            let output = run_with_config(&config)?;
            println!("{output}");
            Ok(())
        }
    }
}

/// Loads the registry and renders the selected network as pretty JSON.
pub fn run_with_config(config: &Config) -> Result<String, String> {
    logging::init(logging::LogConfig {
        level: config.log_level,
        format: config.log_format,
        timestamps: config.log_timestamps,
    });
    if let Some(path) = config.conf_path.as_ref() {
        log_debug!("Using config file {}", path.display());
    }

    let registry = NetworkRegistry::load().map_err(|err| format!("invalid network table: {err}"))?;
    let params = Arc::clone(registry.get(config.network).map_err(|err| err.to_string())?);
    log_info!(
        "Loaded {} parameters ({} deployments)",
        params.network,
        params.deployments.len()
    );

    let bits = versionbits_at_genesis(params, config.state_cache_entries);
    if config.deployments_only {
        let views = report::deployment_views(&bits).map_err(|err| err.to_string())?;
        return serde_json::to_string_pretty(&views).map_err(|err| err.to_string());
    }
    let report = report::network_report(&bits).map_err(|err| err.to_string())?;
    serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
}

/// A versionbits tracker whose header index holds only the genesis block.
pub fn versionbits_at_genesis(
    params: Arc<NetworkParams>,
    cache_entries: usize,
) -> VersionBits<MemoryHeaders> {
    let headers = MemoryHeaders::new();
    headers.insert(HeaderInfo {
        hash: params.genesis.hash,
        prev_hash: ZERO_HASH,
        height: params.genesis.height,
        version: params.genesis.version,
        time: params.genesis.time,
    });
    VersionBits::with_cache_capacity(params, headers, cache_entries)
}
