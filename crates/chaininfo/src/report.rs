//! JSON views of a network's parameters.

use iop_consensus::money::format_coins;
use iop_consensus::params::{encode_hex, u256_to_hex};
use iop_consensus::{hash256_to_display_hex, Deployment, NetworkParams};
use iop_versionbits::{HeaderLookup, ThresholdState, VersionBits, VersionBitsError};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct NetworkReport {
    pub network: String,
    pub magic: String,
    pub message_start: String,
    pub port: u16,
    pub rpc_port: u16,
    pub seeds: Vec<String>,
    pub halving_interval: u32,
    pub genesis: GenesisView,
    pub pow: PowView,
    pub block: BlockView,
    pub checkpoints: Vec<CheckpointView>,
    pub last_checkpoint: u32,
    pub key_prefix: KeyPrefixView,
    pub address_prefix: AddressPrefixView,
    pub relay: RelayView,
    pub activation_threshold: Option<u32>,
    pub miner_window: Option<u32>,
    pub next_block_version: String,
    pub deployments: Vec<DeploymentView>,
}

#[derive(Clone, Debug, Serialize)]
pub struct GenesisView {
    pub hash: String,
    pub merkle_root: String,
    pub version: u32,
    pub time: u32,
    pub bits: String,
    pub nonce: u32,
    pub size: usize,
}

#[derive(Clone, Debug, Serialize)]
pub struct PowView {
    pub limit: String,
    pub bits: String,
    pub chainwork: String,
    pub target_timespan: u32,
    pub target_spacing: u32,
    pub retarget_interval: u32,
    pub target_reset: bool,
    pub no_retargeting: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct BlockView {
    pub bip34_height: Option<u32>,
    pub bip65_height: u32,
    pub bip66_height: u32,
    pub prune_after_height: u32,
    pub keep_blocks: u32,
    pub max_tip_age: u32,
    pub slow_height: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct CheckpointView {
    pub height: u32,
    pub hash: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct KeyPrefixView {
    pub privkey: u8,
    pub xpubkey: String,
    pub xprivkey: String,
    pub xpubkey58: String,
    pub xprivkey58: String,
    pub coin_type: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct AddressPrefixView {
    pub pubkeyhash: u8,
    pub scripthash: u8,
    pub witness_pubkeyhash: u8,
    pub witness_scripthash: u8,
    pub bech32: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct RelayView {
    pub require_standard: bool,
    pub min_relay: String,
    pub fee_rate: String,
    pub max_fee_rate: String,
    pub self_connect: bool,
    pub request_mempool: bool,
}

#[derive(Clone, Debug, Serialize)]
pub struct DeploymentView {
    pub name: String,
    pub bit: u8,
    pub start_time: u32,
    pub timeout: u32,
    pub threshold: u32,
    pub window: u32,
    pub required: bool,
    pub force: bool,
    pub can_start: bool,
    /// State for the block after genesis.
    pub state: String,
}

impl DeploymentView {
    pub fn new(deployment: &Deployment, state: ThresholdState) -> Self {
        Self {
            name: deployment.name.to_string(),
            bit: deployment.bit,
            start_time: deployment.start_time.as_raw(),
            timeout: deployment.timeout.as_raw(),
            threshold: deployment.threshold,
            window: deployment.window,
            required: deployment.required,
            force: deployment.force,
            can_start: deployment.can_start(),
            state: state.to_string(),
        }
    }
}

/// Deployment table with each deployment's state on top of genesis.
pub fn deployment_views<H: HeaderLookup>(
    bits: &VersionBits<H>,
) -> Result<Vec<DeploymentView>, VersionBitsError> {
    let params = bits.params();
    let states = bits.deployment_states(&params.genesis.hash)?;
    Ok(params
        .deployments
        .iter()
        .zip(states)
        .map(|(deployment, (_, state))| DeploymentView::new(deployment, state))
        .collect())
}

pub fn network_report<H: HeaderLookup>(
    bits: &VersionBits<H>,
) -> Result<NetworkReport, VersionBitsError> {
    let params: &NetworkParams = bits.params();
    let next_block_version = bits.compute_block_version(&params.genesis.hash)?;

    Ok(NetworkReport {
        network: params.network.to_string(),
        magic: format!("{:#010x}", params.magic),
        message_start: encode_hex(&params.message_start()),
        port: params.port,
        rpc_port: params.rpc_port,
        seeds: params.seeds.iter().map(|seed| seed.to_string()).collect(),
        halving_interval: params.halving_interval,
        genesis: GenesisView {
            hash: hash256_to_display_hex(&params.genesis.hash),
            merkle_root: hash256_to_display_hex(&params.genesis.merkle_root),
            version: params.genesis.version,
            time: params.genesis.time,
            bits: format!("{:08x}", params.genesis.bits),
            nonce: params.genesis.nonce,
            size: params.genesis_block_bytes().len(),
        },
        pow: PowView {
            limit: u256_to_hex(&params.pow.limit),
            bits: format!("{:08x}", params.pow.bits),
            chainwork: u256_to_hex(&params.pow.chainwork),
            target_timespan: params.pow.target_timespan,
            target_spacing: params.pow.target_spacing,
            retarget_interval: params.pow.retarget_interval,
            target_reset: params.pow.target_reset,
            no_retargeting: params.pow.no_retargeting,
        },
        block: BlockView {
            bip34_height: params.block.bip34_height,
            bip65_height: params.block.bip65_height,
            bip66_height: params.block.bip66_height,
            prune_after_height: params.block.prune_after_height,
            keep_blocks: params.block.keep_blocks,
            max_tip_age: params.block.max_tip_age,
            slow_height: params.block.slow_height,
        },
        checkpoints: params
            .checkpoints
            .iter()
            .map(|(height, hash)| CheckpointView {
                height: *height,
                hash: hash256_to_display_hex(hash),
            })
            .collect(),
        last_checkpoint: params.last_checkpoint(),
        key_prefix: KeyPrefixView {
            privkey: params.key_prefix.privkey,
            xpubkey: format!("{:#010x}", params.key_prefix.xpubkey),
            xprivkey: format!("{:#010x}", params.key_prefix.xprivkey),
            xpubkey58: params.key_prefix.xpubkey58.to_string(),
            xprivkey58: params.key_prefix.xprivkey58.to_string(),
            coin_type: params.key_prefix.coin_type,
        },
        address_prefix: AddressPrefixView {
            pubkeyhash: params.address_prefix.pubkeyhash,
            scripthash: params.address_prefix.scripthash,
            witness_pubkeyhash: params.address_prefix.witness_pubkeyhash,
            witness_scripthash: params.address_prefix.witness_scripthash,
            bech32: params.address_prefix.bech32.to_string(),
        },
        relay: RelayView {
            require_standard: params.require_standard,
            min_relay: format_coins(params.min_relay),
            fee_rate: format_coins(params.fee_rate),
            max_fee_rate: format_coins(params.max_fee_rate),
            self_connect: params.self_connect,
            request_mempool: params.request_mempool,
        },
        activation_threshold: params.activation_threshold,
        miner_window: params.miner_window,
        next_block_version: format!("{next_block_version:#010x}"),
        deployments: deployment_views(bits)?,
    })
}
