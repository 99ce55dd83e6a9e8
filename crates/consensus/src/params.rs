//! Network parameter definitions.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use primitive_types::U256;

use crate::deployments::{Deployment, DeploymentSpec};
use crate::money::Amount;

pub type Hash256 = [u8; 32];

/// Serialized block header size.
const GENESIS_HEADER_SIZE: usize = 80;

pub const ZERO_HASH: Hash256 = [0u8; 32];

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Network {
    Main,
    Testnet,
    Regtest,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Main, Network::Testnet, Network::Regtest];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = ParamsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "main" | "mainnet" => Ok(Self::Main),
            "testnet" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            _ => Err(ParamsError::UnknownNetwork(raw.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HexError {
    InvalidLength,
    InvalidHex,
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexError::InvalidLength => write!(f, "invalid hex length"),
            HexError::InvalidHex => write!(f, "invalid hex digit"),
        }
    }
}

impl std::error::Error for HexError {}

/// Configuration errors raised while loading network tables.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParamsError {
    UnknownNetwork(String),
    DuplicateNetwork(Network),
    InvalidHex {
        field: &'static str,
        err: HexError,
    },
    UnresolvedDefault {
        deployment: &'static str,
        field: &'static str,
    },
    InvalidThreshold {
        deployment: &'static str,
        threshold: u32,
        window: u32,
    },
    InvalidBit {
        deployment: &'static str,
        bit: u8,
    },
    DuplicateName(&'static str),
    BitConflict {
        bit: u8,
        first: &'static str,
        second: &'static str,
    },
    InvalidGenesis(&'static str),
    InvalidCheckpoints(&'static str),
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamsError::UnknownNetwork(name) => write!(f, "unknown network '{name}'"),
            ParamsError::DuplicateNetwork(network) => {
                write!(f, "network {network} defined more than once")
            }
            ParamsError::InvalidHex { field, err } => write!(f, "{field}: {err}"),
            ParamsError::UnresolvedDefault { deployment, field } => write!(
                f,
                "deployment {deployment} uses the network default {field}, but none is set"
            ),
            ParamsError::InvalidThreshold {
                deployment,
                threshold,
                window,
            } => write!(
                f,
                "deployment {deployment} has threshold {threshold} for window {window}"
            ),
            ParamsError::InvalidBit { deployment, bit } => {
                write!(f, "deployment {deployment} uses out-of-range bit {bit}")
            }
            ParamsError::DuplicateName(name) => write!(f, "deployment {name} defined twice"),
            ParamsError::BitConflict { bit, first, second } => write!(
                f,
                "deployments {first} and {second} share bit {bit} with overlapping windows"
            ),
            ParamsError::InvalidGenesis(message) => write!(f, "invalid genesis: {message}"),
            ParamsError::InvalidCheckpoints(message) => {
                write!(f, "invalid checkpoints: {message}")
            }
        }
    }
}

impl std::error::Error for ParamsError {}

/// Parses a 64-digit hash written in internal (little-endian) byte order.
pub fn hash256_from_hex(input: &str) -> Result<Hash256, HexError> {
    let bytes = decode_hex(input)?;
    if bytes.len() != 32 {
        return Err(HexError::InvalidLength);
    }
    let mut hash = [0u8; 32];
    hash.copy_from_slice(&bytes);
    Ok(hash)
}

pub fn hash256_to_hex(hash: &Hash256) -> String {
    encode_hex(hash)
}

/// Renders a hash the way block explorers and RPC display it (byte-reversed).
pub fn hash256_to_display_hex(hash: &Hash256) -> String {
    let mut reversed = *hash;
    reversed.reverse();
    encode_hex(&reversed)
}

pub fn decode_hex(input: &str) -> Result<Vec<u8>, HexError> {
    let mut hex = input.trim();
    if let Some(stripped) = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X")) {
        hex = stripped;
    }
    if hex.len() % 2 == 1 {
        return Err(HexError::InvalidLength);
    }
    let mut out = Vec::with_capacity(hex.len() / 2);
    for start in (0..hex.len()).step_by(2) {
        let pair = hex.get(start..start + 2).ok_or(HexError::InvalidHex)?;
        let byte = u8::from_str_radix(pair, 16).map_err(|_| HexError::InvalidHex)?;
        out.push(byte);
    }
    Ok(out)
}

pub fn encode_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;

    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Parses a big-endian 256-bit number such as a pow limit or chainwork.
pub fn u256_from_hex(input: &str) -> Result<U256, HexError> {
    let bytes = decode_hex(input)?;
    if bytes.is_empty() || bytes.len() > 32 {
        return Err(HexError::InvalidLength);
    }
    Ok(U256::from_big_endian(&bytes))
}

pub fn u256_to_hex(value: &U256) -> String {
    encode_hex(&value.to_big_endian())
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct KeyPrefix {
    pub privkey: u8,
    pub xpubkey: u32,
    pub xprivkey: u32,
    pub xpubkey58: &'static str,
    pub xprivkey58: &'static str,
    pub coin_type: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct AddressPrefix {
    pub pubkeyhash: u8,
    pub scripthash: u8,
    pub witness_pubkeyhash: u8,
    pub witness_scripthash: u8,
    pub bech32: &'static str,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GenesisHeader {
    pub version: u32,
    pub hash: Hash256,
    pub prev_block: Hash256,
    pub merkle_root: Hash256,
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub height: u32,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PowParams {
    pub limit: U256,
    pub bits: u32,
    /// Minimum cumulative work for the best chain.
    pub chainwork: U256,
    pub target_timespan: u32,
    pub target_spacing: u32,
    pub retarget_interval: u32,
    /// Allow minimum-difficulty blocks after a long gap.
    pub target_reset: bool,
    pub no_retargeting: bool,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BlockParams {
    /// `None` means BIP34 never activated on this network.
    pub bip34_height: Option<u32>,
    pub bip34_hash: Option<Hash256>,
    pub bip65_height: u32,
    pub bip65_hash: Option<Hash256>,
    pub bip66_height: u32,
    pub bip66_hash: Option<Hash256>,
    pub prune_after_height: u32,
    pub keep_blocks: u32,
    pub max_tip_age: u32,
    pub slow_height: u32,
}

#[derive(Clone, Debug)]
pub struct NetworkParams {
    pub network: Network,
    pub seeds: &'static [&'static str],
    pub magic: u32,
    pub port: u16,
    pub checkpoints: BTreeMap<u32, Hash256>,
    pub halving_interval: u32,
    pub genesis: GenesisHeader,
    /// Raw genesis block, decoded at load.
    pub genesis_block: Vec<u8>,
    pub pow: PowParams,
    pub block: BlockParams,
    pub bip30: BTreeMap<u32, Hash256>,
    /// Network default threshold; `None` when every deployment sets its own.
    pub activation_threshold: Option<u32>,
    pub miner_window: Option<u32>,
    /// Deployments in table order; miners resolve bit conflicts in this order.
    pub deployments: Vec<Deployment>,
    pub key_prefix: KeyPrefix,
    pub address_prefix: AddressPrefix,
    pub require_standard: bool,
    pub rpc_port: u16,
    pub min_relay: Amount,
    pub fee_rate: Amount,
    pub max_fee_rate: Amount,
    pub self_connect: bool,
    pub request_mempool: bool,
}

impl NetworkParams {
    pub fn load(spec: &NetworkSpec) -> Result<Self, ParamsError> {
        let genesis = spec.genesis.resolve()?;
        let genesis_block =
            decode_hex(spec.genesis_block).map_err(|err| ParamsError::InvalidHex {
                field: "genesis block",
                err,
            })?;
        if genesis_block.len() < GENESIS_HEADER_SIZE {
            return Err(ParamsError::InvalidGenesis(
                "raw block is shorter than a block header",
            ));
        }
        let checkpoints = parse_checkpoints(spec.checkpoints, "checkpoint hash")?;
        let expected_last = checkpoints.keys().next_back().copied().unwrap_or(0);
        if expected_last != spec.last_checkpoint {
            return Err(ParamsError::InvalidCheckpoints(
                "last checkpoint does not match the highest checkpoint",
            ));
        }

        let mut deployments: Vec<Deployment> = Vec::with_capacity(spec.deployments.len());
        for raw in spec.deployments {
            let deployment =
                Deployment::resolve(raw, spec.activation_threshold, spec.miner_window)?;
            if deployments.iter().any(|known| known.name == deployment.name) {
                return Err(ParamsError::DuplicateName(deployment.name));
            }
            if let Some(other) = deployments
                .iter()
                .find(|known| known.conflicts_with(&deployment))
            {
                return Err(ParamsError::BitConflict {
                    bit: deployment.bit,
                    first: other.name,
                    second: deployment.name,
                });
            }
            deployments.push(deployment);
        }

        Ok(Self {
            network: spec.network,
            seeds: spec.seeds,
            magic: spec.magic,
            port: spec.port,
            checkpoints,
            halving_interval: spec.halving_interval,
            genesis,
            genesis_block,
            pow: spec.pow.resolve()?,
            block: spec.block.resolve()?,
            bip30: parse_checkpoints(spec.bip30, "bip30 hash")?,
            activation_threshold: spec.activation_threshold,
            miner_window: spec.miner_window,
            deployments,
            key_prefix: spec.key_prefix,
            address_prefix: spec.address_prefix,
            require_standard: spec.require_standard,
            rpc_port: spec.rpc_port,
            min_relay: spec.min_relay,
            fee_rate: spec.fee_rate,
            max_fee_rate: spec.max_fee_rate,
            self_connect: spec.self_connect,
            request_mempool: spec.request_mempool,
        })
    }

    pub fn message_start(&self) -> [u8; 4] {
        self.magic.to_le_bytes()
    }

    /// Highest checkpointed height, or 0 when the network has none.
    pub fn last_checkpoint(&self) -> u32 {
        self.checkpoints.keys().next_back().copied().unwrap_or(0)
    }

    pub fn checkpoint(&self, height: u32) -> Option<&Hash256> {
        self.checkpoints.get(&height)
    }

    /// False only when `height` is checkpointed and `hash` differs.
    pub fn verify_checkpoint(&self, height: u32, hash: &Hash256) -> bool {
        match self.checkpoints.get(&height) {
            Some(expected) => expected == hash,
            None => true,
        }
    }

    pub fn deployment(&self, name: &str) -> Option<&Deployment> {
        self.deployments
            .iter()
            .find(|deployment| deployment.name == name)
    }

    pub fn deployment_index(&self, name: &str) -> Option<usize> {
        self.deployments
            .iter()
            .position(|deployment| deployment.name == name)
    }

    pub fn genesis_block_bytes(&self) -> &[u8] {
        &self.genesis_block
    }
}

fn parse_checkpoints(
    entries: &[(u32, &str)],
    field: &'static str,
) -> Result<BTreeMap<u32, Hash256>, ParamsError> {
    let mut out = BTreeMap::new();
    let mut previous: Option<u32> = None;
    for (height, hash) in entries {
        if previous.is_some_and(|prev| prev >= *height) {
            return Err(ParamsError::InvalidCheckpoints(
                "heights must be strictly increasing",
            ));
        }
        previous = Some(*height);
        let hash = hash256_from_hex(hash).map_err(|err| ParamsError::InvalidHex { field, err })?;
        out.insert(*height, hash);
    }
    Ok(out)
}

fn parse_optional_hash(
    raw: Option<&str>,
    field: &'static str,
) -> Result<Option<Hash256>, ParamsError> {
    raw.map(|hex| hash256_from_hex(hex).map_err(|err| ParamsError::InvalidHex { field, err }))
        .transpose()
}

/// Transcribed network table, before hex parsing and default resolution.
#[derive(Clone, Copy, Debug)]
pub struct NetworkSpec {
    pub network: Network,
    pub seeds: &'static [&'static str],
    pub magic: u32,
    pub port: u16,
    pub checkpoints: &'static [(u32, &'static str)],
    pub last_checkpoint: u32,
    pub halving_interval: u32,
    pub genesis: GenesisSpec,
    pub genesis_block: &'static str,
    pub pow: PowSpec,
    pub block: BlockSpec,
    pub bip30: &'static [(u32, &'static str)],
    pub activation_threshold: Option<u32>,
    pub miner_window: Option<u32>,
    pub deployments: &'static [DeploymentSpec],
    pub key_prefix: KeyPrefix,
    pub address_prefix: AddressPrefix,
    pub require_standard: bool,
    pub rpc_port: u16,
    pub min_relay: Amount,
    pub fee_rate: Amount,
    pub max_fee_rate: Amount,
    pub self_connect: bool,
    pub request_mempool: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct GenesisSpec {
    pub version: u32,
    pub hash: &'static str,
    pub prev_block: &'static str,
    pub merkle_root: &'static str,
    pub ts: u32,
    pub bits: u32,
    pub nonce: u32,
    pub height: u32,
}

impl GenesisSpec {
    fn resolve(&self) -> Result<GenesisHeader, ParamsError> {
        let hash = |hex: &str, field: &'static str| {
            hash256_from_hex(hex).map_err(|err| ParamsError::InvalidHex { field, err })
        };
        let header = GenesisHeader {
            version: self.version,
            hash: hash(self.hash, "genesis hash")?,
            prev_block: hash(self.prev_block, "genesis prev block")?,
            merkle_root: hash(self.merkle_root, "genesis merkle root")?,
            time: self.ts,
            bits: self.bits,
            nonce: self.nonce,
            height: self.height,
        };
        if header.height != 0 {
            return Err(ParamsError::InvalidGenesis("height must be 0"));
        }
        if header.prev_block != ZERO_HASH {
            return Err(ParamsError::InvalidGenesis("previous block must be zero"));
        }
        Ok(header)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct PowSpec {
    pub limit: &'static str,
    pub bits: u32,
    pub chainwork: &'static str,
    pub target_timespan: u32,
    pub target_spacing: u32,
    pub retarget_interval: u32,
    pub target_reset: bool,
    pub no_retargeting: bool,
}

impl PowSpec {
    fn resolve(&self) -> Result<PowParams, ParamsError> {
        Ok(PowParams {
            limit: u256_from_hex(self.limit).map_err(|err| ParamsError::InvalidHex {
                field: "pow limit",
                err,
            })?,
            bits: self.bits,
            chainwork: u256_from_hex(self.chainwork).map_err(|err| ParamsError::InvalidHex {
                field: "pow chainwork",
                err,
            })?,
            target_timespan: self.target_timespan,
            target_spacing: self.target_spacing,
            retarget_interval: self.retarget_interval,
            target_reset: self.target_reset,
            no_retargeting: self.no_retargeting,
        })
    }
}

#[derive(Clone, Copy, Debug)]
pub struct BlockSpec {
    pub bip34_height: Option<u32>,
    pub bip34_hash: Option<&'static str>,
    pub bip65_height: u32,
    pub bip65_hash: Option<&'static str>,
    pub bip66_height: u32,
    pub bip66_hash: Option<&'static str>,
    pub prune_after_height: u32,
    pub keep_blocks: u32,
    pub max_tip_age: u32,
    pub slow_height: u32,
}

impl BlockSpec {
    fn resolve(&self) -> Result<BlockParams, ParamsError> {
        Ok(BlockParams {
            bip34_height: self.bip34_height,
            bip34_hash: parse_optional_hash(self.bip34_hash, "bip34 hash")?,
            bip65_height: self.bip65_height,
            bip65_hash: parse_optional_hash(self.bip65_hash, "bip65 hash")?,
            bip66_height: self.bip66_height,
            bip66_hash: parse_optional_hash(self.bip66_hash, "bip66 hash")?,
            prune_after_height: self.prune_after_height,
            keep_blocks: self.keep_blocks,
            max_tip_age: self.max_tip_age,
            slow_height: self.slow_height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TIMESTAMP_NEVER;
    use crate::networks::{MAIN, REGTEST, TESTNET};

    const fn deployment(
        name: &'static str,
        bit: u8,
        start_time: u32,
        timeout: u32,
    ) -> DeploymentSpec {
        DeploymentSpec {
            name,
            bit,
            start_time,
            timeout,
            threshold: None,
            window: None,
            required: false,
            force: false,
        }
    }

    #[test]
    fn network_names_round_trip() {
        for network in Network::ALL {
            assert_eq!(network.as_str().parse::<Network>(), Ok(network));
        }
        assert_eq!("mainnet".parse::<Network>(), Ok(Network::Main));
        assert_eq!(
            "segnet4".parse::<Network>(),
            Err(ParamsError::UnknownNetwork("segnet4".to_string()))
        );
    }

    #[test]
    fn u256_hex_is_big_endian() {
        let limit = u256_from_hex(
            "00000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        )
        .expect("limit");
        assert_eq!(limit, (U256::one() << 224) - U256::one());
        assert_eq!(
            u256_to_hex(&U256::from(0x0e20_799b_006d_2cu64)),
            "000000000000000000000000000000000000000000000000000e20799b006d2c"
        );
        assert_eq!(u256_from_hex(""), Err(HexError::InvalidLength));
    }

    #[test]
    fn hash_hex_keeps_internal_order() {
        let hash =
            hash256_from_hex("b32dc8b6bf412cf71abb8d433349f16a77e064bee89bcb56e52e5fbf00000000")
                .expect("hash");
        assert_eq!(hash[0], 0xb3);
        assert_eq!(hash[31], 0x00);
        assert_eq!(
            hash256_to_display_hex(&hash),
            "00000000bf5f2ee556cb9be8be64e0776af14933438dbb1af72c41bfb6c82db3"
        );
        assert_eq!(hash256_from_hex("abcd"), Err(HexError::InvalidLength));
        assert_eq!(hash256_from_hex("zz"), Err(HexError::InvalidHex));
    }

    #[test]
    fn mainnet_values_match_table() {
        let params = NetworkParams::load(&MAIN).expect("main");

        assert_eq!(params.magic, 0xd3bb_b0fd);
        assert_eq!(params.message_start(), [0xfd, 0xb0, 0xbb, 0xd3]);
        assert_eq!(params.port, 4877);
        assert_eq!(params.rpc_port, 8337);
        assert_eq!(params.halving_interval, 150_000);
        assert_eq!(params.activation_threshold, Some(1916));
        assert_eq!(params.miner_window, Some(2016));
        assert_eq!(params.genesis.time, 1_463_452_181);
        assert_eq!(params.genesis.bits, 486_604_799);
        assert_eq!(params.genesis.nonce, 1_875_087_468);
        assert_eq!(
            hash256_to_hex(&params.genesis.hash),
            "b32dc8b6bf412cf71abb8d433349f16a77e064bee89bcb56e52e5fbf00000000"
        );
        assert_eq!(params.pow.target_timespan, 14 * 24 * 60 * 60);
        assert_eq!(params.pow.target_spacing, 600);
        assert_eq!(
            params.pow.chainwork,
            U256::from_big_endian(&decode_hex("0e20799b006d2c").expect("hex"))
        );
        assert!(!params.pow.target_reset);
        assert_eq!(params.block.bip34_height, None);
        assert_eq!(params.block.bip65_hash, Some(params.genesis.hash));
        assert_eq!(params.key_prefix.privkey, 0x31);
        assert_eq!(params.key_prefix.xpubkey, 0x2780_915f);
        assert_eq!(params.key_prefix.xprivkey58, "dywP");
        assert_eq!(params.key_prefix.coin_type, 66);
        assert_eq!(params.address_prefix.pubkeyhash, 0x75);
        assert_eq!(params.address_prefix.scripthash, 0xae);
        assert!(params.require_standard);
        assert_eq!(params.fee_rate, 100_000);
        assert_eq!(params.max_fee_rate, 400_000);
    }

    #[test]
    fn last_checkpoint_is_highest_key() {
        for spec in [MAIN, TESTNET, REGTEST] {
            let params = NetworkParams::load(&spec).expect("params");
            let max = params.checkpoints.keys().max().copied().unwrap_or(0);
            assert_eq!(params.last_checkpoint(), max);
            assert_eq!(params.last_checkpoint(), spec.last_checkpoint);
        }
    }

    #[test]
    fn verify_checkpoint_only_rejects_mismatches() {
        let params = NetworkParams::load(&TESTNET).expect("testnet");
        let expected = *params.checkpoint(10_000).expect("checkpoint");
        assert!(params.verify_checkpoint(10_000, &expected));
        assert!(!params.verify_checkpoint(10_000, &ZERO_HASH));
        assert!(params.verify_checkpoint(10_001, &ZERO_HASH));
    }

    #[test]
    fn genesis_must_start_the_chain() {
        let mut spec = REGTEST;
        spec.genesis.height = 1;
        assert_eq!(
            NetworkParams::load(&spec).unwrap_err(),
            ParamsError::InvalidGenesis("height must be 0")
        );

        let mut spec = REGTEST;
        spec.genesis.prev_block = spec.genesis.hash;
        assert_eq!(
            NetworkParams::load(&spec).unwrap_err(),
            ParamsError::InvalidGenesis("previous block must be zero")
        );
    }

    #[test]
    fn stale_last_checkpoint_is_rejected() {
        let mut spec = MAIN;
        spec.last_checkpoint = 47_654;
        assert!(matches!(
            NetworkParams::load(&spec),
            Err(ParamsError::InvalidCheckpoints(_))
        ));
    }

    #[test]
    fn unsorted_checkpoints_are_rejected() {
        const SWAPPED: [(u32, &str); 2] = [
            (
                18_000,
                "fd71a128bcb9aa2516f461dc1b712dc2428c9340886babce10adcce000000000",
            ),
            (
                10_000,
                "2f5e87e031383e21e650a3274c33ceb477702fc73f966bef022c9bb000000000",
            ),
        ];
        let mut spec = TESTNET;
        spec.checkpoints = &SWAPPED;
        assert!(matches!(
            NetworkParams::load(&spec),
            Err(ParamsError::InvalidCheckpoints(_))
        ));
    }

    #[test]
    fn overlapping_deployments_on_one_bit_are_rejected() {
        const OVERLAP: [DeploymentSpec; 2] = [
            deployment("csv", 0, 0, TIMESTAMP_NEVER),
            deployment("segwit", 0, 1_500_000_000, 1_600_000_000),
        ];
        let spec = NetworkSpec {
            deployments: &OVERLAP,
            ..REGTEST
        };
        assert_eq!(
            NetworkParams::load(&spec).unwrap_err(),
            ParamsError::BitConflict {
                bit: 0,
                first: "csv",
                second: "segwit"
            }
        );
        assert!(matches!(
            crate::NetworkRegistry::from_specs(&[MAIN, spec]),
            Err(ParamsError::BitConflict { bit: 0, .. })
        ));
    }

    #[test]
    fn duplicate_deployment_names_are_rejected() {
        const TWICE: [DeploymentSpec; 2] = [
            deployment("csv", 0, 0, TIMESTAMP_NEVER),
            deployment("csv", 1, 0, TIMESTAMP_NEVER),
        ];
        let spec = NetworkSpec {
            deployments: &TWICE,
            ..REGTEST
        };
        assert_eq!(
            NetworkParams::load(&spec).unwrap_err(),
            ParamsError::DuplicateName("csv")
        );
    }

    #[test]
    fn shared_bit_without_overlap_loads() {
        const REUSED: [DeploymentSpec; 3] = [
            deployment("early", 2, 0, 1_400_000_000),
            deployment("parked", 2, TIMESTAMP_NEVER, TIMESTAMP_NEVER),
            deployment("late", 2, 1_400_000_000, TIMESTAMP_NEVER),
        ];
        let spec = NetworkSpec {
            deployments: &REUSED,
            ..REGTEST
        };
        let params = NetworkParams::load(&spec).expect("params");
        let names: Vec<&str> = params.deployments.iter().map(|d| d.name).collect();
        assert_eq!(names, ["early", "parked", "late"]);
    }

    #[test]
    fn network_defaults_stay_optional() {
        const EXPLICIT: [DeploymentSpec; 1] = [DeploymentSpec {
            threshold: Some(3),
            window: Some(4),
            ..deployment("csv", 0, 0, TIMESTAMP_NEVER)
        }];
        let spec = NetworkSpec {
            activation_threshold: None,
            miner_window: None,
            deployments: &EXPLICIT,
            ..REGTEST
        };
        let params = NetworkParams::load(&spec).expect("params");
        assert_eq!(params.activation_threshold, None);
        assert_eq!(params.miner_window, None);
        assert_eq!(params.deployments[0].threshold, 3);

        let spec = NetworkSpec {
            activation_threshold: None,
            ..REGTEST
        };
        assert!(matches!(
            NetworkParams::load(&spec),
            Err(ParamsError::UnresolvedDefault {
                field: "threshold",
                ..
            })
        ));
    }

    #[test]
    fn malformed_genesis_block_fails_at_load() {
        let mut spec = REGTEST;
        spec.genesis_block = "01000000zz";
        assert_eq!(
            NetworkParams::load(&spec).unwrap_err(),
            ParamsError::InvalidHex {
                field: "genesis block",
                err: HexError::InvalidHex
            }
        );

        spec.genesis_block = "0100000000";
        assert_eq!(
            NetworkParams::load(&spec).unwrap_err(),
            ParamsError::InvalidGenesis("raw block is shorter than a block header")
        );

        let params = NetworkParams::load(&REGTEST).expect("regtest");
        assert_eq!(params.genesis_block_bytes().len(), 270);
    }
}
