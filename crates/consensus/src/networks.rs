//! Transcribed IoP network tables.
//!
//! Hashes are written in internal byte order, as the reference node stores them.

use crate::constants::TIMESTAMP_NEVER;
use crate::deployments::DeploymentSpec;
use crate::params::{
    AddressPrefix, BlockSpec, GenesisSpec, KeyPrefix, Network, NetworkSpec, PowSpec,
};

pub const ALL_SPECS: [NetworkSpec; 3] = [MAIN, TESTNET, REGTEST];

const ZERO_HASH_HEX: &str = "0000000000000000000000000000000000000000000000000000000000000000";
const GENESIS_MERKLE_ROOT: &str =
    "e12b8f2bef968efbdf2fab49fb3f1c59456e7d9b0f2c4afb4750a92d6dc41b95";
const TWO_WEEKS: u32 = 14 * 24 * 60 * 60;
const TEN_MINUTES: u32 = 10 * 60;
const ONE_DAY: u32 = 24 * 60 * 60;

const MAIN_GENESIS_HASH: &str = "b32dc8b6bf412cf71abb8d433349f16a77e064bee89bcb56e52e5fbf00000000";
const TESTNET_GENESIS_HASH: &str =
    "a3f3d71820ea72609c0ba999e577403120e5be4f4fda0c2363b82b6f00000000";
const REGTEST_GENESIS_HASH: &str =
    "b5b87145e5fc1b8c231f9f9d541e9d2b60ae444bb24aaec3ee56364baa5bac13";

const MAIN_SEEDS: [&str; 6] = [
    "mainnet.iop.cash",
    "main1.iop.cash",
    "main2.iop.cash",
    "main3.iop.cash",
    "main4.iop.cash",
    "main5.iop.cash",
];

const MAIN_CHECKPOINTS: [(u32, &str); 3] = [
    (
        20_000,
        "c19bd1e263e8eacdf08ef998f863a8f7f667acfb2092ed9a27ce050200000000",
    ),
    (
        47_654,
        "0aec26ccfe6b2a482524e3ba6fa79149078ff03ef3812e82c694841100000000",
    ),
    (
        78_624,
        "1361a76a81795b726d7c8088fb53e4b57799e588f4bad84df0da1f0000000000",
    ),
];

const MAIN_DEPLOYMENTS: [DeploymentSpec; 4] = [
    DeploymentSpec {
        name: "csv",
        bit: 0,
        start_time: 1_462_060_800, // May 1st, 2016
        timeout: 1_493_596_800,    // May 1st, 2017
        threshold: None,
        window: None,
        required: false,
        force: true,
    },
    DeploymentSpec {
        name: "segwit",
        bit: 1,
        start_time: 0,
        timeout: 0,
        threshold: None,
        window: None,
        required: true,
        force: false,
    },
    DeploymentSpec {
        name: "segsignal",
        bit: 4,
        start_time: 0,
        timeout: 0,
        threshold: None,
        window: None,
        required: false,
        force: false,
    },
    DeploymentSpec {
        name: "testdummy",
        bit: 28,
        start_time: 1_199_145_601, // January 1, 2008
        timeout: 1_230_767_999,    // December 31, 2008
        threshold: None,
        window: None,
        required: false,
        force: true,
    },
];

pub const MAIN: NetworkSpec = NetworkSpec {
    network: Network::Main,
    seeds: &MAIN_SEEDS,
    magic: 0xd3bb_b0fd,
    port: 4877,
    checkpoints: &MAIN_CHECKPOINTS,
    last_checkpoint: 78_624,
    halving_interval: 150_000,
    genesis: GenesisSpec {
        version: 1,
        hash: MAIN_GENESIS_HASH,
        prev_block: ZERO_HASH_HEX,
        merkle_root: GENESIS_MERKLE_ROOT,
        ts: 1_463_452_181,
        bits: 486_604_799,
        nonce: 1_875_087_468,
        height: 0,
    },
    genesis_block: concat!(
        "0100000000000000000000000000000000000000000000000000000000000000",
        "00000000e12b8f2bef968efbdf2fab49fb3f1c59456e7d9b0f2c4afb4750a92d",
        "6dc41b9515823a57ffff001d6c90c36f01010000000100000000000000000000",
        "00000000000000000000000000000000000000000000ffffffff3e04ffff001d",
        "0104364c61204e6163696f6e204d617920313674682032303136202d20536172",
        "6d69656e746f2063657263612064656c2064657363656e736fffffffff0100f2",
        "052a01000000434104ce49f9cdc8d23176c818fd7e27e7b614d128a47acfdad0",
        "e4542300e7efbd8879f1337af3188c0dcb0747fdf26d0cb3b0fca0f4e5d7aec5",
        "3c43f4a933f570ae86ac00000000",
    ),
    pow: PowSpec {
        limit: "00000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        bits: 486_604_799,
        chainwork: "000000000000000000000000000000000000000000000000000e20799b006d2c",
        target_timespan: TWO_WEEKS,
        target_spacing: TEN_MINUTES,
        retarget_interval: 2016,
        target_reset: false,
        no_retargeting: false,
    },
    block: BlockSpec {
        bip34_height: None,
        bip34_hash: None,
        bip65_height: 0,
        bip65_hash: Some(MAIN_GENESIS_HASH),
        bip66_height: 0,
        bip66_hash: Some(MAIN_GENESIS_HASH),
        prune_after_height: 1000,
        keep_blocks: 288,
        max_tip_age: ONE_DAY,
        slow_height: 80_000,
    },
    bip30: &[],
    activation_threshold: Some(1916), // 95% of 2016
    miner_window: Some(2016),
    deployments: &MAIN_DEPLOYMENTS,
    key_prefix: KeyPrefix {
        privkey: 0x31,
        xpubkey: 0x2780_915f,
        xprivkey: 0xae34_16f6,
        xpubkey58: "9PPH",
        xprivkey58: "dywP",
        coin_type: 66,
    },
    // TODO: confirm the witness prefixes and bech32 hrp against the reference IoP node.
    address_prefix: AddressPrefix {
        pubkeyhash: 0x75,
        scripthash: 0xae,
        witness_pubkeyhash: 0xaa,
        witness_scripthash: 0xaa,
        bech32: "bc",
    },
    require_standard: true,
    rpc_port: 8337,
    min_relay: 1000,
    fee_rate: 100_000,
    max_fee_rate: 400_000,
    self_connect: false,
    request_mempool: false,
};

const TESTNET_SEEDS: [&str; 3] = ["testnet.iop.cash", "test1.iop.cash", "test2.iop.cash"];

const TESTNET_CHECKPOINTS: [(u32, &str); 2] = [
    (
        10_000,
        "2f5e87e031383e21e650a3274c33ceb477702fc73f966bef022c9bb000000000",
    ),
    (
        18_000,
        "fd71a128bcb9aa2516f461dc1b712dc2428c9340886babce10adcce000000000",
    ),
];

const TESTNET_DEPLOYMENTS: [DeploymentSpec; 4] = [
    DeploymentSpec {
        name: "csv",
        bit: 0,
        start_time: 1_456_790_400, // March 1st, 2016
        timeout: 1_493_596_800,    // May 1st, 2017
        threshold: None,
        window: None,
        required: false,
        force: true,
    },
    DeploymentSpec {
        name: "segwit",
        bit: 1,
        start_time: 0,
        timeout: 0,
        threshold: None,
        window: None,
        required: true,
        force: false,
    },
    DeploymentSpec {
        name: "segsignal",
        bit: 4,
        start_time: TIMESTAMP_NEVER,
        timeout: TIMESTAMP_NEVER,
        threshold: Some(269),
        window: Some(336),
        required: false,
        force: false,
    },
    DeploymentSpec {
        name: "testdummy",
        bit: 28,
        start_time: 1_199_145_601,
        timeout: 1_230_767_999,
        threshold: None,
        window: None,
        required: false,
        force: true,
    },
];

pub const TESTNET: NetworkSpec = NetworkSpec {
    network: Network::Testnet,
    seeds: &TESTNET_SEEDS,
    magic: 0xb350_fcb1,
    port: 7475,
    checkpoints: &TESTNET_CHECKPOINTS,
    last_checkpoint: 18_000,
    halving_interval: 100_000,
    genesis: GenesisSpec {
        version: 1,
        hash: TESTNET_GENESIS_HASH,
        prev_block: ZERO_HASH_HEX,
        merkle_root: GENESIS_MERKLE_ROOT,
        ts: 1_463_452_342,
        bits: 486_604_799,
        nonce: 3_335_213_172,
        height: 0,
    },
    genesis_block: concat!(
        "0100000000000000000000000000000000000000000000000000000000000000",
        "00000000e12b8f2bef968efbdf2fab49fb3f1c59456e7d9b0f2c4afb4750a92d",
        "6dc41b95b6823a57ffff001d7450cbc601010000000100000000000000000000",
        "00000000000000000000000000000000000000000000ffffffff3e04ffff001d",
        "0104364c61204e6163696f6e204d617920313674682032303136202d20536172",
        "6d69656e746f2063657263612064656c2064657363656e736fffffffff0100f2",
        "052a01000000434104ce49f9cdc8d23176c818fd7e27e7b614d128a47acfdad0",
        "e4542300e7efbd8879f1337af3188c0dcb0747fdf26d0cb3b0fca0f4e5d7aec5",
        "3c43f4a933f570ae86ac00000000",
    ),
    pow: PowSpec {
        limit: "00000000ffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        bits: 486_604_799,
        chainwork: ZERO_HASH_HEX,
        target_timespan: TWO_WEEKS,
        target_spacing: TEN_MINUTES,
        retarget_interval: 2016,
        target_reset: true,
        no_retargeting: false,
    },
    block: BlockSpec {
        bip34_height: None,
        bip34_hash: None,
        bip65_height: 0,
        bip65_hash: Some(TESTNET_GENESIS_HASH),
        bip66_height: 0,
        bip66_hash: Some(TESTNET_GENESIS_HASH),
        prune_after_height: 1000,
        keep_blocks: 10_000,
        max_tip_age: ONE_DAY,
        slow_height: 18_000,
    },
    bip30: &[],
    activation_threshold: Some(1512), // 75% for testchains
    miner_window: Some(2016),
    deployments: &TESTNET_DEPLOYMENTS,
    key_prefix: KeyPrefix {
        privkey: 0x4c,
        xpubkey: 0xbb8f_4852,
        xprivkey: 0x2b7f_a42a,
        xpubkey58: "gpPf",
        xprivkey58: "AEbG",
        coin_type: 1,
    },
    address_prefix: AddressPrefix {
        pubkeyhash: 0x82,
        scripthash: 0x31,
        witness_pubkeyhash: 0x03,
        witness_scripthash: 0x28,
        bech32: "tb",
    },
    require_standard: false,
    rpc_port: 14_337,
    min_relay: 1000,
    fee_rate: 20_000,
    max_fee_rate: 60_000,
    self_connect: false,
    request_mempool: false,
};

const REGTEST_SEEDS: [&str; 1] = ["127.0.0.1"];

const REGTEST_DEPLOYMENTS: [DeploymentSpec; 4] = [
    DeploymentSpec {
        name: "csv",
        bit: 0,
        start_time: 0,
        timeout: TIMESTAMP_NEVER,
        threshold: None,
        window: None,
        required: false,
        force: true,
    },
    DeploymentSpec {
        name: "segwit",
        bit: 1,
        start_time: 0,
        timeout: TIMESTAMP_NEVER,
        threshold: None,
        window: None,
        required: true,
        force: false,
    },
    DeploymentSpec {
        name: "segsignal",
        bit: 4,
        start_time: TIMESTAMP_NEVER,
        timeout: TIMESTAMP_NEVER,
        threshold: Some(269),
        window: Some(336),
        required: false,
        force: false,
    },
    DeploymentSpec {
        name: "testdummy",
        bit: 28,
        start_time: 0,
        timeout: TIMESTAMP_NEVER,
        threshold: None,
        window: None,
        required: false,
        force: true,
    },
];

pub const REGTEST: NetworkSpec = NetworkSpec {
    network: Network::Regtest,
    seeds: &REGTEST_SEEDS,
    magic: 0x9ecc_b235,
    port: 14_877,
    checkpoints: &[],
    last_checkpoint: 0,
    halving_interval: 150,
    genesis: GenesisSpec {
        version: 1,
        hash: REGTEST_GENESIS_HASH,
        prev_block: ZERO_HASH_HEX,
        merkle_root: GENESIS_MERKLE_ROOT,
        ts: 1_463_452_384,
        bits: 545_259_519,
        nonce: 2_528_424_328,
        height: 0,
    },
    genesis_block: concat!(
        "0100000000000000000000000000000000000000000000000000000000000000",
        "00000000e12b8f2bef968efbdf2fab49fb3f1c59456e7d9b0f2c4afb4750a92d",
        "6dc41b95e0823a57ffff7f2088b1b49601010000000100000000000000000000",
        "00000000000000000000000000000000000000000000ffffffff3e04ffff001d",
        "0104364c61204e6163696f6e204d617920313674682032303136202d20536172",
        "6d69656e746f2063657263612064656c2064657363656e736fffffffff0100f2",
        "052a01000000434104ce49f9cdc8d23176c818fd7e27e7b614d128a47acfdad0",
        "e4542300e7efbd8879f1337af3188c0dcb0747fdf26d0cb3b0fca0f4e5d7aec5",
        "3c43f4a933f570ae86ac00000000",
    ),
    pow: PowSpec {
        limit: "7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff",
        bits: 545_259_519,
        chainwork: ZERO_HASH_HEX,
        target_timespan: TWO_WEEKS,
        target_spacing: TEN_MINUTES,
        retarget_interval: 2016,
        target_reset: true,
        no_retargeting: true,
    },
    block: BlockSpec {
        bip34_height: None,
        bip34_hash: None,
        bip65_height: 0,
        bip65_hash: None,
        bip66_height: 0,
        bip66_hash: None,
        prune_after_height: 1000,
        keep_blocks: 10_000,
        max_tip_age: TIMESTAMP_NEVER,
        slow_height: 0,
    },
    bip30: &[],
    activation_threshold: Some(108), // 75% for testchains
    miner_window: Some(144),
    deployments: &REGTEST_DEPLOYMENTS,
    key_prefix: KeyPrefix {
        privkey: 0x4c,
        xpubkey: 0xbb8f_4852,
        xprivkey: 0x2b7f_a42a,
        xpubkey58: "gpPf",
        xprivkey58: "AEbG",
        coin_type: 1,
    },
    address_prefix: AddressPrefix {
        pubkeyhash: 0x82,
        scripthash: 0x31,
        witness_pubkeyhash: 0x03,
        witness_scripthash: 0x28,
        bech32: "rb",
    },
    require_standard: false,
    rpc_port: 18_337,
    min_relay: 1000,
    fee_rate: 20_000,
    max_fee_rate: 60_000,
    self_connect: true,
    request_mempool: true,
};
