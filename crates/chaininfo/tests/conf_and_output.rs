use std::fs;
use std::path::Path;

use iop_chaininfo::cli::{parse_args_from, CliAction, Config};
use iop_chaininfo::run_with_config;
use iop_consensus::Network;
use iop_log::{Format, Level};
use serde_json::Value;

fn parse(raw: &[&str]) -> Result<CliAction, String> {
    parse_args_from(raw.iter().map(|value| value.to_string()))
}

fn config_with_conf(conf: &Path, extra: &[&str]) -> Config {
    let conf = conf.to_str().expect("utf8 path");
    let mut raw = vec!["--conf", conf];
    raw.extend_from_slice(extra);
    match parse(&raw).expect("parse") {
        CliAction::Run(config) => config,
        other => panic!("unexpected action {other:?}"),
    }
}

fn write_conf(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("iop.conf");
    fs::write(&path, contents).expect("write conf");
    path
}

#[test]
fn conf_selects_network_and_logging() {
    let dir = tempfile::tempdir().expect("tempdir");
    let conf = write_conf(
        dir.path(),
        "# local node\nregtest=1\nloglevel=warn ; quiet\nlogformat=json\nunused=ignored\n",
    );

    let config = config_with_conf(&conf, &[]);
    assert_eq!(config.network, Network::Regtest);
    assert_eq!(config.log_level, Level::Warn);
    assert_eq!(config.log_format, Format::Json);
    assert_eq!(config.conf_path.as_deref(), Some(conf.as_path()));
}

#[test]
fn flags_override_conf() {
    let dir = tempfile::tempdir().expect("tempdir");
    let conf = write_conf(dir.path(), "testnet=1\nloglevel=trace\n");

    let config = config_with_conf(&conf, &["--network", "main", "--log-level", "error"]);
    assert_eq!(config.network, Network::Main);
    assert_eq!(config.log_level, Level::Error);
}

#[test]
fn regtest_wins_over_testnet_and_last_value_counts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let conf = write_conf(dir.path(), "testnet=1\nregtest=1\nregtest=0\n");
    assert_eq!(config_with_conf(&conf, &[]).network, Network::Testnet);

    let conf = write_conf(dir.path(), "testnet\nregtest\n");
    assert_eq!(config_with_conf(&conf, &[]).network, Network::Regtest);
}

#[test]
fn bad_conf_values_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let conf = write_conf(dir.path(), "testnet=maybe\n");
    let raw_conf = conf.to_str().expect("utf8 path");
    let err = parse(&["--conf", raw_conf]).unwrap_err();
    assert!(err.contains("invalid testnet value 'maybe'"), "{err}");

    let conf = write_conf(dir.path(), "logformat=xml\n");
    let raw_conf = conf.to_str().expect("utf8 path");
    let err = parse(&["--conf", raw_conf]).unwrap_err();
    assert!(err.contains("invalid logformat 'xml'"), "{err}");
}

#[test]
fn explicit_missing_conf_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.conf");
    let raw = missing.to_str().expect("utf8 path");
    let err = parse(&["--conf", raw]).unwrap_err();
    assert!(err.contains("not found"), "{err}");
}

#[test]
fn regtest_report_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let conf = write_conf(dir.path(), "regtest=1\n");
    let config = config_with_conf(&conf, &["--log-level", "error"]);

    let output = run_with_config(&config).expect("report");
    let report: Value = serde_json::from_str(&output).expect("json");

    assert_eq!(report["network"], "regtest");
    assert_eq!(report["magic"], "0x9eccb235");
    assert_eq!(report["message_start"], "35b2cc9e");
    assert_eq!(report["port"], 14_877);
    assert_eq!(
        report["genesis"]["hash"],
        "13ac5baa4b3656eec3ae4ab24b44ae602b9d1e549d9f1f238c1bfce54571b8b5"
    );
    assert_eq!(report["genesis"]["bits"], "207fffff");
    assert_eq!(report["genesis"]["size"], 270);
    assert_eq!(report["activation_threshold"], 108);
    assert_eq!(report["miner_window"], 144);
    assert_eq!(report["pow"]["no_retargeting"], true);
    assert_eq!(report["checkpoints"].as_array().map(Vec::len), Some(0));
    assert_eq!(report["last_checkpoint"], 0);
    assert_eq!(report["relay"]["min_relay"], "0.00001000");
    assert_eq!(report["next_block_version"], "0x20000000");

    let deployments = report["deployments"].as_array().expect("deployments");
    let names: Vec<&str> = deployments
        .iter()
        .filter_map(|entry| entry["name"].as_str())
        .collect();
    assert_eq!(names, ["csv", "segwit", "segsignal", "testdummy"]);
    assert!(deployments.iter().all(|entry| entry["state"] == "defined"));
    assert_eq!(deployments[2]["start_time"], 0xffff_ffffu32);
    assert_eq!(deployments[2]["can_start"], false);
    assert_eq!(deployments[2]["threshold"], 269);
}

#[test]
fn main_deployments_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    let conf = write_conf(dir.path(), "");
    let config = config_with_conf(&conf, &["--deployments", "--log-level", "error"]);
    assert_eq!(config.network, Network::Main);

    let output = run_with_config(&config).expect("report");
    let views: Value = serde_json::from_str(&output).expect("json");
    let views = views.as_array().expect("array");
    assert_eq!(views.len(), 4);
    assert_eq!(views[0]["name"], "csv");
    assert_eq!(views[0]["window"], 2016);
    assert_eq!(views[0]["threshold"], 1916);
    assert_eq!(views[1]["name"], "segwit");
    assert_eq!(views[1]["required"], true);
    assert_eq!(views[1]["can_start"], false);
}

#[test]
fn main_report_lists_checkpoints() {
    let dir = tempfile::tempdir().expect("tempdir");
    let conf = write_conf(dir.path(), "# defaults\n");
    let config = config_with_conf(&conf, &["--log-level", "error", "--state-cache", "64"]);
    let report: Value =
        serde_json::from_str(&run_with_config(&config).expect("report")).expect("json");

    let checkpoints = report["checkpoints"].as_array().expect("checkpoints");
    assert_eq!(checkpoints.len(), 3);
    assert_eq!(checkpoints[0]["height"], 20_000);
    assert_eq!(
        checkpoints[0]["hash"],
        "000000000205ce279aed9220fbac67f6f7a863f898f98ef0cdeae863e2d19bc1"
    );
    assert_eq!(report["last_checkpoint"], 78_624);
    assert_eq!(report["seeds"].as_array().map(Vec::len), Some(6));
    assert_eq!(report["key_prefix"]["coin_type"], 66);
}
