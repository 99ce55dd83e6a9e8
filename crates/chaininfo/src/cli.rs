use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use iop_consensus::Network;
use iop_log as logging;
use iop_versionbits::DEFAULT_STATE_CACHE_ENTRIES;

pub const DEFAULT_CONF_FILE: &str = "iop.conf";

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub network: Network,
    /// The conf file that was read, if any.
    pub conf_path: Option<PathBuf>,
    pub log_level: logging::Level,
    pub log_format: logging::Format,
    pub log_timestamps: bool,
    pub deployments_only: bool,
    pub state_cache_entries: usize,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliAction {
    Run(Config),
    PrintHelp,
    PrintVersion,
}

pub fn parse_args() -> Result<CliAction, String> {
    parse_args_with_env(std::env::args().skip(1), logging::LogConfig::from_env())
}

pub fn parse_args_from<I>(raw_args: I) -> Result<CliAction, String>
where
    I: IntoIterator<Item = String>,
{
    parse_args_with_env(raw_args, logging::LogConfig::default())
}

/// Flags win over the conf file, which wins over `env_log`.
pub fn parse_args_with_env<I>(raw_args: I, env_log: logging::LogConfig) -> Result<CliAction, String>
where
    I: IntoIterator<Item = String>,
{
    let mut network = Network::Main;
    let mut network_set = false;
    let mut conf_path: Option<PathBuf> = None;
    let mut log_level = env_log.level;
    let mut log_level_set = false;
    let mut log_format = env_log.format;
    let mut log_format_set = false;
    let mut log_timestamps = env_log.timestamps;
    let mut deployments_only = false;
    let mut state_cache_entries = DEFAULT_STATE_CACHE_ENTRIES;
    let mut args = raw_args.into_iter().peekable();

    if let Some(first) = args.peek().map(|value| value.as_str()) {
        match first {
            "help" => return Ok(CliAction::PrintHelp),
            "version" => return Ok(CliAction::PrintVersion),
            "deployments" => {
                deployments_only = true;
                let _ = args.next();
            }
            _ => {}
        }
    }
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Ok(CliAction::PrintHelp),
            "--version" | "-V" => return Ok(CliAction::PrintVersion),
            "--network" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --network\n{}", usage()))?;
                network = value
                    .parse()
                    .map_err(|_| format!("invalid network '{value}'\n{}", usage()))?;
                network_set = true;
            }
            "--testnet" => {
                network = Network::Testnet;
                network_set = true;
            }
            "--regtest" => {
                network = Network::Regtest;
                network_set = true;
            }
            "--conf" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --conf\n{}", usage()))?;
                conf_path = Some(PathBuf::from(value));
            }
            "--log-level" | "--loglevel" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --log-level\n{}", usage()))?;
                log_level = logging::Level::parse(&value)
                    .ok_or_else(|| format!("invalid log level '{value}'\n{}", usage()))?;
                log_level_set = true;
            }
            "--log-format" | "--logformat" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --log-format\n{}", usage()))?;
                log_format = logging::Format::parse(&value)
                    .ok_or_else(|| format!("invalid log format '{value}'\n{}", usage()))?;
                log_format_set = true;
            }
            "--no-log-timestamps" | "--no-logtimestamps" => {
                log_timestamps = false;
            }
            "--deployments" => {
                deployments_only = true;
            }
            "--state-cache" => {
                let value = args
                    .next()
                    .ok_or_else(|| format!("missing value for --state-cache\n{}", usage()))?;
                state_cache_entries = value
                    .parse::<usize>()
                    .ok()
                    .filter(|entries| *entries > 0)
                    .ok_or_else(|| format!("invalid --state-cache '{value}'\n{}", usage()))?;
            }
            other => return Err(format!("unknown argument '{other}'\n{}", usage())),
        }
    }

    let explicit_conf = conf_path.is_some();
    let conf_file = conf_path.unwrap_or_else(|| PathBuf::from(DEFAULT_CONF_FILE));
    let conf = load_conf(&conf_file)?;
    if conf.is_none() && explicit_conf {
        return Err(format!("config file {} not found", conf_file.display()));
    }

    if let Some(conf) = conf.as_ref() {
        if !network_set {
            if conf_flag(conf, "regtest", &conf_file)? == Some(true) {
                network = Network::Regtest;
            } else if conf_flag(conf, "testnet", &conf_file)? == Some(true) {
                network = Network::Testnet;
            }
        }
        if !log_level_set {
            if let Some(raw) = conf_value(conf, "loglevel") {
                log_level = logging::Level::parse(raw).ok_or_else(|| {
                    format!("invalid loglevel '{raw}' in {}", conf_file.display())
                })?;
            }
        }
        if !log_format_set {
            if let Some(raw) = conf_value(conf, "logformat") {
                log_format = logging::Format::parse(raw).ok_or_else(|| {
                    format!("invalid logformat '{raw}' in {}", conf_file.display())
                })?;
            }
        }
    }

    Ok(CliAction::Run(Config {
        network,
        conf_path: conf.map(|_| conf_file),
        log_level,
        log_format,
        log_timestamps,
        deployments_only,
        state_cache_entries,
    }))
}

/// Reads `key=value` lines; a missing file is `Ok(None)`. Later values win.
pub fn load_conf(path: &Path) -> Result<Option<HashMap<String, Vec<String>>>, String> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(format!("failed to read {}: {err}", path.display())),
    };

    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    for raw_line in contents.lines() {
        let line = raw_line
            .split(['#', ';'])
            .next()
            .unwrap_or_default()
            .trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = match line.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (line, "1"),
        };
        if key.is_empty() {
            continue;
        }
        out.entry(key.to_ascii_lowercase())
            .or_default()
            .push(value.to_string());
    }
    Ok(Some(out))
}

pub fn parse_conf_bool(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.is_empty() {
        return Some(true);
    }
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn conf_value<'a>(conf: &'a HashMap<String, Vec<String>>, key: &str) -> Option<&'a str> {
    conf.get(key)
        .and_then(|values| values.last())
        .map(String::as_str)
}

fn conf_flag(
    conf: &HashMap<String, Vec<String>>,
    key: &str,
    path: &Path,
) -> Result<Option<bool>, String> {
    let Some(raw) = conf_value(conf, key) else {
        return Ok(None);
    };
    parse_conf_bool(raw)
        .map(Some)
        .ok_or_else(|| format!("invalid {key} value '{raw}' in {}", path.display()))
}

pub fn usage() -> String {
    [
        "Usage:",
        "  iop-chaininfo [options]",
        "  iop-chaininfo <command> [options]",
        "",
        "Commands:",
        "  help         Print this help and exit",
        "  version      Print version and exit",
        "  deployments  Alias for --deployments",
        "",
        "Options:",
        "  --help, -h  Print this help and exit",
        "  --version, -V  Print version and exit",
        "  --network  main|testnet|regtest (default: main)",
        "  --testnet  Alias for --network testnet",
        "  --regtest  Alias for --network regtest",
        "  --conf  Config file path (default: ./iop.conf, optional)",
        "  --log-level  error|warn|info|debug|trace (default: info, env IOP_LOG)",
        "  --log-format  text|json (default: text, env IOP_LOG_FORMAT)",
        "  --no-log-timestamps  Omit timestamps from text logs",
        "  --deployments  Print only the deployment table",
        "  --state-cache  Versionbits state cache entries (default: 16384)",
        "",
        "Config file keys:",
        "  testnet=1, regtest=1, loglevel=<level>, logformat=<format>",
    ]
    .join("\n")
}
