// crates/iotlab-deploy/src/config.rs

//! Run configuration: which nodes, where, and how ids are assigned.
//!
//! A `TestbedConfig` starts from defaults, can be loaded from a JSON file and
//! is then adjusted by `IOTLAB_*` environment variables.

use crate::error::DeployError;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

// --- Environment variable names ---

pub const ENV_NODE_IDS: &str = "IOTLAB_NODE_IDS";
pub const ENV_SITE: &str = "IOTLAB_SITE";
pub const ENV_ARCHI: &str = "IOTLAB_ARCHI";
pub const ENV_NODES_JSON: &str = "IOTLAB_NODES_JSON";
pub const ENV_RANDOMIZE: &str = "IOTLAB_RANDOMIZE";
pub const ENV_SEED: &str = "IOTLAB_SEED";

// --- Defaults ---

/// Strasbourg M3 nodes used for the reference experiment.
/// See https://www.iot-lab.info/testbed/status for the current inventory.
const DEFAULT_NODE_IDS: [u32; 26] = [
    1, 4, 5, 8, 9, 11, 39, 64, 61, 60, //
    57, 56, 53, 48, 29, 20, 22, 34, 32, 36, //
    37, 24, 52, 50, 10, 62,
];
const DEFAULT_SITE: &str = "strasbourg";
const DEFAULT_ARCHI: &str = "m3:at86rf231";
const DEFAULT_NODES_JSON: &str = "iotlab-nodes.json";

/// Widest `a-b` range accepted in a node list. Sites hold a few hundred nodes.
const MAX_RANGE_LEN: u32 = 1024;

/// Everything needed to build a `Testbed`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestbedConfig {
    /// Requested node numbers, in deployment order.
    pub node_ids: Vec<u32>,
    pub site: String,
    /// Architecture string, e.g. `m3:at86rf231`.
    pub archi: String,
    /// Path of the node metadata export.
    pub nodes_json: PathBuf,
    /// Shuffle deployment ids instead of assigning them in request order.
    pub randomize: bool,
    /// Seed for the shuffle. A fresh entropy seed is used when unset.
    pub seed: Option<u64>,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            node_ids: DEFAULT_NODE_IDS.to_vec(),
            site: DEFAULT_SITE.to_string(),
            archi: DEFAULT_ARCHI.to_string(),
            nodes_json: PathBuf::from(DEFAULT_NODES_JSON),
            randomize: false,
            seed: None,
        }
    }
}

impl TestbedConfig {
    /// Parses a JSON config. Missing fields keep their default value.
    ///
    /// # Errors
    /// Returns `DeployError::Json` on malformed JSON or unknown fields.
    pub fn from_json_str(json_content: &str) -> Result<Self, DeployError> {
        Ok(serde_json::from_str(json_content)?)
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    /// Returns `DeployError::Io` if the file cannot be read and
    /// `DeployError::Json` as for `from_json_str`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DeployError> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Applies `IOTLAB_*` overrides from the process environment.
    ///
    /// # Errors
    /// Returns `DeployError::InvalidConfig` as for `apply_overrides`.
    pub fn apply_env(&mut self) -> Result<(), DeployError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides returned by `lookup` for each `IOTLAB_*` key.
    ///
    /// Taking the lookup as a closure keeps this testable without touching
    /// the process environment.
    ///
    /// # Errors
    /// Returns `DeployError::InvalidConfig` if a value cannot be parsed.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), DeployError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(ids) = lookup(ENV_NODE_IDS) {
            self.node_ids = parse_node_ids(&ids)?;
        }
        if let Some(site) = lookup(ENV_SITE) {
            self.site = site;
        }
        if let Some(archi) = lookup(ENV_ARCHI) {
            self.archi = archi;
        }
        if let Some(path) = lookup(ENV_NODES_JSON) {
            self.nodes_json = PathBuf::from(path);
        }
        if let Some(flag) = lookup(ENV_RANDOMIZE) {
            self.randomize = parse_bool(ENV_RANDOMIZE, &flag)?;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            let seed = seed.trim().parse().map_err(|_| {
                DeployError::InvalidConfig(format!(
                    "{} must be an unsigned integer, got {:?}",
                    ENV_SEED, seed
                ))
            })?;
            self.seed = Some(seed);
        }
        debug!("Effective configuration: {:?}", self);
        Ok(())
    }

    /// Creates the generator used for shuffling deployment ids.
    pub fn rng(&self) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        }
    }
}

/// Parses a node list in IoT-LAB CLI syntax.
///
/// Tokens may be separated by `+`, `,` or whitespace, and `a-b` expands to
/// the inclusive range. `"1-3+8"` yields `[1, 2, 3, 8]`. Order is preserved
/// and duplicates are kept.
///
/// # Errors
/// Returns `DeployError::InvalidConfig` for non-numeric tokens, reversed ranges
/// and ranges wider than 1024 ids.
pub fn parse_node_ids(input: &str) -> Result<Vec<u32>, DeployError> {
    let mut ids = Vec::new();
    let tokens = input
        .split(|c: char| c == '+' || c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty());

    for token in tokens {
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_node_id(start, token)?;
                let end = parse_node_id(end, token)?;
                if start > end {
                    return Err(DeployError::InvalidConfig(format!(
                        "reversed node range {:?}",
                        token
                    )));
                }
                if end - start >= MAX_RANGE_LEN {
                    return Err(DeployError::InvalidConfig(format!(
                        "node range {:?} spans more than {} ids",
                        token, MAX_RANGE_LEN
                    )));
                }
                ids.extend(start..=end);
            }
            None => ids.push(parse_node_id(token, token)?),
        }
    }
    Ok(ids)
}

fn parse_node_id(s: &str, token: &str) -> Result<u32, DeployError> {
    s.parse()
        .map_err(|_| DeployError::InvalidConfig(format!("invalid node id {:?}", token)))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, DeployError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(DeployError::InvalidConfig(format!(
            "{} must be a boolean, got {:?}",
            key, value
        ))),
    }
}
